//! Alarm state publishing over the messaging transport.

use async_trait::async_trait;
use tracing::{debug, error};

use super::kind::AlarmState;
use crate::Result;

/// Topic name the alarm state is published under, before transport prefixing.
pub const ALARM_TOPIC: &str = "alarm";

/// Messaging collaborator, normally the firmware's MQTT client.
#[async_trait]
pub trait AlarmTransport: Send + Sync {
    /// Whether the transport is connected and can accept a publish.
    fn is_ready(&self) -> bool;

    /// Resolve a short topic name to the full topic, e.g. with a device prefix.
    fn full_topic(&self, name: &str) -> Result<String>;

    async fn publish(&self, topic: &str, payload: &str) -> Result<()>;
}

/// Serialize `state` and publish it once to [`ALARM_TOPIC`].
///
/// No retry and no buffering: a failed publish is logged and returned.
pub async fn publish_alarm_state(transport: &dyn AlarmTransport, state: AlarmState) -> Result<()> {
    let payload = serde_json::to_string(&state).inspect_err(|e| {
        error!(error = %e, "Failed to serialize alarm state");
    })?;

    let topic = transport.full_topic(ALARM_TOPIC).inspect_err(|e| {
        error!(error = %e, "Failed to resolve alarm topic");
    })?;

    transport
        .publish(&topic, &payload)
        .await
        .inspect_err(|e| error!(topic = %topic, error = %e, "Failed to publish alarm state"))?;

    debug!(topic = %topic, payload = %payload, "Alarm state published");
    Ok(())
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::Error;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String)>>,
        bad_topic: bool,
        fail_publish: bool,
    }

    #[async_trait]
    impl AlarmTransport for RecordingTransport {
        fn is_ready(&self) -> bool {
            true
        }

        fn full_topic(&self, name: &str) -> Result<String> {
            if self.bad_topic {
                return Err(Error::transport("no device prefix"));
            }
            Ok(format!("yicam/{name}"))
        }

        async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
            if self.fail_publish {
                return Err(Error::transport("broker unreachable"));
            }
            self.sent.lock().push((topic.to_string(), payload.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_publish_payload() {
        let transport = RecordingTransport::default();
        let state = AlarmState {
            motion: true,
            humanoid: false,
        };

        publish_alarm_state(&transport, state).await.unwrap();

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "yicam/alarm");

        let value: serde_json::Value = serde_json::from_str(&sent[0].1).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["motion"], true);
        assert_eq!(object["humanoid"], false);
    }

    #[tokio::test]
    async fn test_topic_failure() {
        let transport = RecordingTransport {
            bad_topic: true,
            ..Default::default()
        };

        let result = publish_alarm_state(&transport, AlarmState::default()).await;

        assert!(matches!(result, Err(Error::Transport(_))));
        assert!(transport.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure() {
        let transport = RecordingTransport {
            fail_publish: true,
            ..Default::default()
        };

        assert!(publish_alarm_state(&transport, AlarmState::default()).await.is_err());
    }
}
