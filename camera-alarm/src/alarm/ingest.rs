//! Event ingest: the handler the vendor SDK calls for every detection event.

use std::sync::Arc;

use tracing::{info, trace, warn};

use super::clock::Clock;
use super::kind::AlarmEvent;
use super::sdk::{AlarmEventHandler, OverlaySink};
use super::timestamps::AlarmTimestamps;
use crate::{Error, Result};

/// Records last-seen timestamps and forwards events to the overlay.
pub struct AlarmEventIngest {
    timestamps: Arc<AlarmTimestamps>,
    overlay: Arc<dyn OverlaySink>,
    clock: Arc<dyn Clock>,
}

impl AlarmEventIngest {
    pub fn new(
        timestamps: Arc<AlarmTimestamps>,
        overlay: Arc<dyn OverlaySink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            timestamps,
            overlay,
            clock,
        }
    }
}

impl AlarmEventHandler for AlarmEventIngest {
    fn on_alarm_event(&self, event: Option<&AlarmEvent>) -> Result<()> {
        let event = event.ok_or(Error::InvalidEvent)?;

        // Overlay failures are reported but never stop the timestamp update.
        let overlay_result = self.overlay.on_alarm_event(event);
        if let Err(e) = &overlay_result {
            warn!(error = %e, "Overlay failed to handle alarm event");
        }

        if !event.active {
            return overlay_result;
        }

        match event.kind() {
            Some(kind) => {
                let now = self.clock.now();
                self.timestamps.record(kind, now);
                trace!(kind = %kind, timestamp = now, "Alarm event recorded");
                overlay_result
            }
            None => {
                info!(alarm_type = event.alarm_type, "Change unknown status: active");
                Err(Error::UnknownKind(event.alarm_type))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::alarm::clock::test_clock::ManualClock;
    use crate::alarm::kind::{AlarmKind, DetectionRegion};
    use crate::alarm::timestamps::NO_EVENT;

    #[derive(Default)]
    struct RecordingOverlay {
        events: Mutex<Vec<AlarmEvent>>,
        fail: bool,
    }

    impl OverlaySink for RecordingOverlay {
        fn on_alarm_event(&self, event: &AlarmEvent) -> Result<()> {
            self.events.lock().push(event.clone());
            if self.fail {
                Err(Error::Other("osd busy".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn setup(overlay: RecordingOverlay) -> (AlarmEventIngest, Arc<AlarmTimestamps>, Arc<RecordingOverlay>) {
        let timestamps = Arc::new(AlarmTimestamps::new());
        let overlay = Arc::new(overlay);
        let ingest = AlarmEventIngest::new(
            timestamps.clone(),
            overlay.clone(),
            Arc::new(ManualClock::at(1_000)),
        );
        (ingest, timestamps, overlay)
    }

    #[test]
    fn test_missing_descriptor() {
        let (ingest, timestamps, overlay) = setup(RecordingOverlay::default());

        let result = ingest.on_alarm_event(None);

        assert!(matches!(result, Err(Error::InvalidEvent)));
        assert!(overlay.events.lock().is_empty());
        assert_eq!(timestamps.get(AlarmKind::Motion), NO_EVENT);
    }

    #[test]
    fn test_active_event_records_timestamp() {
        let (ingest, timestamps, overlay) = setup(RecordingOverlay::default());
        let event = AlarmEvent::new(AlarmKind::Motion, true).with_regions(vec![DetectionRegion {
            x: 10,
            y: 20,
            width: 30,
            height: 40,
        }]);

        ingest.on_alarm_event(Some(&event)).unwrap();

        assert_eq!(timestamps.get(AlarmKind::Motion), 1_000);
        assert_eq!(timestamps.get(AlarmKind::Humanoid), NO_EVENT);
        assert_eq!(overlay.events.lock().as_slice(), &[event]);
    }

    #[test]
    fn test_inactive_event_only_forwards() {
        let (ingest, timestamps, overlay) = setup(RecordingOverlay::default());

        ingest
            .on_alarm_event(Some(&AlarmEvent::new(AlarmKind::Humanoid, false)))
            .unwrap();

        assert_eq!(timestamps.get(AlarmKind::Humanoid), NO_EVENT);
        assert_eq!(overlay.events.lock().len(), 1);
    }

    #[test]
    fn test_unknown_kind_still_reaches_overlay() {
        let (ingest, timestamps, overlay) = setup(RecordingOverlay::default());
        let event = AlarmEvent {
            alarm_type: 42,
            active: true,
            regions: Vec::new(),
        };

        let result = ingest.on_alarm_event(Some(&event));

        assert!(matches!(result, Err(Error::UnknownKind(42))));
        assert_eq!(overlay.events.lock().len(), 1);
        assert_eq!(timestamps.get(AlarmKind::Motion), NO_EVENT);
        assert_eq!(timestamps.get(AlarmKind::Humanoid), NO_EVENT);
    }

    #[test]
    fn test_overlay_failure_does_not_abort() {
        let (ingest, timestamps, _overlay) = setup(RecordingOverlay {
            fail: true,
            ..Default::default()
        });

        let result = ingest.on_alarm_event(Some(&AlarmEvent::new(AlarmKind::Humanoid, true)));

        assert!(result.is_err());
        assert_eq!(timestamps.get(AlarmKind::Humanoid), 1_000);
    }
}
