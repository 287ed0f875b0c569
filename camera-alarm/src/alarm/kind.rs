//! Alarm kinds, vendor event descriptors and the published state payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two detection signals reported by the vendor SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmKind {
    Motion,
    Humanoid,
}

impl AlarmKind {
    /// All kinds, in the order the monitor processes them.
    pub const ALL: [AlarmKind; 2] = [AlarmKind::Motion, AlarmKind::Humanoid];

    /// Vendor SDK alarm type code.
    pub const fn code(self) -> u32 {
        match self {
            AlarmKind::Motion => 1,
            AlarmKind::Humanoid => 2,
        }
    }

    /// Map a vendor alarm type code to a kind.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AlarmKind::Motion => "motion",
            AlarmKind::Humanoid => "humanoid",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            AlarmKind::Motion => 0,
            AlarmKind::Humanoid => 1,
        }
    }
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounding box of a detection, in detection-frame pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Event descriptor delivered by the vendor SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmEvent {
    /// Raw vendor alarm type code, see [`AlarmKind::code`].
    pub alarm_type: u32,
    /// Whether the detector currently sees the target.
    pub active: bool,
    /// Regions for the overlay to draw.
    pub regions: Vec<DetectionRegion>,
}

impl AlarmEvent {
    pub fn new(kind: AlarmKind, active: bool) -> Self {
        Self {
            alarm_type: kind.code(),
            active,
            regions: Vec::new(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<DetectionRegion>) -> Self {
        self.regions = regions;
        self
    }

    pub fn kind(&self) -> Option<AlarmKind> {
        AlarmKind::from_code(self.alarm_type)
    }
}

/// Debounced alarm state, published as `{"motion":..,"humanoid":..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmState {
    pub motion: bool,
    pub humanoid: bool,
}

impl AlarmState {
    pub fn get(&self, kind: AlarmKind) -> bool {
        match kind {
            AlarmKind::Motion => self.motion,
            AlarmKind::Humanoid => self.humanoid,
        }
    }

    pub fn set(&mut self, kind: AlarmKind, active: bool) {
        match kind {
            AlarmKind::Motion => self.motion = active,
            AlarmKind::Humanoid => self.humanoid = active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_round_trip() {
        for kind in AlarmKind::ALL {
            assert_eq!(AlarmKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(AlarmKind::from_code(0), None);
        assert_eq!(AlarmKind::from_code(7), None);
    }

    #[test]
    fn test_event_kind() {
        let event = AlarmEvent::new(AlarmKind::Humanoid, true);
        assert_eq!(event.kind(), Some(AlarmKind::Humanoid));

        let unknown = AlarmEvent {
            alarm_type: 99,
            ..Default::default()
        };
        assert_eq!(unknown.kind(), None);
    }

    #[test]
    fn test_state_get_set() {
        let mut state = AlarmState::default();
        state.set(AlarmKind::Humanoid, true);
        assert!(state.get(AlarmKind::Humanoid));
        assert!(!state.get(AlarmKind::Motion));
    }

    #[test]
    fn test_state_payload_shape() {
        let state = AlarmState {
            motion: true,
            humanoid: false,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"motion":true,"humanoid":false}"#);
    }
}
