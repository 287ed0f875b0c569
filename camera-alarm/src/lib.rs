//! camera-alarm library crate.
//!
//! Debounced motion/humanoid alarms for camera firmware built on a vendor
//! detection SDK. The SDK, overlay and messaging transport are supplied by
//! the firmware through the traits in [`alarm`].

pub mod alarm;
pub mod config;
pub mod error;
pub mod logging;

pub use alarm::{AlarmEvent, AlarmKind, AlarmService, AlarmState};
pub use config::{AlarmConfig, load_config};
pub use error::{Error, Result};
