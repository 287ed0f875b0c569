//! Motion and humanoid alarm handling.
//!
//! The vendor SDK delivers detection events to [`AlarmEventIngest`], which
//! only records when each kind was last seen. [`AlarmMonitor`] turns those
//! timestamps into a debounced on/off state once per second and, on every
//! change, runs the configured hook command and publishes the combined
//! [`AlarmState`]. [`AlarmService`] ties the vendor alarm feature and the
//! monitor task together:
//!
//! - `init` selects the detection resolution, initializes the vendor feature,
//!   sets sensitivities, registers the ingest handler and starts the monitor
//! - `switch` enables or disables detection of both kinds
//! - `free` undoes all of it, attempting every step

mod clock;
mod command;
mod debounce;
mod ingest;
mod kind;
mod monitor;
mod publish;
mod sdk;
mod service;
mod timestamps;

pub use clock::{Clock, SystemClock};
pub use command::{CommandRunner, ShellCommandRunner};
pub use debounce::{DebounceTracker, TickOutcome, Timeouts, Transition};
pub use ingest::AlarmEventIngest;
pub use kind::{AlarmEvent, AlarmKind, AlarmState, DetectionRegion};
pub use monitor::{AlarmMonitor, TICK_INTERVAL};
pub use publish::{ALARM_TOPIC, AlarmTransport, publish_alarm_state};
pub use sdk::{
    AlarmEventHandler, AlarmSdk, DETECTION_RESOLUTION, NoOverlay, OverlaySink, PictureSize,
    SdkError, SdkResult, VideoResolution,
};
pub use service::AlarmService;
pub use timestamps::{AlarmTimestamps, NO_EVENT};
