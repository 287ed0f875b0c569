//! Interfaces to the vendor detection SDK and the overlay renderer.
//!
//! The SDK itself is a proprietary C library; these traits are the seam the
//! firmware's bindings implement and the tests replace.

use std::sync::Arc;

use thiserror::Error;

use super::kind::{AlarmEvent, AlarmKind};
use crate::Result;

/// Non-OK status code returned by a vendor SDK call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("vendor SDK status {0}")]
pub struct SdkError(pub i32);

pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Video resolutions the SDK can switch the detection channel to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoResolution {
    R640x360,
    R1280x720,
    R1920x1080,
}

/// Resolution the alarm feature runs its detectors at.
pub const DETECTION_RESOLUTION: VideoResolution = VideoResolution::R640x360;

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureSize {
    pub width: u32,
    pub height: u32,
}

/// Receives detection events from the vendor SDK.
///
/// Called on the SDK's own delivery thread, so implementations must not block.
pub trait AlarmEventHandler: Send + Sync {
    /// Handle one event. `None` mirrors the SDK delivering a null descriptor.
    fn on_alarm_event(&self, event: Option<&AlarmEvent>) -> Result<()>;
}

/// Alarm-related subset of the vendor SDK.
#[cfg_attr(test, mockall::automock)]
pub trait AlarmSdk: Send + Sync {
    /// Switch the detection channel resolution, returning the SDK's resolution type.
    fn change_resolution_type(&self, resolution: VideoResolution) -> SdkResult<u32>;

    /// Frame dimensions for a resolution type.
    fn picture_size(&self, resolution_type: u32) -> SdkResult<PictureSize>;

    fn alarm_init(&self, width: u32, height: u32) -> SdkResult<()>;

    fn set_alarm_sensitivity(&self, kind: AlarmKind, sensitivity: u32) -> SdkResult<()>;

    fn set_alarm_switch(&self, kind: AlarmKind, enabled: bool) -> SdkResult<()>;

    fn register_alarm_handler(&self, handler: Arc<dyn AlarmEventHandler>) -> SdkResult<()>;

    fn clear_alarm_handler(&self, handler: &Arc<dyn AlarmEventHandler>) -> SdkResult<()>;

    fn alarm_exit(&self) -> SdkResult<()>;
}

/// Draws detection rectangles on the video overlay.
pub trait OverlaySink: Send + Sync {
    fn on_alarm_event(&self, event: &AlarmEvent) -> Result<()>;
}

/// Overlay that draws nothing, for builds without OSD support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverlay;

impl OverlaySink for NoOverlay {
    fn on_alarm_event(&self, _event: &AlarmEvent) -> Result<()> {
        Ok(())
    }
}
