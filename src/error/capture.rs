// Capture error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Capture error code constants
///
/// Error code range: 1001-1004
pub struct CaptureErrorCodes {}

impl CaptureErrorCodes {
    /// Video device could not be opened at startup
    pub const DEVICE_UNAVAILABLE: i32 = 1001;

    /// Recorded landmark trace file missing or unreadable
    pub const TRACE_UNAVAILABLE: i32 = 1002;

    /// A single frame read failed
    pub const FRAME_READ_FAILED: i32 = 1003;

    /// Frame source was closed while the loop was still running
    pub const SOURCE_CLOSED: i32 = 1004;
}

/// Log a capture error with structured context
pub fn log_capture_error(err: &CaptureError, context: &str) {
    error!(
        "Capture error in {}: code={}, component=FrameSource, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Capture-related errors
///
/// These errors cover frame source operations: opening a device or trace,
/// reading individual frames, and shutdown.
///
/// Error code range: 1001-1004
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Video device could not be opened at startup (fatal)
    DeviceUnavailable { index: u32 },

    /// Recorded landmark trace file missing or unreadable (fatal)
    TraceUnavailable { path: String },

    /// A single frame read failed (recoverable; skip the iteration)
    FrameReadFailed { reason: String },

    /// Frame source was closed while the loop was still running
    SourceClosed,
}

impl ErrorCode for CaptureError {
    fn code(&self) -> i32 {
        match self {
            CaptureError::DeviceUnavailable { .. } => CaptureErrorCodes::DEVICE_UNAVAILABLE,
            CaptureError::TraceUnavailable { .. } => CaptureErrorCodes::TRACE_UNAVAILABLE,
            CaptureError::FrameReadFailed { .. } => CaptureErrorCodes::FRAME_READ_FAILED,
            CaptureError::SourceClosed => CaptureErrorCodes::SOURCE_CLOSED,
        }
    }

    fn message(&self) -> String {
        match self {
            CaptureError::DeviceUnavailable { index } => {
                format!(
                    "Cannot access camera device {}. Check permissions and connection.",
                    index
                )
            }
            CaptureError::TraceUnavailable { path } => {
                format!("Landmark trace not found or unreadable: {}", path)
            }
            CaptureError::FrameReadFailed { reason } => {
                format!("Frame read failed: {}", reason)
            }
            CaptureError::SourceClosed => "Frame source closed".to_string(),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CaptureError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for CaptureError {}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::FrameReadFailed {
            reason: err.to_string(),
        }
    }
}
