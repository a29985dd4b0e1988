// Frame source abstractions
//
// The pipeline pulls timestamped frames from a `FrameSource` port.
// Two backends are provided:
// - `ReplaySource`: deterministic replay of recorded frame timing, used by
//   the fixture harness and CI.
// - `CameraSource`: holds the video device node open for the lifetime of
//   the run. Pixel payloads are produced by the platform capture layer;
//   this backend validates device access at startup and paces timestamps.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use crate::error::CaptureError;

/// One captured frame.
///
/// Owned transiently by the current loop iteration; `data` may be empty
/// when the backend does not deliver pixels (replay, stub capture).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic frame counter within the run
    pub index: u64,
    pub width: u32,
    pub height: u32,
    /// Capture timestamp in seconds since the source was opened
    pub timestamp: f64,
    pub data: Vec<u8>,
}

/// Port for anything that produces frames.
///
/// `next_frame` returns `Ok(None)` when the stream ends (a finite replay,
/// a disconnected device). A `FrameReadFailed` error is local to one
/// frame: callers skip the iteration and try again. Resources are
/// released on drop, so the loop can unwind from any point.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError>;
}

/// Deterministic source replaying a recorded sequence of frame timestamps
pub struct ReplaySource {
    timestamps: Vec<f64>,
    width: u32,
    height: u32,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(timestamps: Vec<f64>, width: u32, height: u32) -> Self {
        Self {
            timestamps,
            width,
            height,
            cursor: 0,
        }
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let Some(&timestamp) = self.timestamps.get(self.cursor) else {
            return Ok(None);
        };
        let frame = Frame {
            index: self.cursor as u64,
            width: self.width,
            height: self.height,
            timestamp,
            data: Vec::new(),
        };
        self.cursor += 1;
        Ok(Some(frame))
    }
}

/// Live capture backend bound to a video device node.
///
/// Opening fails fast when the device is absent, which is the fatal
/// startup condition for live runs. The handle is held for the lifetime
/// of the source and released on drop.
pub struct CameraSource {
    _device: File,
    device_path: PathBuf,
    width: u32,
    height: u32,
    opened_at: Instant,
    frames_delivered: u64,
}

impl CameraSource {
    /// Open the camera at the given device index.
    pub fn open(index: u32) -> Result<Self, CaptureError> {
        let device_path = PathBuf::from(format!("/dev/video{}", index));
        let device = File::open(&device_path)
            .map_err(|_| CaptureError::DeviceUnavailable { index })?;

        tracing::info!("[Capture] Opened {}", device_path.display());

        Ok(Self {
            _device: device,
            device_path,
            width: 640,
            height: 480,
            opened_at: Instant::now(),
            frames_delivered: 0,
        })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        // Pixel decode is delegated to the platform capture layer; frames
        // from this backend carry timing only.
        let frame = Frame {
            index: self.frames_delivered,
            width: self.width,
            height: self.height,
            timestamp: self.opened_at.elapsed().as_secs_f64(),
            data: Vec::new(),
        };
        self.frames_delivered += 1;
        Ok(Some(frame))
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        tracing::info!("[Capture] Released {}", self.device_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_source_yields_frames_in_order() {
        let mut source = ReplaySource::new(vec![0.0, 0.1, 0.2], 640, 480);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.timestamp, 0.0);
        assert_eq!(first.width, 640);

        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.timestamp, 0.1);
    }

    #[test]
    fn test_replay_source_ends_cleanly() {
        let mut source = ReplaySource::new(vec![0.0], 320, 240);

        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
        // Stays exhausted
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_camera_source_missing_device_is_fatal() {
        // Device index chosen to not exist on any test machine
        let result = CameraSource::open(9999);
        assert!(matches!(
            result,
            Err(CaptureError::DeviceUnavailable { index: 9999 })
        ));
    }
}
