// Hand landmark types and indices
//
// A detected hand arrives as an ordered set of 21 keypoints in the
// detector's topology: wrist first, then four joints per finger. The
// indices below follow that convention so downstream code can address
// individual joints by name.

pub mod normalize;

pub use normalize::normalize;

use serde::{Deserialize, Serialize};

/// Number of keypoints in a single hand detection
pub const HAND_LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single detected keypoint in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ordered keypoint set for one detected hand, owned by the current frame
pub type LandmarkSet = Vec<Landmark>;

/// Convert detector output (coordinates normalized to [0, 1]) into pixel
/// coordinates clamped to the frame bounds.
///
/// Detectors report keypoints as fractions of the frame; classification
/// works in pixel space, so each coordinate is scaled by the frame
/// dimension and clamped to the last valid pixel.
pub fn to_pixel_coordinates(
    points: &[(f32, f32)],
    frame_width: u32,
    frame_height: u32,
) -> LandmarkSet {
    let max_x = frame_width.saturating_sub(1) as f32;
    let max_y = frame_height.saturating_sub(1) as f32;

    points
        .iter()
        .map(|&(x, y)| {
            Landmark::new(
                (x * frame_width as f32).floor().clamp(0.0, max_x),
                (y * frame_height as f32).floor().clamp(0.0, max_y),
            )
        })
        .collect()
}
