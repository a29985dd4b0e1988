// Hand detector port
//
// The landmark detector is an external capability: given a frame it
// returns zero or more ordered keypoint sets, already tracked across
// frames by the backend. `ScriptedDetector` replays recorded detections
// for the fixture harness and tests, honoring the configured minimum
// detection confidence the way a live backend would.

use crate::capture::Frame;
use crate::landmarks::{to_pixel_coordinates, LandmarkSet};

/// Port for the external hand-landmark detector
pub trait HandDetector {
    /// Detect hands in the frame. Keypoint sets are in pixel coordinates,
    /// ordered by the backend's own ranking (first is primary).
    fn detect(&mut self, frame: &Frame) -> Vec<LandmarkSet>;
}

/// A recorded detection for one frame: keypoints normalized to [0, 1]
/// plus the detector's own confidence in the detection.
#[derive(Debug, Clone)]
pub struct ScriptedHand {
    pub points: Vec<(f32, f32)>,
    pub confidence: f32,
}

/// Detector fake replaying a per-frame script.
///
/// Indexed by `Frame::index`, so skipped frames stay aligned with the
/// recording. Detections below the minimum confidence are dropped, which
/// is what a live backend's detection threshold does.
pub struct ScriptedDetector {
    script: Vec<Option<ScriptedHand>>,
    min_detection_confidence: f32,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Option<ScriptedHand>>, min_detection_confidence: f32) -> Self {
        Self {
            script,
            min_detection_confidence,
        }
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<LandmarkSet> {
        let entry = self.script.get(frame.index as usize).and_then(Option::as_ref);

        match entry {
            Some(hand) if hand.confidence >= self.min_detection_confidence => {
                vec![to_pixel_coordinates(&hand.points, frame.width, frame.height)]
            }
            Some(hand) => {
                tracing::debug!(
                    "[Detect] Dropping detection below confidence gate ({:.2} < {:.2})",
                    hand.confidence,
                    self.min_detection_confidence
                );
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u64) -> Frame {
        Frame {
            index,
            width: 100,
            height: 100,
            timestamp: index as f64 * 0.1,
            data: Vec::new(),
        }
    }

    fn hand(confidence: f32) -> ScriptedHand {
        ScriptedHand {
            points: vec![(0.5, 0.5), (0.6, 0.4)],
            confidence,
        }
    }

    #[test]
    fn test_scripted_detector_replays_by_frame_index() {
        let mut detector = ScriptedDetector::new(vec![None, Some(hand(0.9))], 0.5);

        assert!(detector.detect(&frame(0)).is_empty());

        let hands = detector.detect(&frame(1));
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].len(), 2);
        // 0.5 * 100 floored, in pixel space
        assert_eq!(hands[0][0].x, 50.0);
    }

    #[test]
    fn test_low_confidence_detection_is_dropped() {
        let mut detector = ScriptedDetector::new(vec![Some(hand(0.3))], 0.5);
        assert!(detector.detect(&frame(0)).is_empty());
    }

    #[test]
    fn test_out_of_script_frames_have_no_hands() {
        let mut detector = ScriptedDetector::new(vec![Some(hand(0.9))], 0.5);
        assert!(detector.detect(&frame(5)).is_empty());
    }
}
