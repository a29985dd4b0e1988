// Landmark normalization - translation- and scale-invariant features
//
// Algorithm:
// 1. Subtract the wrist (point 0) from every point
// 2. Flatten to [x0, y0, x1, y1, ...] preserving point order
// 3. Divide every component by the maximum absolute component
//
// The output is invariant under uniform translation and uniform positive
// scaling of the input set, which makes the classifier robust to hand
// position and distance from the camera.

use crate::landmarks::Landmark;

/// Produce a feature vector of length 2N from N landmarks.
///
/// Point 0 always normalizes to (0, 0); the maximum absolute component of
/// the result is 1.0 unless all points coincide, in which case the
/// flattened zeros are returned unchanged (no division by zero).
///
/// # Arguments
/// * `landmarks` - Non-empty ordered keypoint set in pixel coordinates
pub fn normalize(landmarks: &[Landmark]) -> Vec<f32> {
    debug_assert!(!landmarks.is_empty(), "landmark set must be non-empty");

    let base = landmarks[0];

    let mut features = Vec::with_capacity(landmarks.len() * 2);
    for point in landmarks {
        features.push(point.x - base.x);
        features.push(point.y - base.y);
    }

    let max_magnitude = features.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
    if max_magnitude == 0.0 {
        // Degenerate: all points coincide
        return features;
    }

    for value in &mut features {
        *value /= max_magnitude;
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn sample_hand() -> Vec<Landmark> {
        vec![
            Landmark::new(120.0, 200.0),
            Landmark::new(140.0, 180.0),
            Landmark::new(160.0, 150.0),
            Landmark::new(175.0, 120.0),
            Landmark::new(185.0, 100.0),
            Landmark::new(150.0, 110.0),
        ]
    }

    fn shift(landmarks: &[Landmark], dx: f32, dy: f32) -> Vec<Landmark> {
        landmarks
            .iter()
            .map(|p| Landmark::new(p.x + dx, p.y + dy))
            .collect()
    }

    fn scale(landmarks: &[Landmark], k: f32) -> Vec<Landmark> {
        landmarks
            .iter()
            .map(|p| Landmark::new(p.x * k, p.y * k))
            .collect()
    }

    fn assert_close(a: &[f32], b: &[f32]) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!(
                (x - y).abs() < 1e-5,
                "component {} differs: {} vs {}",
                i,
                x,
                y
            );
        }
    }

    #[test]
    fn test_output_length_is_twice_point_count() {
        let features = normalize(&sample_hand());
        assert_eq!(features.len(), sample_hand().len() * 2);
    }

    #[test]
    fn test_wrist_normalizes_to_origin() {
        let features = normalize(&sample_hand());
        assert_eq!(features[0], 0.0);
        assert_eq!(features[1], 0.0);
    }

    #[test]
    fn test_max_magnitude_is_one() {
        let features = normalize(&sample_hand());
        let max = features.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
        assert!((max - 1.0).abs() < 1e-6, "expected max 1.0, got {}", max);
    }

    #[test]
    fn test_translation_invariance() {
        let hand = sample_hand();
        let base = normalize(&hand);

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let dx = rng.gen_range(-500.0..500.0);
            let dy = rng.gen_range(-500.0..500.0);
            let shifted = normalize(&shift(&hand, dx, dy));
            assert_close(&base, &shifted);
        }
    }

    #[test]
    fn test_scale_invariance() {
        let hand = sample_hand();
        let base = normalize(&hand);

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let k = rng.gen_range(0.01..100.0);
            let scaled = normalize(&scale(&hand, k));
            assert_close(&base, &scaled);
        }
    }

    #[test]
    fn test_combined_shift_and_scale_invariance() {
        let hand = sample_hand();
        let base = normalize(&hand);
        let transformed = normalize(&shift(&scale(&hand, 3.5), 42.0, -17.0));
        assert_close(&base, &transformed);
    }

    #[test]
    fn test_degenerate_all_points_identical() {
        let hand = vec![Landmark::new(50.0, 50.0); 21];
        let features = normalize(&hand);

        assert_eq!(features.len(), 42);
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_single_point_yields_zero_vector() {
        let features = normalize(&[Landmark::new(300.0, 200.0)]);
        assert_eq!(features, vec![0.0, 0.0]);
    }
}
