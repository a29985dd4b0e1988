// Model loading and the reference classifier backend
//
// Resolution order: the configured primary path, then the legacy fallback
// path, then a fatal error naming both. This mirrors how deployments
// migrate between model formats without breaking older installs.
//
// The reference backend is a linear layer with softmax output stored as
// JSON. Anything implementing `classify::GestureClassifier` can replace it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::classify::GestureClassifier;
use crate::error::ModelError;

/// Default primary model path
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Legacy fallback model path, consulted when the primary is absent
pub const LEGACY_MODEL_PATH: &str = "model_v2.json";

/// Resolve the model file to load: primary first, then the legacy fallback.
///
/// Returns `ModelError::NotFound` naming both attempted paths when neither
/// exists.
pub fn resolve_model_path(primary: &Path) -> Result<PathBuf, ModelError> {
    resolve_with_fallback(primary, Path::new(LEGACY_MODEL_PATH))
}

fn resolve_with_fallback(primary: &Path, fallback: &Path) -> Result<PathBuf, ModelError> {
    if primary.exists() {
        return Ok(primary.to_path_buf());
    }
    if fallback.exists() {
        tracing::info!(
            "[Model] {} missing, falling back to legacy model {}",
            primary.display(),
            fallback.display()
        );
        return Ok(fallback.to_path_buf());
    }
    Err(ModelError::NotFound {
        primary: primary.to_path_buf(),
        fallback: fallback.to_path_buf(),
    })
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    input_width: usize,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Linear-softmax classifier backend loaded from a JSON weight file
///
/// One weight row per output channel; inference computes W·x + b and
/// applies a numerically stable softmax so the output is a probability
/// distribution over the label index space.
pub struct LinearModel {
    input_width: usize,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearModel {
    /// Load a model, applying the primary/legacy resolution order.
    pub fn load(primary: &Path) -> Result<Self, ModelError> {
        let path = resolve_model_path(primary)?;
        let contents = fs::read_to_string(&path).map_err(|err| ModelError::LoadFailed {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        let file: ModelFile = serde_json::from_str(&contents)?;
        let model = Self::from_parts(file.input_width, file.weights, file.bias)?;
        tracing::info!(
            "[Model] Loaded {} ({} inputs, {} output channels)",
            path.display(),
            model.input_width,
            model.output_width()
        );
        Ok(model)
    }

    /// Build a model from in-memory weights, validating shapes.
    pub fn from_parts(
        input_width: usize,
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
    ) -> Result<Self, ModelError> {
        if weights.is_empty() {
            return Err(ModelError::MalformedWeights {
                reason: "weight matrix has no rows".to_string(),
            });
        }
        if bias.len() != weights.len() {
            return Err(ModelError::MalformedWeights {
                reason: format!(
                    "bias length {} does not match {} weight rows",
                    bias.len(),
                    weights.len()
                ),
            });
        }
        for (i, row) in weights.iter().enumerate() {
            if row.len() != input_width {
                return Err(ModelError::MalformedWeights {
                    reason: format!(
                        "weight row {} has {} columns, expected {}",
                        i,
                        row.len(),
                        input_width
                    ),
                });
            }
        }
        Ok(Self {
            input_width,
            weights,
            bias,
        })
    }
}

impl GestureClassifier for LinearModel {
    fn infer(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
        if features.len() != self.input_width {
            return Err(ModelError::InferenceFailed {
                reason: format!(
                    "feature vector length {} does not match model input width {}",
                    features.len(),
                    self.input_width
                ),
            });
        }

        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();

        // Stable softmax: shift by the max logit before exponentiating
        let max_logit = logits.iter().fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
        let exps: Vec<f32> = logits.iter().map(|&v| (v - max_logit).exp()).collect();
        let sum: f32 = exps.iter().sum();

        Ok(exps.into_iter().map(|v| v / sum).collect())
    }

    fn output_width(&self) -> usize {
        self.weights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(name)
    }

    fn write_file(path: &Path, contents: &str) {
        let mut file = fs::File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_resolve_prefers_primary() {
        let primary = temp_path("signspeak_model_primary.json");
        let fallback = temp_path("signspeak_model_fallback.json");
        write_file(&primary, "{}");
        write_file(&fallback, "{}");

        let resolved = resolve_with_fallback(&primary, &fallback).unwrap();
        assert_eq!(resolved, primary);
    }

    #[test]
    fn test_resolve_falls_back_to_legacy() {
        let primary = temp_path("signspeak_model_absent.json");
        let fallback = temp_path("signspeak_model_legacy_only.json");
        let _ = fs::remove_file(&primary);
        write_file(&fallback, "{}");

        let resolved = resolve_with_fallback(&primary, &fallback).unwrap();
        assert_eq!(resolved, fallback);
    }

    #[test]
    fn test_resolve_fatal_names_both_paths() {
        let primary = temp_path("signspeak_model_gone_a.json");
        let fallback = temp_path("signspeak_model_gone_b.json");
        let _ = fs::remove_file(&primary);
        let _ = fs::remove_file(&fallback);

        match resolve_with_fallback(&primary, &fallback) {
            Err(ModelError::NotFound {
                primary: p,
                fallback: f,
            }) => {
                assert_eq!(p, primary);
                assert_eq!(f, fallback);
            }
            other => panic!("Expected NotFound, got {:?}", other.map(|p| p.display().to_string())),
        }
    }

    #[test]
    fn test_infer_returns_probability_distribution() {
        let model = LinearModel::from_parts(
            2,
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
            vec![0.0, 0.0, 0.0],
        )
        .unwrap();

        let probs = model.infer(&[2.0, -1.0]).unwrap();

        assert_eq!(probs.len(), 3);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "probabilities sum to {}", sum);
        assert!(probs.iter().all(|&p| p >= 0.0));
        // Channel 0 aligns with the feature vector, so it should dominate
        assert!(probs[0] > probs[1]);
        assert!(probs[0] > probs[2]);
    }

    #[test]
    fn test_infer_rejects_wrong_feature_length() {
        let model = LinearModel::from_parts(4, vec![vec![0.0; 4]], vec![0.0]).unwrap();
        let result = model.infer(&[1.0, 2.0]);
        assert!(matches!(result, Err(ModelError::InferenceFailed { .. })));
    }

    #[test]
    fn test_from_parts_rejects_ragged_weights() {
        let result = LinearModel::from_parts(3, vec![vec![0.0; 3], vec![0.0; 2]], vec![0.0, 0.0]);
        assert!(matches!(result, Err(ModelError::MalformedWeights { .. })));
    }

    #[test]
    fn test_from_parts_rejects_bias_mismatch() {
        let result = LinearModel::from_parts(2, vec![vec![0.0; 2]], vec![0.0, 1.0]);
        assert!(matches!(result, Err(ModelError::MalformedWeights { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = temp_path("signspeak_model_malformed.json");
        write_file(&path, "{not json");

        match LinearModel::load(&path) {
            Err(ModelError::MalformedWeights { .. }) => {}
            other => panic!(
                "Expected MalformedWeights, got {:?}",
                other.err().map(|e| e.to_string())
            ),
        }
    }
}
