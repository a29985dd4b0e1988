// Model error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;
use std::path::PathBuf;

/// Model error code constants
///
/// Error code range: 2001-2004
pub struct ModelErrorCodes {}

impl ModelErrorCodes {
    /// Neither the primary nor the legacy model file exists
    pub const NOT_FOUND: i32 = 2001;

    /// Model file exists but could not be read
    pub const LOAD_FAILED: i32 = 2002;

    /// Model file parsed but its contents are inconsistent
    pub const MALFORMED_WEIGHTS: i32 = 2003;

    /// Inference rejected the input
    pub const INFERENCE_FAILED: i32 = 2004;
}

/// Log a model error with structured context
pub fn log_model_error(err: &ModelError, context: &str) {
    error!(
        "Model error in {}: code={}, component=GestureClassifier, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Model-related errors
///
/// These errors cover model file resolution, weight loading, and inference.
/// `NotFound` names both attempted paths so the user can see exactly what
/// was searched.
///
/// Error code range: 2001-2004
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Neither the primary nor the legacy model file exists (fatal)
    NotFound { primary: PathBuf, fallback: PathBuf },

    /// Model file exists but could not be read (fatal)
    LoadFailed { path: PathBuf, reason: String },

    /// Model file parsed but its contents are inconsistent (fatal)
    MalformedWeights { reason: String },

    /// Inference rejected the input (e.g. wrong feature vector length)
    InferenceFailed { reason: String },
}

impl ErrorCode for ModelError {
    fn code(&self) -> i32 {
        match self {
            ModelError::NotFound { .. } => ModelErrorCodes::NOT_FOUND,
            ModelError::LoadFailed { .. } => ModelErrorCodes::LOAD_FAILED,
            ModelError::MalformedWeights { .. } => ModelErrorCodes::MALFORMED_WEIGHTS,
            ModelError::InferenceFailed { .. } => ModelErrorCodes::INFERENCE_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            ModelError::NotFound { primary, fallback } => {
                format!(
                    "Model not found: {} (legacy fallback {} also missing). Train first or provide a model path.",
                    primary.display(),
                    fallback.display()
                )
            }
            ModelError::LoadFailed { path, reason } => {
                format!("Failed to load model {}: {}", path.display(), reason)
            }
            ModelError::MalformedWeights { reason } => {
                format!("Malformed model weights: {}", reason)
            }
            ModelError::InferenceFailed { reason } => {
                format!("Inference failed: {}", reason)
            }
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for ModelError {}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::MalformedWeights {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_codes() {
        assert_eq!(
            ModelError::NotFound {
                primary: PathBuf::from("model.json"),
                fallback: PathBuf::from("model_v2.json"),
            }
            .code(),
            ModelErrorCodes::NOT_FOUND
        );
        assert_eq!(
            ModelError::InferenceFailed {
                reason: "bad length".to_string()
            }
            .code(),
            ModelErrorCodes::INFERENCE_FAILED
        );
    }

    #[test]
    fn test_not_found_names_both_paths() {
        let err = ModelError::NotFound {
            primary: PathBuf::from("model.json"),
            fallback: PathBuf::from("model_v2.json"),
        };
        let msg = err.message();
        assert!(msg.contains("model.json"));
        assert!(msg.contains("model_v2.json"));
    }

    #[test]
    fn test_from_serde_error() {
        let bad: Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: ModelError = bad.unwrap_err().into();
        assert_eq!(err.code(), ModelErrorCodes::MALFORMED_WEIGHTS);
    }
}
