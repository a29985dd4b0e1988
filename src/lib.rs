// Signspeak Core - hand-sign recognition and announcement pipeline
// Frames in, stable spoken label changes out

// Module declarations
pub mod capture;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod fixtures;
pub mod labels;
pub mod landmarks;
pub mod model;
pub mod pipeline;
pub mod speech;
pub mod stabilize;

// Re-exports for convenience
pub use classify::{ClassificationAdapter, GestureClassifier, Prediction};
pub use config::AppConfig;
pub use labels::LabelVocabulary;
pub use pipeline::FrameLoop;
pub use stabilize::{CommitEvent, Observation, Stabilizer};

/// Initialize logging for binaries and tests.
///
/// Respects `RUST_LOG`; defaults to info-level output when unset.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
