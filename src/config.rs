//! Configuration management for runtime parameter tuning
//!
//! This module provides configuration loading from JSON files, enabling
//! threshold adjustments without recompilation. Key parameters for
//! recognition gating, detection confidence, and speech can be tuned via
//! the config file or overridden from the command line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub capture: CaptureConfig,
    pub detector: DetectorConfig,
    pub recognition: RecognitionConfig,
    pub speech: SpeechConfig,
}

/// Frame capture parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Video device index to open for live capture
    pub camera_index: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { camera_index: 0 }
    }
}

/// Hand detector gating parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum confidence for a detection to be accepted
    pub min_detection_confidence: f32,
    /// Minimum confidence for cross-frame tracking to be kept
    pub min_tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

/// Recognition stabilization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Minimum classifier confidence for a commit to fire
    pub confidence_threshold: f32,
    /// Minimum spacing between two commits, in seconds
    pub refractory_secs: f64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.80,
            refractory_secs: 0.75,
        }
    }
}

/// Speech output parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Whether announcements are spoken at all
    pub enabled: bool,
    /// Synthesizer voice identifier
    pub voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            voice: "en".to_string(),
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            detector: DetectorConfig::default(),
            recognition: RecognitionConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing or unparsable file logs a warning and falls back to the
    /// defaults, so a fresh checkout runs without any config on disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.capture.camera_index, 0);
        assert_eq!(config.detector.min_detection_confidence, 0.5);
        assert_eq!(config.detector.min_tracking_confidence, 0.5);
        assert_eq!(config.recognition.confidence_threshold, 0.80);
        assert_eq!(config.recognition.refractory_secs, 0.75);
        assert!(config.speech.enabled);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.recognition.confidence_threshold,
            config.recognition.confidence_threshold
        );
        assert_eq!(parsed.speech.voice, config.speech.voice);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/signspeak.json");
        assert_eq!(config.recognition.refractory_secs, 0.75);
    }
}
