// Speech error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Speech error code constants
///
/// Error code range: 3001-3003
pub struct SpeechErrorCodes {}

impl SpeechErrorCodes {
    /// Audio subsystem could not be initialized
    pub const INIT_FAILED: i32 = 3001;

    /// Synthesizing an utterance failed
    pub const SYNTHESIS_FAILED: i32 = 3002;

    /// Playback of a synthesized utterance failed
    pub const PLAYBACK_FAILED: i32 = 3003;
}

/// Log a speech error with structured context
///
/// Speech errors are never fatal: the loop continues without audio.
pub fn log_speech_error(err: &SpeechError, context: &str) {
    error!(
        "Speech error in {}: code={}, component=Announcer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Speech-related errors
///
/// Error code range: 3001-3003
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechError {
    /// Audio subsystem could not be initialized (continue without audio)
    InitFailed { reason: String },

    /// Synthesizing an utterance failed (log, continue)
    SynthesisFailed { reason: String },

    /// Playback of a synthesized utterance failed (log, continue)
    PlaybackFailed { reason: String },
}

impl ErrorCode for SpeechError {
    fn code(&self) -> i32 {
        match self {
            SpeechError::InitFailed { .. } => SpeechErrorCodes::INIT_FAILED,
            SpeechError::SynthesisFailed { .. } => SpeechErrorCodes::SYNTHESIS_FAILED,
            SpeechError::PlaybackFailed { .. } => SpeechErrorCodes::PLAYBACK_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            SpeechError::InitFailed { reason } => {
                format!("Audio init warning: {}", reason)
            }
            SpeechError::SynthesisFailed { reason } => {
                format!("Speech synthesis failed: {}", reason)
            }
            SpeechError::PlaybackFailed { reason } => {
                format!("Speech playback failed: {}", reason)
            }
        }
    }
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpeechError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for SpeechError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_codes() {
        assert_eq!(
            SpeechError::InitFailed {
                reason: "no device".to_string()
            }
            .code(),
            SpeechErrorCodes::INIT_FAILED
        );
        assert_eq!(
            SpeechError::SynthesisFailed {
                reason: "binary missing".to_string()
            }
            .code(),
            SpeechErrorCodes::SYNTHESIS_FAILED
        );
        assert_eq!(
            SpeechError::PlaybackFailed {
                reason: "device busy".to_string()
            }
            .code(),
            SpeechErrorCodes::PLAYBACK_FAILED
        );
    }

    #[test]
    fn test_speech_error_display() {
        let err = SpeechError::SynthesisFailed {
            reason: "espeak exited with status 1".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("3002"));
        assert!(display.contains("espeak"));
    }
}
