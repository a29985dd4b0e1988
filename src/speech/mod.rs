// Speech announcement port and backends
//
// A committed label change is pronounced synchronously: `announce` blocks
// until playback finishes, so commits are never spoken over each other.
// The refractory gating upstream keeps announcements sparse enough that
// blocking the loop is acceptable.
//
// Failures here are never fatal. A broken audio setup degrades the run
// to silent recognition, it does not stop it.

use std::process::Command;

use crate::config::SpeechConfig;
use crate::error::{log_speech_error, SpeechError};

/// Port for the external speech synthesizer
pub trait Announcer {
    /// Pronounce the label, blocking until audio output completes.
    fn announce(&mut self, label: &str) -> Result<(), SpeechError>;
}

/// Announcer that discards everything (audio disabled or unavailable)
#[derive(Debug, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&mut self, _label: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Announcer that records utterances in memory, for tests and diagnostics
#[derive(Debug, Default)]
pub struct MemoryAnnouncer {
    pub utterances: Vec<String>,
    /// When set, every announce call fails with a playback error
    pub fail: bool,
}

impl Announcer for MemoryAnnouncer {
    fn announce(&mut self, label: &str) -> Result<(), SpeechError> {
        if self.fail {
            return Err(SpeechError::PlaybackFailed {
                reason: "simulated playback failure".to_string(),
            });
        }
        self.utterances.push(label.to_string());
        Ok(())
    }
}

/// Announcer backed by the `espeak` synthesizer binary.
///
/// The child process plays the utterance and exits, so waiting on it gives
/// the blocking-until-played semantics the loop expects.
pub struct EspeakAnnouncer {
    voice: String,
}

impl EspeakAnnouncer {
    /// Probe the synthesizer binary and build the announcer.
    pub fn new(voice: &str) -> Result<Self, SpeechError> {
        let probe = Command::new("espeak").arg("--version").output();
        match probe {
            Ok(output) if output.status.success() => Ok(Self {
                voice: voice.to_string(),
            }),
            Ok(output) => Err(SpeechError::InitFailed {
                reason: format!("espeak probe exited with {}", output.status),
            }),
            Err(err) => Err(SpeechError::InitFailed {
                reason: format!("espeak not available: {}", err),
            }),
        }
    }
}

impl Announcer for EspeakAnnouncer {
    fn announce(&mut self, label: &str) -> Result<(), SpeechError> {
        let status = Command::new("espeak")
            .args(["-v", &self.voice])
            .arg(label)
            .status()
            .map_err(|err| SpeechError::SynthesisFailed {
                reason: err.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::PlaybackFailed {
                reason: format!("espeak exited with {}", status),
            })
        }
    }
}

/// Build the announcer for a run.
///
/// Audio disabled yields the null announcer. An audio init failure is a
/// recovered error: it is logged and the run continues muted.
pub fn init_announcer(config: &SpeechConfig) -> Box<dyn Announcer> {
    if !config.enabled {
        return Box::new(NullAnnouncer);
    }

    match EspeakAnnouncer::new(&config.voice) {
        Ok(announcer) => Box::new(announcer),
        Err(err) => {
            log_speech_error(&err, "init_announcer");
            tracing::warn!("[Speech] Continuing without audio");
            Box::new(NullAnnouncer)
        }
    }
}
