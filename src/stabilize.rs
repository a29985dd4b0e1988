//! Stabilizer - debounce state machine for label announcements
//!
//! Raw per-frame predictions are noisy: confidence dips, single-frame
//! misclassifications, and the same sign re-detected every frame. The
//! stabilizer turns that stream into sparse committed label changes.
//!
//! A commit fires only when the observation clears the confidence
//! threshold, differs from the last committed label, and falls outside the
//! refractory interval since the previous commit. The machine never
//! rejects an observation; it only gates whether a commit fires.

use serde::{Deserialize, Serialize};

/// One per-frame prediction with its capture timestamp (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: String,
    /// Probability mass the classifier assigned to this label (0.0-1.0)
    pub confidence: f32,
    pub timestamp: f64,
}

/// A confirmed label change, the trigger for the speech side-effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitEvent {
    pub label: String,
    pub timestamp: f64,
}

/// Debounce state machine.
///
/// State is the pair (last committed label, last commit timestamp),
/// mutated only by `observe` and confined to the frame loop thread.
#[derive(Debug)]
pub struct Stabilizer {
    confidence_threshold: f32,
    refractory_secs: f64,
    last_committed_label: Option<String>,
    last_commit_timestamp: f64,
}

impl Stabilizer {
    /// Minimum confidence for an observation to be commit-eligible
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.80;

    /// Minimum spacing between two commits, in seconds
    pub const DEFAULT_REFRACTORY_SECS: f64 = 0.75;

    pub fn new(confidence_threshold: f32, refractory_secs: f64) -> Self {
        Self {
            confidence_threshold,
            refractory_secs,
            last_committed_label: None,
            last_commit_timestamp: 0.0,
        }
    }

    /// Evaluate one observation against the gating rules.
    ///
    /// Returns the commit event when all gates pass; otherwise state is
    /// left untouched. Frames with no detected hand simply never reach
    /// this method, which leaves the state unchanged indefinitely.
    ///
    /// Gates:
    /// - confidence >= threshold
    /// - label differs from the last committed label
    /// - more than the refractory interval has elapsed since the last
    ///   commit (not applied before the first commit)
    pub fn observe(&mut self, observation: &Observation) -> Option<CommitEvent> {
        if observation.confidence < self.confidence_threshold {
            return None;
        }

        if self.last_committed_label.as_deref() == Some(observation.label.as_str()) {
            return None;
        }

        let refractory_elapsed =
            observation.timestamp - self.last_commit_timestamp > self.refractory_secs;
        if self.last_committed_label.is_some() && !refractory_elapsed {
            return None;
        }

        self.last_committed_label = Some(observation.label.clone());
        self.last_commit_timestamp = observation.timestamp;

        Some(CommitEvent {
            label: observation.label.clone(),
            timestamp: observation.timestamp,
        })
    }

    /// Last committed label, if any
    pub fn last_committed(&self) -> Option<&str> {
        self.last_committed_label.as_deref()
    }

    /// Timestamp of the last commit (0.0 before the first commit)
    pub fn last_commit_timestamp(&self) -> f64 {
        self.last_commit_timestamp
    }
}

impl Default for Stabilizer {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_CONFIDENCE_THRESHOLD,
            Self::DEFAULT_REFRACTORY_SECS,
        )
    }
}
