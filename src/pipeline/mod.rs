// Frame loop orchestrator
//
// Single-threaded, synchronous: capture -> detect -> normalize ->
// classify -> stabilize -> (maybe) announce, then the next iteration.
// The speech side-effect blocks the loop for its full duration; frames
// are simply not read while an announcement plays. Announcements are
// gated by the refractory interval, so the stall is bounded and rare.
//
// The only mutable cross-frame state is the stabilizer tuple, confined
// to this loop. Shutdown is requested by clearing the shared running
// flag, checked once per iteration; unwinding drops the source and
// announcer, releasing their resources wherever the request landed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capture::FrameSource;
use crate::classify::ClassificationAdapter;
use crate::detect::HandDetector;
use crate::error::{log_capture_error, log_model_error, log_speech_error};
use crate::landmarks::normalize;
use crate::speech::Announcer;
use crate::stabilize::{CommitEvent, Observation, Stabilizer};

pub struct FrameLoop {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    adapter: ClassificationAdapter,
    stabilizer: Stabilizer,
    announcer: Box<dyn Announcer>,
    running: Arc<AtomicBool>,

    // State
    last_frame_time: Option<f64>,
    frames_processed: u64,
}

impl FrameLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        adapter: ClassificationAdapter,
        stabilizer: Stabilizer,
        announcer: Box<dyn Announcer>,
    ) -> Self {
        Self {
            source,
            detector,
            adapter,
            stabilizer,
            announcer,
            running: Arc::new(AtomicBool::new(true)),
            last_frame_time: None,
            frames_processed: 0,
        }
    }

    /// Shared flag controlling the loop. Clearing it from another thread
    /// (the exit key watcher) ends the run at the next iteration boundary.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run until the source is exhausted or shutdown is requested.
    ///
    /// Returns the committed label changes in order. A single frame read
    /// failure is logged and the iteration skipped; a speech failure is
    /// logged and the loop continues with the commit already recorded.
    pub fn run(&mut self) -> Vec<CommitEvent> {
        tracing::info!("[FrameLoop] Starting recognition loop");
        let mut commits = Vec::new();

        loop {
            if !self.running.load(Ordering::SeqCst) {
                tracing::info!("[FrameLoop] Shutdown requested, exiting");
                break;
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!(
                        "[FrameLoop] Frame source exhausted after {} frames",
                        self.frames_processed
                    );
                    break;
                }
                Err(err) => {
                    log_capture_error(&err, "next_frame");
                    continue;
                }
            };

            let now = frame.timestamp;
            if let Some(last) = self.last_frame_time {
                let fps = 1.0 / (now - last).max(1e-3);
                tracing::debug!("[FrameLoop] FPS: {:.1}", fps);
            }
            self.last_frame_time = Some(now);
            self.frames_processed += 1;

            let hands = self.detector.detect(&frame);
            let Some(hand) = hands.first() else {
                // No hand this frame: no observation, stabilizer untouched
                continue;
            };

            let features = normalize(hand);
            let prediction = match self.adapter.classify(&features) {
                Ok(prediction) => prediction,
                Err(err) => {
                    log_model_error(&err, "classify");
                    continue;
                }
            };

            tracing::debug!(
                "[FrameLoop] Frame {}: {} ({:.2})",
                frame.index,
                prediction.label,
                prediction.confidence
            );

            let observation = Observation {
                label: prediction.label,
                confidence: prediction.confidence,
                timestamp: now,
            };

            if let Some(commit) = self.stabilizer.observe(&observation) {
                tracing::info!(
                    "[FrameLoop] Committed '{}' at t={:.2}s",
                    commit.label,
                    commit.timestamp
                );
                // The commit stands regardless of what the announcer does
                if let Err(err) = self.announcer.announce(&commit.label) {
                    log_speech_error(&err, "announce");
                }
                commits.push(commit);
            }
        }

        commits
    }
}
