//! Fixture utilities for the deterministic CLI harness.
//!
//! This module discovers fixture assets, loads recorded landmark traces,
//! parses optional expectation JSON, and runs the recognition pipeline
//! over the replayed frames. It is intentionally desktop-focused to
//! support CI and QA workflows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::capture::ReplaySource;
use crate::classify::{ClassificationAdapter, GestureClassifier};
use crate::config::AppConfig;
use crate::detect::{ScriptedDetector, ScriptedHand};
use crate::labels::LabelVocabulary;
use crate::pipeline::FrameLoop;
use crate::speech::{Announcer, NullAnnouncer};
use crate::stabilize::{CommitEvent, Stabilizer};

/// Default location for fixture trace/JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

const TRACE_SUFFIX: &str = ".trace.json";

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub trace_path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// One recorded frame: capture timestamp plus the detector output, if a
/// hand was visible. Keypoints are normalized to [0, 1].
#[derive(Debug, Clone, Deserialize)]
pub struct TraceFrame {
    pub t: f64,
    #[serde(default)]
    pub hand: Option<Vec<[f32; 2]>>,
    #[serde(default = "default_detection_confidence")]
    pub confidence: f32,
}

fn default_detection_confidence() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct TraceFile {
    #[serde(default = "default_frame_width")]
    width: u32,
    #[serde(default = "default_frame_height")]
    height: u32,
    frames: Vec<TraceFrame>,
}

fn default_frame_width() -> u32 {
    640
}

fn default_frame_height() -> u32 {
    480
}

/// Loaded fixture data with decoded trace frames.
pub struct FixtureData {
    pub metadata: FixtureMetadata,
    pub width: u32,
    pub height: u32,
    pub frames: Vec<TraceFrame>,
    pub expectations: Option<FixtureExpectations>,
}

/// JSON expectation schema for fixture verification.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureExpectations {
    pub fixture: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub events: Vec<ExpectedCommit>,
}

impl FixtureExpectations {
    pub fn verify(&self, actual: &[CommitEvent]) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        for (idx, expected) in self.events.iter().enumerate() {
            match actual.get(idx) {
                Some(event) => {
                    let delta = (event.timestamp - expected.timestamp).abs();
                    if event.label != expected.label || delta > expected.tolerance_secs {
                        failures.push(ExpectationFailure {
                            index: idx,
                            expected: expected.clone(),
                            actual: Some(event.clone()),
                            delta_secs: Some(delta),
                        });
                    }
                }
                None => failures.push(ExpectationFailure {
                    index: idx,
                    expected: expected.clone(),
                    actual: None,
                    delta_secs: None,
                }),
            }
        }

        if actual.len() > self.events.len() {
            for (idx, event) in actual.iter().enumerate().skip(self.events.len()) {
                failures.push(ExpectationFailure {
                    index: idx,
                    expected: ExpectedCommit {
                        label: String::new(),
                        timestamp: event.timestamp,
                        tolerance_secs: 0.0,
                    },
                    actual: Some(event.clone()),
                    delta_secs: Some(0.0),
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Expected commit event definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedCommit {
    pub label: String,
    pub timestamp: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: f64,
}

fn default_tolerance() -> f64 {
    0.05
}

/// Outcome of comparing actual results with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "index": failure.index,
                    "expected": {
                        "label": failure.expected.label,
                        "timestamp": failure.expected.timestamp,
                        "tolerance_secs": failure.expected.tolerance_secs,
                    },
                    "actual": failure.actual,
                    "delta_secs": failure.delta_secs,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single failure.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub index: usize,
    pub expected: ExpectedCommit,
    pub actual: Option<CommitEvent>,
    pub delta_secs: Option<f64>,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let path = entry.path();
                let file_name = entry.file_name();
                if let Some(name) = file_name
                    .to_str()
                    .and_then(|n| n.strip_suffix(TRACE_SUFFIX))
                {
                    let expect = self.root.join(format!("{name}.expect.json"));
                    fixtures.push(FixtureMetadata {
                        name: name.to_string(),
                        trace_path: path.clone(),
                        expect_path: expect.exists().then_some(expect),
                    });
                }
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load fixture frames + expectations for provided name or path.
    pub fn load(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<FixtureData> {
        let trace_path = self.resolve_fixture_path(fixture)?;
        let metadata = self.metadata_for_path(&trace_path)?;

        let json = fs::read_to_string(&trace_path)
            .with_context(|| format!("reading trace {}", trace_path.display()))?;
        let trace: TraceFile = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", trace_path.display()))?;

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("reading expectation {}", path.display()))?;
                Some(
                    serde_json::from_str(&json)
                        .with_context(|| format!("parsing {}", path.display()))?,
                )
            }
            None => None,
        };

        Ok(FixtureData {
            metadata,
            width: trace.width,
            height: trace.height,
            frames: trace.frames,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let as_path = Path::new(fixture);
        if as_path.exists() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}{TRACE_SUFFIX}"));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Fixture '{fixture}' not found in {}",
                self.root.display()
            ))
        }
    }

    fn metadata_for_path(&self, trace_path: &Path) -> Result<FixtureMetadata> {
        let file_name = trace_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Invalid fixture name for {}", trace_path.display()))?;
        let name = file_name
            .strip_suffix(TRACE_SUFFIX)
            .unwrap_or(file_name)
            .to_string();
        let expect_path = trace_path.with_file_name(format!("{name}.expect.json"));
        Ok(FixtureMetadata {
            name,
            trace_path: trace_path.to_path_buf(),
            expect_path: expect_path.exists().then_some(expect_path),
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

/// Executes fixtures by feeding recorded trace frames through the
/// recognition pipeline.
pub struct FixtureProcessor {
    config: AppConfig,
}

impl FixtureProcessor {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Replay the trace silently and return the committed events.
    pub fn run(
        &self,
        data: &FixtureData,
        classifier: Box<dyn GestureClassifier>,
        vocabulary: LabelVocabulary,
    ) -> Result<Vec<CommitEvent>> {
        self.run_with_announcer(data, classifier, vocabulary, Box::new(NullAnnouncer))
    }

    /// Replay the trace, dispatching commits to the given announcer.
    pub fn run_with_announcer(
        &self,
        data: &FixtureData,
        classifier: Box<dyn GestureClassifier>,
        vocabulary: LabelVocabulary,
        announcer: Box<dyn Announcer>,
    ) -> Result<Vec<CommitEvent>> {
        if data.frames.is_empty() {
            return Ok(Vec::new());
        }

        let mut frame_loop = self.build_loop(data, classifier, vocabulary, announcer);
        Ok(frame_loop.run())
    }

    /// Assemble the frame loop for a trace without running it, so callers
    /// can wire the shutdown flag first.
    pub fn build_loop(
        &self,
        data: &FixtureData,
        classifier: Box<dyn GestureClassifier>,
        vocabulary: LabelVocabulary,
        announcer: Box<dyn Announcer>,
    ) -> FrameLoop {
        let timestamps: Vec<f64> = data.frames.iter().map(|f| f.t).collect();
        let script: Vec<Option<ScriptedHand>> = data
            .frames
            .iter()
            .map(|frame| {
                frame.hand.as_ref().map(|points| ScriptedHand {
                    points: points.iter().map(|p| (p[0], p[1])).collect(),
                    confidence: frame.confidence,
                })
            })
            .collect();

        let source = ReplaySource::new(timestamps, data.width, data.height);
        let detector =
            ScriptedDetector::new(script, self.config.detector.min_detection_confidence);
        let adapter = ClassificationAdapter::new(classifier, vocabulary);
        let stabilizer = Stabilizer::new(
            self.config.recognition.confidence_threshold,
            self.config.recognition.refractory_secs,
        );

        FrameLoop::new(
            Box::new(source),
            Box::new(detector),
            adapter,
            stabilizer,
            announcer,
        )
    }
}
