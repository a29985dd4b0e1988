use std::fs;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use signspeak::config::AppConfig;
use signspeak::fixtures::{ExpectationDiff, FixtureCatalog, FixtureProcessor};
use signspeak::labels::{LabelVocabulary, DEFAULT_LABELS_PATH};
use signspeak::model::{LinearModel, DEFAULT_MODEL_PATH};
use signspeak::speech;
use signspeak::stabilize::CommitEvent;

#[derive(Parser, Debug)]
#[command(
    name = "signspeak_cli",
    about = "Real-time hand-sign recognition and announcement harness"
)]
struct Cli {
    /// Override directory containing fixture assets (defaults to ./fixtures)
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,
    /// Path to the classifier weight file
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    /// Path to the labels JSON
    #[arg(long, default_value = DEFAULT_LABELS_PATH)]
    labels: PathBuf,
    /// Camera index for live capture backends
    #[arg(long, default_value_t = 0)]
    camera: u32,
    /// Confidence threshold for speech
    #[arg(long, default_value_t = 0.80)]
    conf: f32,
    /// Detector minimum detection confidence
    #[arg(long, default_value_t = 0.5)]
    min_det: f32,
    /// Detector minimum tracking confidence
    #[arg(long, default_value_t = 0.5)]
    min_track: f32,
    /// Disable text-to-speech
    #[arg(long)]
    no_audio: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a fixture through the pipeline with spoken announcements
    Run {
        #[arg(long)]
        fixture: String,
    },
    /// Run a fixture silently and optionally compare against expectations
    Classify {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List available fixtures on disk
    DumpFixtures,
}

fn main() -> ExitCode {
    signspeak::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let catalog = cli
        .fixtures_dir
        .clone()
        .map(FixtureCatalog::new)
        .unwrap_or_else(FixtureCatalog::default);
    let config = config_from_cli(&cli);

    match &cli.command {
        Commands::Run { fixture } => run_replay(&cli, &catalog, &config, fixture),
        Commands::Classify {
            fixture,
            expect,
            output,
        } => run_classify(&cli, &catalog, &config, fixture, expect.clone(), output.clone()),
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

/// Defaults overridden by command-line flags, the way the config file
/// would otherwise set them.
fn config_from_cli(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::default();
    config.capture.camera_index = cli.camera;
    config.detector.min_detection_confidence = cli.min_det;
    config.detector.min_tracking_confidence = cli.min_track;
    config.recognition.confidence_threshold = cli.conf;
    config.speech.enabled = !cli.no_audio;
    config
}

fn load_model(cli: &Cli) -> Result<LinearModel> {
    LinearModel::load(&cli.model).with_context(|| "loading classifier model")
}

fn run_replay(
    cli: &Cli,
    catalog: &FixtureCatalog,
    config: &AppConfig,
    fixture: &str,
) -> Result<ExitCode> {
    let data = catalog.load(fixture, None)?;
    let model = load_model(cli)?;
    let vocabulary = LabelVocabulary::load(&cli.labels);
    let announcer = speech::init_announcer(&config.speech);

    let processor = FixtureProcessor::new(config.clone());
    let mut frame_loop = processor.build_loop(&data, Box::new(model), vocabulary, announcer);

    spawn_exit_watcher(frame_loop.running_flag());

    let commits = frame_loop.run();
    for event in &commits {
        println!("{}", serde_json::to_string(event)?);
    }

    Ok(ExitCode::from(0))
}

fn run_classify(
    cli: &Cli,
    catalog: &FixtureCatalog,
    config: &AppConfig,
    fixture: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let data = catalog.load(fixture, override_expect)?;
    let model = load_model(cli)?;
    let vocabulary = LabelVocabulary::load(&cli.labels);

    let processor = FixtureProcessor::new(config.clone());
    let actual = processor
        .run(&data, Box::new(model), vocabulary)
        .with_context(|| format!("processing fixture {}", fixture))?;

    emit_report(&data.metadata.name, &actual, output_path)?;

    if let Some(expectations) = data.expectations {
        match expectations.verify(&actual) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

/// Watch stdin for the exit command. A line starting with 'q' clears the
/// running flag; the loop notices at its next iteration boundary.
fn spawn_exit_watcher(running: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    running.store(false, Ordering::SeqCst);
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

fn emit_report(
    fixture: &str,
    events: &[CommitEvent],
    output_path: Option<PathBuf>,
) -> Result<()> {
    let report = FixtureReportPayload {
        fixture,
        event_count: events.len(),
        events,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct FixtureReportPayload<'a> {
    fixture: &'a str,
    event_count: usize,
    #[serde(skip_serializing_if = "slice_empty")]
    events: &'a [CommitEvent],
}

fn slice_empty(events: &&[CommitEvent]) -> bool {
    events.is_empty()
}
