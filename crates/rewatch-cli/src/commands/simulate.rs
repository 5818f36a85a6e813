use clap::Subcommand;
use rewatch_core::{Config, CoreError, Event, PlaybackTracker};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum SimulateAction {
    /// Play a synthetic medium start-to-end, one or more times
    Run {
        /// Medium duration in seconds
        #[arg(long)]
        duration: f64,
        /// Number of full plays from position 0
        #[arg(long, default_value = "1")]
        plays: u32,
        /// Seconds between simulated ticks
        #[arg(long, default_value = "0.25")]
        tick: f64,
        /// Override tracking.percentage_check for this run
        #[arg(long)]
        percentage: Option<f64>,
    },
    /// Replay a recorded tick trace from a JSON file
    Trace {
        /// Trace file path
        file: PathBuf,
        /// Override tracking.percentage_check for this run
        #[arg(long)]
        percentage: Option<f64>,
    },
}

/// A recorded playback trace: duration plus the raw time-source signals.
#[derive(Deserialize)]
struct Trace {
    duration: f64,
    #[serde(default)]
    render_width: u32,
    steps: Vec<TraceStep>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TraceStep {
    /// Playback (re)started at a position.
    Play(f64),
    /// Position report from the time source.
    Tick(f64),
}

/// Resolve the effective percentage_check, validating any override the same
/// way the config layer does.
fn percentage_check(percentage: Option<f64>) -> Result<f64, CoreError> {
    let mut config = Config::load_or_default();
    if let Some(value) = percentage {
        config.set("tracking.percentage_check", &value.to_string())?;
    }
    Ok(config.tracking.percentage_check)
}

fn emit(event: &Event) -> Result<(), CoreError> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn emit_all(events: Vec<Event>) -> Result<(), CoreError> {
    for event in &events {
        emit(event)?;
    }
    Ok(())
}

pub fn run(action: SimulateAction) -> Result<(), CoreError> {
    match action {
        SimulateAction::Run {
            duration,
            plays,
            tick,
            percentage,
        } => {
            if !(tick > 0.0 && tick.is_finite()) {
                eprintln!("tick must be a positive number of seconds");
                std::process::exit(1);
            }
            let mut tracker = PlaybackTracker::new(percentage_check(percentage)?);
            emit(&tracker.on_metadata_ready(duration, 0))?;
            for _ in 0..plays {
                emit_all(tracker.on_play_start(0.0))?;
                let mut pos = 0.0;
                while pos < duration {
                    pos = (pos + tick).min(duration);
                    emit_all(tracker.on_tick(pos))?;
                }
            }
            println!("{}", serde_json::to_string_pretty(&tracker.snapshot())?);
        }
        SimulateAction::Trace { file, percentage } => {
            let content = std::fs::read_to_string(&file)?;
            let trace: Trace = serde_json::from_str(&content)?;
            let mut tracker = PlaybackTracker::new(percentage_check(percentage)?);
            emit(&tracker.on_metadata_ready(trace.duration, trace.render_width))?;
            for step in trace.steps {
                match step {
                    TraceStep::Play(position) => emit_all(tracker.on_play_start(position))?,
                    TraceStep::Tick(position) => emit_all(tracker.on_tick(position))?,
                }
            }
            println!("{}", serde_json::to_string_pretty(&tracker.snapshot())?);
        }
    }
    Ok(())
}
