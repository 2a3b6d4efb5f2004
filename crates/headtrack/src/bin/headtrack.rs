use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use headtrack::core::{remove_duplicate_points, Point3D};
use headtrack::{FrameReport, HeadTracker, TrackerConfig};

use log::{info, warn, LevelFilter};

/// Identify heads in a recorded sequence of marker frames.
///
/// Frames are read from a JSON array of frames, each an array of `[x, y, z]`
/// points. One report per frame is written as a JSON array.
#[derive(Debug, Parser)]
#[command(name = "headtrack", version, about)]
struct Args {
    /// Tracker configuration (JSON).
    #[arg(short, long)]
    config: PathBuf,

    /// Input frames (JSON).
    #[arg(short, long)]
    frames: PathBuf,

    /// Output path for the reports; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Merge points closer than this distance before identification.
    #[arg(long, allow_negative_numbers = true)]
    dedup: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match init_logging(&args.log_level).and_then(|()| run(&args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("headtrack: {err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .parse()
        .map_err(|err| format!("invalid --log-level {level:?}: {err}"))
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    headtrack::core::init_with_level(parse_level(level)?)
        .map_err(|err| format!("failed to install logger: {err}"))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = parse_level(level)?;
    let _ = tracing_log::LogTracer::init();
    headtrack::core::init_tracing(level, false);
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = TrackerConfig::load(&args.config)?;
    let frames: Vec<Vec<Point3D>> = serde_json::from_str(&fs::read_to_string(&args.frames)?)?;
    info!(
        "loaded {} frames, {} patterns",
        frames.len(),
        config.identifier.patterns.len()
    );

    let mut tracker = HeadTracker::new(&config)?;
    let mut reports: Vec<FrameReport> = Vec::with_capacity(frames.len());
    for points in &frames {
        let report = match args.dedup {
            Some(tol) => tracker.process(&remove_duplicate_points(points, tol)?)?,
            None => tracker.process(points)?,
        };
        reports.push(report);
    }

    let missing = reports
        .iter()
        .flat_map(|r| &r.heads)
        .filter(|h| h.selected.is_none())
        .count();
    if missing > 0 {
        warn!("{missing} head observations without a match");
    }

    let json = serde_json::to_string_pretty(&reports)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("wrote {} reports to {}", reports.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
