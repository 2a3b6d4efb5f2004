//! Frame-aware stderr logging.
//!
//! Diagnostics from the identifier and the tracker go through the `log`
//! facade. The stderr logger installed by [`init_with_level`] prefixes each
//! line with elapsed time, level, the capture frame being processed (when a
//! tracker has published one through [`set_log_frame`]) and the target:
//!
//! ```text
//! [   0.012s  WARN #   41 headtrack_pattern::identify] pattern 0: 2 ambiguous matches
//! [   0.013s  INFO headtrack] wrote 120 reports to out.json
//! ```

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::filter::LevelFilter as TracingLevel;
#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

const NO_FRAME: usize = usize::MAX;

static CURRENT_FRAME: AtomicUsize = AtomicUsize::new(NO_FRAME);

/// Publish the index of the frame being processed, or `None` between frames.
pub fn set_log_frame(frame: Option<usize>) {
    CURRENT_FRAME.store(frame.unwrap_or(NO_FRAME), Ordering::Relaxed);
}

/// Frame most recently published with [`set_log_frame`].
pub fn log_frame() -> Option<usize> {
    match CURRENT_FRAME.load(Ordering::Relaxed) {
        NO_FRAME => None,
        frame => Some(frame),
    }
}

fn format_line(
    elapsed: f64,
    level: Level,
    frame: Option<usize>,
    target: &str,
    args: &fmt::Arguments<'_>,
) -> String {
    match frame {
        Some(frame) => format!("[{elapsed:8.3}s {level:>5} #{frame:>5} {target}] {args}"),
        None => format!("[{elapsed:8.3}s {level:>5} {target}] {args}"),
    }
}

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            log_frame(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization; the first level wins.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| FrameLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

#[cfg(feature = "tracing")]
fn tracing_level(level: LevelFilter) -> TracingLevel {
    match level {
        LevelFilter::Off => TracingLevel::OFF,
        LevelFilter::Error => TracingLevel::ERROR,
        LevelFilter::Warn => TracingLevel::WARN,
        LevelFilter::Info => TracingLevel::INFO,
        LevelFilter::Debug => TracingLevel::DEBUG,
        LevelFilter::Trace => TracingLevel::TRACE,
    }
}

/// Install a `tracing` subscriber at `level`.
///
/// `RUST_LOG` directives take precedence. The frame index is carried by the
/// `HeadTracker::process` span rather than the line prefix.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing_level(level).into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
