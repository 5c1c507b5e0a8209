//! Tracing subscriber setup

use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Logging options taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    pub verbosity: u8,
    pub json: bool,
    pub file: bool,
}

/// Keeps the file writer flushing until dropped
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Installs the global subscriber; `RUST_LOG` overrides the verbosity
pub fn init(options: LogOptions, log_path: &Path) -> LogGuard {
    let filter = EnvFilter::builder()
        .with_default_directive(level_from_verbosity(options.verbosity).into())
        .from_env_lossy();

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(if options.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    });

    let mut guard = None;
    let mut file_error = None;
    if options.file {
        match file_writer(log_path) {
            Ok((writer, worker)) => {
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .boxed(),
                );
                guard = Some(worker);
            }
            Err(e) => file_error = Some(e),
        }
    }

    layers.push(filter.boxed());
    Registry::default().with(layers).init();

    if let Some(e) = file_error {
        tracing::warn!("Log file disabled, could not open {:?}: {}", log_path, e);
    }

    LogGuard { _guard: guard }
}

fn file_writer(
    log_path: &Path,
) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = log_path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = log_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "chromium-fetcher.log".into());
    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
