//! Tracing setup.
//!
//! The terminal UI owns stdout and stderr while it runs, so events go to an
//! append-only log file instead. `QUIZR_LOG` takes precedence over the
//! configured level and accepts any `EnvFilter` directive.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "QUIZR_LOG";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default directive when `QUIZR_LOG` is unset, e.g. `info` or `quizr=debug`.
    pub level: String,
    pub log_file: PathBuf,
}

impl LogConfig {
    pub fn new(level: impl Into<String>, log_file: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_file: log_file.into(),
        }
    }
}

pub fn build_env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to the configured file.
///
/// Fails if the file cannot be opened or a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let file = open_log_file(&config.log_file)?;
    init_logging_with_writer(&config.level, Mutex::new(file))
}

pub fn init_logging_with_writer<W>(level: &str, writer: W) -> anyhow::Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(layer)
        .try_init()?;
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
