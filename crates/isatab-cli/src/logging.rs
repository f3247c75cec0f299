//! Logging setup for the validator CLI.
//!
//! All diagnostics go through `tracing`; validation findings themselves
//! are part of the report, never log lines. Levels follow the usual
//! split: `warn` for skipped files, `debug` for per-rule and per-file
//! progress.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// Single-line output.
    Compact,
    /// JSON lines for machine parsing.
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
    /// When set, logs go to the file instead of stderr.
    pub log_file: Option<PathBuf>,
    /// When true, `RUST_LOG` overrides the configured level.
    pub use_env_filter: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            format: LogFormat::default(),
            log_file: None,
            use_env_filter: true,
        }
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error when the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let filter = build_filter(config);
    let with_ansi = config.log_file.is_none() && io::stderr().is_terminal();

    macro_rules! init_with {
        ($writer:expr) => {{
            let layer = fmt::layer().with_writer($writer).with_target(false);
            match config.format {
                LogFormat::Json => tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.json())
                    .init(),
                LogFormat::Compact => tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.compact().with_ansi(with_ansi).without_time())
                    .init(),
                LogFormat::Pretty => tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.with_ansi(with_ansi).without_time())
                    .init(),
            }
        }};
    }

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_with!(Arc::new(file));
    } else {
        init_with!(io::stderr);
    }
    Ok(())
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let default = || {
        let level = config.level.to_string().to_lowercase();
        EnvFilter::new(format!(
            "warn,isatab_cli={level},isatab_config={level},isatab_ingest={level},\
             isatab_model={level},isatab_validate={level}"
        ))
    };
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default())
    } else {
        default()
    }
}
