//! Logging setup for the CLI.
//!
//! Library code only emits `tracing` events; the binary decides where they
//! go. Events are written to stderr (human or JSON) and, when a log folder is
//! given, appended to a per-day `validator_log_YYYY-MM-DD.log` file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use sv_common::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the log filter, e.g. `sv_core=trace`.
pub const LOG_ENV_VAR: &str = "SERIALS_VALIDATOR_LOG";

/// Stderr log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Logging options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// `-v` count; each step raises the level (info → debug → trace).
    pub verbosity: u8,
    /// Only warnings and errors.
    pub quiet: bool,
    pub format: LogFormat,
    /// Folder for the daily log file.
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    /// Default filter directive for these options.
    pub fn default_directive(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Name of the log file for `date`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("validator_log_{}.log", date.format("%Y-%m-%d"))
}

/// Path of today's log file in `dir`.
pub fn log_file_path(dir: &Path) -> PathBuf {
    dir.join(log_file_name(Local::now().date_naive()))
}

/// Install the global subscriber.
///
/// A subscriber that is already installed is left in place.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let (human, json) = match config.format {
        LogFormat::Human => (
            Some(fmt::layer().with_writer(std::io::stderr).with_target(false)),
            None,
        ),
        LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
    };

    let file = match &config.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file_path(dir))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(human)
        .with(json)
        .with(file)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_follows_flags() {
        let mut config = LogConfig::default();
        assert_eq!(config.default_directive(), "info");
        config.verbosity = 1;
        assert_eq!(config.default_directive(), "debug");
        config.verbosity = 3;
        assert_eq!(config.default_directive(), "trace");
        config.quiet = true;
        assert_eq!(config.default_directive(), "warn");
    }

    #[test]
    fn log_file_is_named_by_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(log_file_name(date), "validator_log_2024-03-07.log");
        let path = log_file_path(Path::new("/logs"));
        assert!(path.starts_with("/logs"));
    }
}
