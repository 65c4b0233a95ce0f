//! Log File Setup
//!
//! The pipeline writes its diagnostics to a log file next to the
//! relationship table, one line per record:
//!
//! ```text
//! 10/19/2026 02:31:07 PM - INFO - rels2sp - aljamia for scan uncalibrated
//! ```

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use log::Level;

use crate::error::PipelineError;

/// Name stamped on every log line and used for the default log file.
pub const SCRIPT_NAME: &str = "rels2sp";

/// Timestamp layout of log lines.
pub const DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Formats one log line.
pub fn format_line(timestamp: &DateTime<Local>, level: Level, message: impl fmt::Display) -> String {
    format!(
        "{} - {} - {} - {}",
        timestamp.format(DATE_FORMAT),
        level,
        SCRIPT_NAME,
        message
    )
}

/// Configures the logging system to append to `log_file`.
///
/// The level is `debug` when `verbose` is set and `info` otherwise;
/// `RUST_LOG` still takes precedence. Must be called once per process.
pub fn setup_logging(log_file: &Path, verbose: bool) -> Result<(), PipelineError> {
    let logging_error = |source| PipelineError::Logging {
        path: log_file.to_path_buf(),
        source,
    };

    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(logging_error)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(logging_error)?;

    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(&Local::now(), record.level(), record.args())
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}
