//! Error Types
//!
//! Every failure in the pipeline is fatal. Each error kind maps to a
//! process exit status so that calling automation can tell configuration
//! problems apart from stage failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a missing or malformed configuration.
pub const EXIT_CONFIG: u8 = 2;

/// Exit status for an external stage failure or any other runtime error.
pub const EXIT_FAILURE: u8 = 1;

/// Problems with the parameters supplied to the pipeline.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("checking the parameters for the {} method", .0.join(", "))]
    MissingMethods(Vec<String>),

    #[error("invalid block pattern for method '{method}': {source}")]
    Pattern {
        method: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot derive a working directory from '{}': {reason}", .path.display())]
    UnusableOutputPath { path: PathBuf, reason: String },

    #[error("cannot resolve the current directory: {source}")]
    CurrentDir {
        #[source]
        source: io::Error,
    },

    #[error("failed to read parameter file '{}': {source}", .path.display())]
    ParamsFileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse parameter file '{}': {source}", .path.display())]
    ParamsFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures raised by a [`StageRunner`](crate::execution::StageRunner).
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to launch '{}': {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to prepare '{}': {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Top-level error returned by the pipeline driver.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("stage '{stage}' could not be started (args: {}): {source}", .args.join(" "))]
    Launch {
        stage: String,
        args: Vec<String>,
        #[source]
        source: RunnerError,
    },

    #[error("stage '{stage}' failed with {status} (args: {}){}", .args.join(" "), format_stderr(.stderr))]
    Stage {
        stage: String,
        args: Vec<String>,
        status: String,
        stderr: String,
    },

    #[error("failed to set up logging at '{}': {source}", .path.display())]
    Logging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::Launch { .. } | Self::Stage { .. } | Self::Logging { .. } => EXIT_FAILURE,
        }
    }

    /// Name of the stage that failed, if the error came from a stage.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::Launch { stage, .. } | Self::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}
