//! Stage Runners
//!
//! A stage is a single blocking call to an external program. The
//! [`StageRunner`] trait is the only seam between the pipeline and the
//! operating system, so tests can substitute a fake that records calls.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::RunnerError;

/// Everything needed to launch one external stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageInvocation {
    /// Human-readable stage name, used in logs and errors
    pub stage: String,
    /// External program to execute
    pub program: PathBuf,
    /// Full argument list, flags first then configuration tokens
    pub args: Vec<String>,
    /// Current directory for the external program
    pub working_dir: PathBuf,
    /// Files the program is expected to write
    pub outputs: Vec<PathBuf>,
}

impl StageInvocation {
    /// Renders the invocation as a single shell-quoted command line.
    pub fn command_line(&self) -> String {
        let program = self.program.to_string_lossy();
        let mut words = vec![quote(&program)];
        words.extend(self.args.iter().map(|arg| quote(arg)));
        words.join(" ")
    }
}

fn quote(word: &str) -> String {
    shlex::try_quote(word)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| word.to_string())
}

/// Observable result of a finished stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Platform description of the exit status
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl StageOutput {
    /// A successful run with no output.
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
            status: "exit status: 0".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            status: format!("exit status: {}", code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs one external stage to completion.
pub trait StageRunner {
    /// Blocks until the stage exits.
    ///
    /// Returns `Err` only when the program could not be started; a program
    /// that starts and exits unsuccessfully is reported through
    /// [`StageOutput::success`].
    fn run(&self, invocation: &StageInvocation) -> Result<StageOutput, RunnerError>;
}

/// Launches stages as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl StageRunner for ProcessRunner {
    fn run(&self, invocation: &StageInvocation) -> Result<StageOutput, RunnerError> {
        ensure_directory(&invocation.working_dir)?;
        ensure_output_directories(&invocation.outputs)?;

        debug!(
            "Executing in directory: {}",
            invocation.working_dir.display()
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .output()
            .map_err(|source| RunnerError::Launch {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(StageOutput {
            success: output.status.success(),
            code: output.status.code(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Prints each stage instead of running it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl StageRunner for DryRunRunner {
    fn run(&self, invocation: &StageInvocation) -> Result<StageOutput, RunnerError> {
        println!();
        println!("[DRY RUN] Stage: {}", invocation.stage);
        println!("  Command: {}", invocation.command_line());
        println!("  Working dir: {}", invocation.working_dir.display());
        for output in &invocation.outputs {
            println!("  Output: {}", output.display());
        }

        Ok(StageOutput::succeeded())
    }
}

fn ensure_directory(dir: &Path) -> Result<(), RunnerError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| RunnerError::Prepare {
            path: dir.to_path_buf(),
            source,
        })?;
        debug!("Created directory: {}", dir.display());
    }
    Ok(())
}

/// Creates parent directories for output files.
fn ensure_output_directories(outputs: &[PathBuf]) -> Result<(), RunnerError> {
    for output in outputs {
        match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent)?,
            _ => {}
        }
    }
    Ok(())
}
