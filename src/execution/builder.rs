//! Workflow Builder
//!
//! Turns a logical stage request ("run aljamia from X producing Y") into a
//! concrete [`StageInvocation`] and runs it through a [`StageRunner`].

use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::monitoring::{Diagnostics, EventType, ExecutionTimeline};

use super::runner::{ProcessRunner, StageInvocation, StageRunner};
use super::tool::resolve_aljamia;

/// Flag for the ID-q input file.
pub const INPUT_FLAG: &str = "-x";

/// Flag for the stage's output file.
pub const OUTPUT_FLAG: &str = "-o";

/// Ordered flag/value pairs passed ahead of the configuration text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageFlags {
    pairs: Vec<(String, String)>,
    outputs: Vec<PathBuf>,
}

impl StageFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the input-file flag.
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        let value = path.as_ref().to_string_lossy().into_owned();
        self.flag(INPUT_FLAG, value)
    }

    /// Adds the output-file flag and records the path as a stage output.
    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.outputs.push(path.to_path_buf());
        self.flag(OUTPUT_FLAG, path.to_string_lossy().into_owned())
    }

    /// Adds an arbitrary flag, kept in insertion order.
    pub fn flag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((name.into(), value.into()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }
}

/// Splits configuration text into trailing arguments.
///
/// Uses shell word rules so quoted values stay whole. Text with unbalanced
/// quotes is split on whitespace instead.
pub fn config_arguments(config: &str) -> Vec<String> {
    shlex::split(config)
        .unwrap_or_else(|| config.split_whitespace().map(str::to_string).collect())
}

/// Builds the full argument list: flags in caller order, then the
/// configuration tokens.
pub fn build_arguments(flags: &StageFlags, config: &str) -> Vec<String> {
    let mut args = Vec::with_capacity(flags.pairs.len() * 2);
    for (name, value) in &flags.pairs {
        args.push(name.clone());
        args.push(value.clone());
    }
    args.extend(config_arguments(config));
    args
}

/// Owns the working directory and runs one external stage per call.
///
/// Construction records the path only; the runner creates the directory
/// when a stage is launched.
pub struct WorkflowBuilder {
    working_dir: PathBuf,
    program: PathBuf,
    runner: Box<dyn StageRunner>,
    diagnostics: Diagnostics,
    timeline: ExecutionTimeline,
}

impl WorkflowBuilder {
    /// Creates a builder bound to `working_dir`, using the real process runner.
    pub fn new(working_dir: impl Into<PathBuf>, diagnostics: Diagnostics) -> Self {
        Self {
            working_dir: working_dir.into(),
            program: resolve_aljamia(None),
            runner: Box::new(ProcessRunner),
            diagnostics,
            timeline: ExecutionTimeline::new(),
        }
    }

    /// Sets the aljamia binary to invoke.
    pub fn set_program(&mut self, program: impl Into<PathBuf>) {
        self.program = program.into();
    }

    /// Replaces the runner used to launch stages.
    pub fn set_runner(&mut self, runner: Box<dyn StageRunner>) {
        self.runner = runner;
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeline(&self) -> &ExecutionTimeline {
        &self.timeline
    }

    /// Runs aljamia with `flags` followed by the stage's configuration text.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - aljamia exited successfully
    /// * `Err` - aljamia could not be launched or exited with an error
    pub fn aljamia(
        &mut self,
        stage: &str,
        flags: &StageFlags,
        config: &str,
    ) -> Result<(), PipelineError> {
        let invocation = StageInvocation {
            stage: stage.to_string(),
            program: self.program.clone(),
            args: build_arguments(flags, config),
            working_dir: self.working_dir.clone(),
            outputs: flags.outputs().to_vec(),
        };
        self.execute(invocation)
    }

    fn execute(&mut self, invocation: StageInvocation) -> Result<(), PipelineError> {
        let stage = invocation.stage.clone();
        self.diagnostics
            .debug(format!("{}: {}", stage, invocation.command_line()));
        self.timeline.add_event(stage.as_str(), EventType::Started);

        let output = match self.runner.run(&invocation) {
            Ok(output) => output,
            Err(source) => {
                self.timeline.add_event(stage.as_str(), EventType::Failed);
                let err = PipelineError::Launch {
                    stage,
                    args: invocation.args,
                    source,
                };
                self.diagnostics.error(err.to_string());
                return Err(err);
            }
        };

        if output.success {
            self.timeline.add_event(stage.as_str(), EventType::Completed);
            self.diagnostics
                .debug(format!("Stage '{}' completed successfully", stage));
            if !output.stdout.trim().is_empty() {
                self.diagnostics
                    .debug(format!("Stage '{}' output:\n{}", stage, output.stdout));
            }
            return Ok(());
        }

        self.timeline.add_event(stage.as_str(), EventType::Failed);
        self.diagnostics.error(format!(
            "Stage '{}' failed with {}",
            stage, output.status
        ));
        if !output.stderr.trim().is_empty() {
            self.diagnostics.error(format!("stderr:\n{}", output.stderr));
        }
        if !output.stdout.trim().is_empty() {
            self.diagnostics.debug(format!("stdout:\n{}", output.stdout));
        }

        Err(PipelineError::Stage {
            stage,
            args: invocation.args,
            status: output.status,
            stderr: output.stderr,
        })
    }
}
