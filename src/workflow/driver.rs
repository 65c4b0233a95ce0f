//! Pipeline Driver
//!
//! Runs the two aljamia stages that build the scan-to-peptide
//! relationship table:
//!
//! 1. `aljamia1` reads the ID-q file and writes the uncalibrated scan table
//! 2. `aljamia2` reads the same ID-q file and writes the relationship table
//!
//! Every required configuration block is validated before the first stage
//! starts. Relative input and output paths are made absolute against the
//! caller's directory before they reach aljamia, which runs inside the
//! working directory. A failing stage aborts the run; the second stage
//! never starts after a failed first stage and partial output is left in
//! place.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, PipelineError};
use crate::execution::{DryRunRunner, StageFlags, StageRunner, WorkflowBuilder};
use crate::monitoring::{Diagnostics, ExecutionTimeline};
use crate::params::{Method, MethodConfig};

use super::paths::{absolute_in, current_dir, resolve_working_dir_in};

/// Stage producing the uncalibrated scan table.
pub const STAGE_SCAN: &str = "scan uncalibrated";

/// Stage producing the scan-to-peptide relationship table.
pub const STAGE_RELATIONSHIP: &str = "s2p relationship";

/// Where the per-method configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSource {
    /// Combined `{name: text}` parameter string
    Inline(String),
    /// YAML mapping of method name to configuration text
    File(PathBuf),
}

impl ParameterSource {
    /// Loads and validates every required method configuration.
    pub fn load(&self, diagnostics: &Diagnostics) -> Result<MethodConfig, ConfigError> {
        match self {
            Self::Inline(params) => MethodConfig::from_parameter_string(params, diagnostics),
            Self::File(path) => MethodConfig::load_yaml(path, diagnostics),
        }
    }
}

/// Inputs for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    /// ID-q input file, read by both stages
    pub idq_file: PathBuf,
    /// Relationship table written by the second stage
    pub rel_file: PathBuf,
    /// Uncalibrated scan table written by the first stage
    pub scan_file: PathBuf,
    /// Working directory override
    pub tmp_dir: Option<PathBuf>,
    pub params: ParameterSource,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub working_dir: PathBuf,
    pub timeline: ExecutionTimeline,
}

/// Sequences the two stages of the relationship-table pipeline.
pub struct PipelineDriver {
    request: PipelineRequest,
    program: Option<PathBuf>,
    runner: Option<Box<dyn StageRunner>>,
    base_dir: Option<PathBuf>,
    diagnostics: Diagnostics,
}

impl PipelineDriver {
    /// Creates a driver that launches the real aljamia binary.
    pub fn new(request: PipelineRequest, diagnostics: Diagnostics) -> Self {
        Self {
            request,
            program: None,
            runner: None,
            base_dir: None,
            diagnostics,
        }
    }

    /// Sets the aljamia binary to invoke.
    pub fn set_program(&mut self, program: impl Into<PathBuf>) {
        self.program = Some(program.into());
    }

    /// Replaces the runner used to launch stages.
    pub fn set_runner(&mut self, runner: Box<dyn StageRunner>) {
        self.runner = Some(runner);
    }

    /// Sets the directory relative request paths resolve against.
    /// Defaults to the current directory.
    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.base_dir = Some(dir.into());
    }

    /// Prints stage commands instead of running them.
    pub fn set_dry_run(&mut self, dry_run: bool) {
        if dry_run {
            self.runner = Some(Box::new(DryRunRunner));
        }
    }

    pub fn request(&self) -> &PipelineRequest {
        &self.request
    }

    /// Executes the pipeline.
    ///
    /// # Returns
    ///
    /// * `Ok(PipelineReport)` - both stages completed
    /// * `Err` - configuration was incomplete or a stage failed
    pub fn run(self) -> Result<PipelineReport, PipelineError> {
        let Self {
            request,
            program,
            runner,
            base_dir,
            diagnostics,
        } = self;

        let configs = request.params.load(&diagnostics.scoped("params"))?;
        let scan_config = configs.require(Method::Aljamia1)?;
        let rel_config = configs.require(Method::Aljamia2)?;

        let resolved = match base_dir {
            Some(dir) => Ok(dir),
            None => current_dir(),
        }
        .and_then(|base| {
            let working_dir =
                resolve_working_dir_in(&base, request.tmp_dir.as_deref(), &request.rel_file)?;
            Ok((base, working_dir))
        });
        let (base, working_dir) = resolved.map_err(|err| {
            diagnostics.error(err.to_string());
            err
        })?;

        let idq_file = absolute_in(&base, &request.idq_file);
        let scan_file = absolute_in(&base, &request.scan_file);
        let rel_file = absolute_in(&base, &request.rel_file);
        diagnostics.debug(format!("working directory: {}", working_dir.display()));

        diagnostics.info("create workflow builder");
        let mut builder = WorkflowBuilder::new(&working_dir, diagnostics.scoped("builder"));
        if let Some(program) = program {
            builder.set_program(program);
        }
        if let Some(runner) = runner {
            builder.set_runner(runner);
        }

        diagnostics.info("aljamia for scan uncalibrated");
        let scan_flags = stage_flags(&idq_file, &scan_file);
        builder.aljamia(STAGE_SCAN, &scan_flags, scan_config)?;

        diagnostics.info("aljamia for s2p relationship");
        let rel_flags = stage_flags(&idq_file, &rel_file);
        builder.aljamia(STAGE_RELATIONSHIP, &rel_flags, rel_config)?;

        let timeline = builder.timeline().clone();
        for line in timeline.summary().lines() {
            diagnostics.debug(line.to_string());
        }

        Ok(PipelineReport {
            working_dir,
            timeline,
        })
    }
}

fn stage_flags(input: &Path, output: &Path) -> StageFlags {
    StageFlags::new().input(input).output(output)
}
