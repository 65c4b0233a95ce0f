//! Stage Execution Module
//!
//! Launches the external matching tool for each pipeline stage.
//!
//! # Architecture
//!
//! - [`builder`]: maps stage flags and configuration text to an invocation
//! - [`runner`]: the [`StageRunner`] seam and its process/dry-run runners
//! - [`tool`]: locating the aljamia binary

pub mod builder;
pub mod runner;
pub mod tool;

pub use builder::{build_arguments, StageFlags, WorkflowBuilder};
pub use runner::{DryRunRunner, ProcessRunner, StageInvocation, StageOutput, StageRunner};
pub use tool::{resolve_aljamia, ALJAMIA_PATH};
