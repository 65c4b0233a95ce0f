//! Workflow Module
//!
//! The fixed two-stage pipeline that builds the relationship table.
//!
//! # Structure
//!
//! - [`driver`]: stage sequencing and failure propagation
//! - [`paths`]: working directory and log file derivation

pub mod driver;
pub mod paths;

pub use driver::{
    ParameterSource, PipelineDriver, PipelineReport, PipelineRequest, STAGE_RELATIONSHIP,
    STAGE_SCAN,
};
pub use paths::{default_log_file, resolve_working_dir, TMP_SUBDIR};
