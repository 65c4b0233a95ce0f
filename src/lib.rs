//! rels2sp - Scan-to-Peptide Relationship Builder
//!
//! Builds the scan-to-peptide relationship table from an ID-q file by
//! running the external `aljamia` matching tool twice: once to produce the
//! uncalibrated scan table and once to produce the relationship table.
//!
//! # Architecture
//!
//! - [`params`]: `{name: text}` parameter blocks and validated method config
//! - [`execution`]: turning stage flags into external tool invocations
//! - [`workflow`]: the two-stage pipeline driver and path resolution
//! - [`monitoring`]: explicit diagnostics handle and stage timeline
//!
//! # Example
//!
//! ```rust,no_run
//! use rels2sp::monitoring::Diagnostics;
//! use rels2sp::workflow::{ParameterSource, PipelineDriver, PipelineRequest};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = PipelineRequest {
//!         idq_file: "idq.tsv".into(),
//!         rel_file: "rel.tsv".into(),
//!         scan_file: "scan.tsv".into(),
//!         tmp_dir: None,
//!         params: ParameterSource::Inline(
//!             "{aljamia1: -i [Seq] } {aljamia2: -i [Raw]-[Charge] }".to_string(),
//!         ),
//!     };
//!
//!     let driver = PipelineDriver::new(request, Diagnostics::new("rels2sp"));
//!     driver.run()?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
pub mod logging;
pub mod monitoring;
pub mod params;
pub mod workflow;

// Re-export commonly used types
pub use error::{ConfigError, PipelineError, RunnerError};
pub use execution::WorkflowBuilder;
pub use params::{Method, MethodConfig};
pub use workflow::{PipelineDriver, PipelineRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
