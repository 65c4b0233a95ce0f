//! Monitoring Module
//!
//! Diagnostics plumbing shared by every pipeline component.
//!
//! # Components
//!
//! - [`Diagnostics`]: explicit logging handle with optional capture
//! - [`ExecutionTimeline`]: stage start/end timing for the run summary

pub mod diagnostics;
pub mod timeline;

pub use diagnostics::{Diagnostics, Record};
pub use timeline::{EventType, ExecutionTimeline, StageDuration, TimelineEvent};
