//! Parameter Module
//!
//! Turns the combined parameter input into per-method configuration.
//!
//! # Structure
//!
//! - [`extractor`]: brace-block mini-language matching
//! - [`method`]: closed method set and validated [`MethodConfig`]

pub mod extractor;
pub mod method;

pub use extractor::{extract_block, scan_blocks, ParameterBlock};
pub use method::{Method, MethodConfig};
