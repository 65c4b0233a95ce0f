//! Parameter Block Extraction
//!
//! The combined parameter string holds one brace-delimited block per
//! method:
//!
//! ```text
//! {aljamia1: -i [Raw_FirstScan]-[Charge] -j [Xs_127_N_126]}
//! {aljamia2: -i [Sequence] -j [Raw_FirstScan]-[Charge] }
//! {klibrate1: -g -f }
//! ```
//!
//! Block order is irrelevant, whitespace around the name and the colon is
//! ignored and names match case-insensitively. The configuration text runs
//! up to the first closing brace.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/// Matches any `{name: text}` block, used to list what the string contains.
static ANY_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\s*([A-Za-z0-9_.\-]+)\s*:\s*([^}]*)\}").expect("block pattern is valid")
});

/// A block found in a parameter string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBlock {
    pub name: String,
    pub config: String,
}

/// Builds the case-insensitive pattern for one method's block.
///
/// The escaped name sits between `{` and `:` with only whitespace around
/// it, so `aljamia1` never matches a block named `aljamia11`.
pub fn block_pattern(method: &str) -> Result<Regex, ConfigError> {
    let pattern = format!(r"\{{\s*{}\s*:\s*([^}}]*)\}}", regex::escape(method));

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::Pattern {
            method: method.to_string(),
            source,
        })
}

/// Returns the configuration text of the first block named `method`.
///
/// Leading whitespace after the colon is dropped; everything else up to the
/// closing brace is returned as written.
pub fn extract_block(params: &str, method: &str) -> Result<String, ConfigError> {
    let missing = || ConfigError::MissingMethods(vec![method.to_string()]);

    if !params.to_lowercase().contains(&method.to_lowercase()) {
        return Err(missing());
    }

    let pattern = block_pattern(method)?;
    pattern
        .captures(params)
        .and_then(|caps| caps.get(1))
        .map(|config| config.as_str().to_string())
        .ok_or_else(missing)
}

/// Counts how many blocks in `params` are named `method`.
pub fn count_blocks(params: &str, method: &str) -> Result<usize, ConfigError> {
    Ok(block_pattern(method)?.find_iter(params).count())
}

/// Lists every well-formed block in the string, in order of appearance.
pub fn scan_blocks(params: &str) -> Vec<ParameterBlock> {
    ANY_BLOCK
        .captures_iter(params)
        .map(|caps| ParameterBlock {
            name: caps[1].to_string(),
            config: caps[2].to_string(),
        })
        .collect()
}
