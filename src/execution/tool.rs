//! External Tool Location
//!
//! The aljamia binary is resolved in the following order:
//! 1. Explicit path given on the command line (or `ALJAMIA_PATH`)
//! 2. Bundled path: next to the rels2sp executable
//! 3. System PATH: plain `aljamia`, resolved by the OS at launch

use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::sync::Lazy;

/// Name of the matching tool binary.
pub const ALJAMIA_BIN: &str = "aljamia";

/// Lazily-resolved default path to the aljamia binary.
pub static ALJAMIA_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    match exe_dir.and_then(|dir| bundled_tool(&dir, ALJAMIA_BIN)) {
        Some(path) => {
            info!("Using bundled aljamia: {}", path.display());
            path
        }
        None => {
            debug!("No bundled aljamia found, relying on PATH");
            PathBuf::from(ALJAMIA_BIN)
        }
    }
});

/// Returns `dir/name` when that file exists.
fn bundled_tool(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = dir.join(name);
    candidate.is_file().then_some(candidate)
}

/// Picks the aljamia binary: explicit override first, then the default.
pub fn resolve_aljamia(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => ALJAMIA_PATH.clone(),
    }
}
