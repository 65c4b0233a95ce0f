//! Path Resolution
//!
//! Derives the working directory and the default log file from the
//! relationship output path.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Subdirectory created next to the relationship file for intermediates.
pub const TMP_SUBDIR: &str = "tmp";

/// Returns the current directory, the base for relative user paths.
pub fn current_dir() -> Result<PathBuf, ConfigError> {
    env::current_dir().map_err(|source| ConfigError::CurrentDir { source })
}

/// Joins a relative `path` onto `base`; absolute paths are kept as given.
pub fn absolute_in(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Returns the absolute directory that will hold `output_file`, with
/// relative paths resolved against `base`.
///
/// An existing directory is canonicalized so symlinks resolve the same way
/// every run.
pub fn output_directory_in(base: &Path, output_file: &Path) -> Result<PathBuf, ConfigError> {
    let unusable = |reason: &str| ConfigError::UnusableOutputPath {
        path: output_file.to_path_buf(),
        reason: reason.to_string(),
    };

    if output_file.as_os_str().is_empty() {
        return Err(unusable("path is empty"));
    }
    if output_file.file_name().is_none() {
        return Err(unusable("path does not name a file"));
    }

    let absolute = absolute_in(base, output_file);
    let parent = absolute
        .parent()
        .ok_or_else(|| unusable("path has no parent directory"))?;

    Ok(fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf()))
}

/// Same as [`output_directory_in`], relative to the current directory.
pub fn output_directory(output_file: &Path) -> Result<PathBuf, ConfigError> {
    output_directory_in(&current_dir()?, output_file)
}

/// Resolves the working directory: the override verbatim when given,
/// otherwise `<directory of rel_file>/tmp` with `rel_file` taken relative
/// to `base`.
pub fn resolve_working_dir_in(
    base: &Path,
    tmp_dir: Option<&Path>,
    rel_file: &Path,
) -> Result<PathBuf, ConfigError> {
    match tmp_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(output_directory_in(base, rel_file)?.join(TMP_SUBDIR)),
    }
}

/// Same as [`resolve_working_dir_in`], relative to the current directory.
pub fn resolve_working_dir(
    tmp_dir: Option<&Path>,
    rel_file: &Path,
) -> Result<PathBuf, ConfigError> {
    match tmp_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => resolve_working_dir_in(&current_dir()?, None, rel_file),
    }
}

/// Default log file: `<directory of rel_file>/<script_name>.log`.
pub fn default_log_file(rel_file: &Path, script_name: &str) -> Result<PathBuf, ConfigError> {
    Ok(output_directory(rel_file)?.join(format!("{}.log", script_name)))
}
