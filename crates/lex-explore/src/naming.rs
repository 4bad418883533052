//! File naming and output path policy.
//!
//! Column labels come straight from user data, so every label is passed
//! through [`sanitize_filename`] before it becomes part of a path. Output
//! artifacts are named `<prefix>_<YYYYMMDD_HHMMSS>` and never overwrite an
//! existing path: a numeric suffix is appended instead.

use crate::error::{AnalysisError, Result, ResultExt};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Characters that are replaced by `_` in file names.
pub const INVALID_FILENAME_CHARS: &str = "<>:;\"|!?*\\/ \t\n\r";

/// Name used when a label sanitizes to nothing.
pub const FILENAME_PLACEHOLDER: &str = "unknown";

static UNDERSCORE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{2,}").expect("Invalid regex: underscore runs"));

/// Turn an arbitrary column label into a safe file name component.
///
/// Invalid characters become underscores, runs of underscores collapse into
/// one, leading/trailing underscores are stripped, and an empty result falls
/// back to [`FILENAME_PLACEHOLDER`].
///
/// # Example
///
/// ```
/// use lex_explore::naming::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Income: USD / year"), "Income_USD_year");
/// assert_eq!(sanitize_filename("///"), "unknown");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(c) { '_' } else { c })
        .collect();

    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        FILENAME_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Current local time formatted to the second, e.g. `20240131_235959`.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// `<prefix>_<timestamp>`.
pub fn timestamped_name(prefix: &str) -> String {
    format!("{prefix}_{}", timestamp())
}

/// Return `candidate` if nothing exists there yet, otherwise the first free
/// `<stem>_<n><.ext>` next to it.
pub fn unique_path(candidate: PathBuf) -> PathBuf {
    if !candidate.exists() {
        return candidate;
    }

    let parent = candidate
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()));

    (1u32..)
        .map(|n| parent.join(format!("{stem}_{n}{}", extension.as_deref().unwrap_or(""))))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Make sure the caller-supplied output root exists. The engine never creates it.
pub fn ensure_output_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(AnalysisError::OutputDirMissing(root.display().to_string()))
    }
}

/// Create a fresh `<prefix>_<timestamp>` directory under `root`.
pub fn create_output_dir(root: &Path, prefix: &str) -> Result<PathBuf> {
    ensure_output_root(root)?;
    let dir = unique_path(root.join(timestamped_name(prefix)));
    fs::create_dir(&dir).context(format!("Creating {}", dir.display()))?;
    debug!("Created output directory {}", dir.display());
    Ok(dir)
}

/// Path of a `<prefix>_<timestamp>.<extension>` file under `root`.
pub fn output_file_path(root: &Path, prefix: &str, extension: &str) -> Result<PathBuf> {
    ensure_output_root(root)?;
    Ok(unique_path(
        root.join(format!("{}.{extension}", timestamped_name(prefix))),
    ))
}
