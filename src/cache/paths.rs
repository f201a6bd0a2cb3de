// Cache path utilities.
// Constructs filesystem paths for the on-disk cache generations.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::request::RequestKey;

/// Extension of a stored entry file.
pub const ENTRY_EXTENSION: &str = "entry";

/// Get the base cache directory (~/.cache/orgmirror on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgmirror").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default root holding one directory per generation.
pub fn generations_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("generations"))
}

/// Path to a generation's directory.
pub fn generation_dir(root: &Path, name: &str) -> PathBuf {
    root.join(sanitize_name(name))
}

/// Path to the file holding one entry of a generation.
pub fn entry_path(root: &Path, name: &str, key: &RequestKey) -> PathBuf {
    generation_dir(root, name).join(format!("{}.{}", key.digest(), ENTRY_EXTENSION))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Whether a generation name maps to a directory unchanged.
pub fn is_valid_generation_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.starts_with('.') && sanitize_name(name) == name
}
