//! Path helpers for the destination naming convention
//!
//! Callers pass destination paths without an extension; the write path
//! appends the fixed archive extension and the read path appends whatever
//! extension the archive header recovered.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of `path` without the leading dot, empty if there is none
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Append `.ext` to `path`, leaving any existing extension in place.
///
/// An empty `ext` returns the path unchanged (no trailing dot).
#[must_use]
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    if ext.is_empty() {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
