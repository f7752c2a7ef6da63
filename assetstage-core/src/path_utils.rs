//! Cross-platform path utilities
//!
//! Names coming out of managed assemblies (namespaces, class names, assembly
//! names) are arbitrary strings. These helpers turn them into path components
//! that are valid on every platform the exported project may be opened on.

use std::path::{Path, PathBuf};

/// Normalize path to forward slashes
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a path to a normalized string
#[inline]
pub fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// Create PathBuf from path + suffix (`Foo.cs` -> `Foo.cs.meta`)
#[inline]
pub fn pathbuf_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Returns true if `c` can't appear in a file or directory name on Windows or Unix
#[inline]
pub fn is_invalid_path_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*' | '/' | '\\') || c.is_control()
}

/// Sanitize a single path component
///
/// Separators are replaced too, so the result is always exactly one component.
/// Empty names and the relative markers `.`/`..` become `_`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if is_invalid_path_char(c) { '_' } else { c })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => sanitized,
    }
}
