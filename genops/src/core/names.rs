//! Checks for agent-supplied names that become path components.
//!
//! Module and file names are joined onto an output directory, so they must be
//! a single path segment. Each check returns the violation text, or `None`.

use std::sync::LazyLock;

use regex::Regex;

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_. -]*$").expect("segment regex"));
static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("extension regex"));
static NON_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("identifier regex"));

/// Check a value that names a single file or directory segment.
pub fn check_segment(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field} must not be empty"));
    }
    if value.contains(['/', '\\']) {
        return Some(format!(
            "{field} must be a plain name without path separators (got '{value}')"
        ));
    }
    if value.contains("..") {
        return Some(format!("{field} must not contain '..' (got '{value}')"));
    }
    if value != value.trim_end() || !SEGMENT_RE.is_match(value) {
        return Some(format!(
            "{field} may only use letters, digits, '_', '-', '.', and inner spaces (got '{value}')"
        ));
    }
    None
}

/// Check a directory path. Any relative or absolute path is accepted as long
/// as it is non-empty and has no NUL bytes.
pub fn check_dir(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field} must not be empty"));
    }
    if value.contains('\0') {
        return Some(format!("{field} must not contain NUL bytes"));
    }
    None
}

/// Check a file extension (without the leading dot).
pub fn check_extension(field: &str, value: &str) -> Option<String> {
    if !EXTENSION_RE.is_match(value) {
        return Some(format!(
            "{field} must be alphanumeric without a leading dot (got '{value}')"
        ));
    }
    None
}

/// `value` with every character outside `[A-Za-z0-9_]` replaced by `_`, for
/// splicing a module name into generated code.
pub fn identifier(value: &str) -> String {
    NON_IDENT_RE.replace_all(value, "_").into_owned()
}
