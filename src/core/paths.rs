//! Path normalization for tool output
//!
//! Tools are invoked with an absolute root, so every emitted line starts with
//! that root. Lines are rewritten to be relative to it, using '/' as separator.

use std::path::Path;

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Root as it is passed on a tool's command line
pub fn root_arg(root: &Path) -> String {
    normalize_path(root)
}

/// Strip the root prefix from a tool output line (`<root>/src/a.ts:3:text`)
pub fn relativize_line(line: &str, root: &str) -> String {
    let line = line.replace('\\', "/");
    let root = root.trim_end_matches('/');
    if root.is_empty() || root == "." {
        return line.strip_prefix("./").unwrap_or(&line).to_string();
    }
    match line.strip_prefix(root) {
        Some(rest) if rest.starts_with('/') => rest[1..].to_string(),
        _ => line,
    }
}
