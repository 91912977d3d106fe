// src/watch/path_utils.rs

//! Path helpers shared by the filter and the registrar.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again. This only helps for paths that
///   still exist; a removed file can only be related through the fast path.
///
/// The root itself maps to `"."`. Returns `None` if the path cannot be
/// related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(normalize(rel));
    }

    // macOS reports events under /private/var/... for /var/..., and so on.
    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(normalize(rel));
        }
    }

    None
}

/// Relative form if possible, otherwise the raw path with forward slashes.
pub fn display_str(root: &Path, path: &Path) -> String {
    relative_str(root, path).unwrap_or_else(|| normalize(path))
}

fn normalize(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    if s.is_empty() { ".".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn strips_root_prefix() {
        let root = PathBuf::from("/work/project");
        let path = root.join("src").join("main.rs");
        assert_eq!(relative_str(&root, &path).as_deref(), Some("src/main.rs"));
    }

    #[test]
    fn root_itself_is_dot() {
        let root = PathBuf::from("/work/project");
        assert_eq!(relative_str(&root, &root).as_deref(), Some("."));
    }

    #[test]
    fn unrelated_path_falls_back_to_raw_for_display() {
        let root = PathBuf::from("/work/project");
        let path = PathBuf::from("/elsewhere/file.txt");
        assert_eq!(relative_str(&root, &path), None);
        assert_eq!(display_str(&root, &path), "/elsewhere/file.txt");
    }
}
