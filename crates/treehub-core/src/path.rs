//! Materialized path codec.
//!
//! Folder paths are absolute and slash-terminated (`/Root/A/B/`); file
//! paths are the containing folder's path followed by the file name
//! (`/Root/A/x.txt`). Everything here is pure string algebra.
//!
//! Two rewrite algorithms exist and must not be confused:
//!
//! * [`rename_segment`] swaps the *last* occurrence of a folder's name for
//!   a new one. It is only correct on the renamed folder's own path.
//! * [`replace_prefix`] substitutes a whole subtree prefix. It is what
//!   every descendant of a renamed or moved folder goes through.

use crate::error::AppError;
use crate::result::AppResult;

/// The path separator.
pub const SEPARATOR: char = '/';

/// Reject names that cannot become a single path segment.
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::invalid_name("Name cannot be empty"));
    }
    if name.contains(SEPARATOR) {
        return Err(AppError::invalid_name(format!(
            "Name '{name}' must not contain '{SEPARATOR}'"
        )));
    }
    Ok(())
}

/// Path of a root folder: `/name/`.
pub fn root(name: &str) -> AppResult<String> {
    validate_name(name)?;
    Ok(format!("{SEPARATOR}{name}{SEPARATOR}"))
}

/// Path of a folder named `name` under `parent_path`.
pub fn derive(parent_path: &str, name: &str) -> AppResult<String> {
    validate_name(name)?;
    Ok(format!("{parent_path}{name}{SEPARATOR}"))
}

/// Logical path of a file named `name` inside the folder at `folder_path`.
pub fn file_path(folder_path: &str, name: &str) -> String {
    format!("{folder_path}{name}")
}

/// Replace the last occurrence of `old_name` in `path` with `new_name`.
///
/// An ancestor segment that happens to share the folder's name is left
/// alone: `/A/B/A/` renamed from `A` to `C` becomes `/A/B/C/`.
pub fn rename_segment(path: &str, old_name: &str, new_name: &str) -> AppResult<String> {
    validate_name(new_name)?;
    let idx = path.rfind(old_name).ok_or_else(|| {
        AppError::invalid_operation(format!("Path '{path}' does not contain '{old_name}'"))
    })?;
    Ok(format!(
        "{}{}{}",
        &path[..idx],
        new_name,
        &path[idx + old_name.len()..]
    ))
}

/// Swap the leading `old_prefix` of `path` for `new_prefix`.
///
/// Returns `None` when `path` does not start with `old_prefix`.
pub fn replace_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    path.strip_prefix(old_prefix)
        .map(|rest| format!("{new_prefix}{rest}"))
}

/// First segment of a path, used to identify the root a node lives under.
pub fn root_segment(path: &str) -> Option<&str> {
    path.trim_start_matches(SEPARATOR)
        .split(SEPARATOR)
        .next()
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_root_and_derive() {
        assert_eq!(root("acme").unwrap(), "/acme/");
        assert_eq!(derive("/acme/", "docs").unwrap(), "/acme/docs/");
        assert_eq!(file_path("/acme/docs/", "x.txt"), "/acme/docs/x.txt");
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(derive("/a/", "").unwrap_err().kind, ErrorKind::InvalidName);
        assert_eq!(derive("/a/", "  ").unwrap(), "/a/  /");
        assert_eq!(
            derive("/a/", "b/c").unwrap_err().kind,
            ErrorKind::InvalidName
        );
    }

    #[test]
    fn test_rename_segment_touches_only_last_occurrence() {
        assert_eq!(rename_segment("/A/B/A/", "A", "C").unwrap(), "/A/B/C/");
        assert_eq!(rename_segment("/Root/A/", "A", "A").unwrap(), "/Root/A/");
    }

    #[test]
    fn test_rename_segment_rejects_bad_name() {
        let err = rename_segment("/Root/A/", "A", "x/y").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidName);
    }

    #[test]
    fn test_replace_prefix() {
        assert_eq!(
            replace_prefix("/Root/A/B/", "/Root/A/", "/Root/C/A/").as_deref(),
            Some("/Root/C/A/B/")
        );
        assert_eq!(
            replace_prefix("/Root/A/A/", "/Root/A/", "/Other/A/").as_deref(),
            Some("/Other/A/A/")
        );
        assert_eq!(replace_prefix("/Elsewhere/", "/Root/A/", "/X/"), None);
    }

    #[test]
    fn test_root_segment() {
        assert_eq!(root_segment("/acme/docs/"), Some("acme"));
        assert_eq!(root_segment("/acme/"), Some("acme"));
        assert_eq!(root_segment("/"), None);
    }
}
