//! Node path validation

use crate::errors::CoordinationError;

/// Path of the root node
pub const ROOT: &str = "/";

/// Check that `path` is an absolute, canonical node path
pub fn validate_path(path: &str) -> Result<(), CoordinationError> {
    if path.is_empty() {
        return Err(CoordinationError::invalid_path(path, "path must not be empty"));
    }
    if !path.starts_with('/') {
        return Err(CoordinationError::invalid_path(path, "path must start with /"));
    }
    if path == ROOT {
        return Ok(());
    }
    if path.ends_with('/') {
        return Err(CoordinationError::invalid_path(path, "path must not end with /"));
    }
    if path.contains('\0') {
        return Err(CoordinationError::invalid_path(path, "null character not allowed"));
    }
    for segment in path[1..].split('/') {
        match segment {
            "" => return Err(CoordinationError::invalid_path(path, "empty node name")),
            "." | ".." => {
                return Err(CoordinationError::invalid_path(path, "relative paths not allowed"))
            }
            _ => {}
        }
    }
    Ok(())
}

/// Parent of a validated path, `None` for the root
pub fn parent_path(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Every proper ancestor of a validated path, root excluded, outermost first
pub fn ancestors(path: &str) -> Vec<&str> {
    path.match_indices('/')
        .map(|(idx, _)| idx)
        .filter(|&idx| idx > 0)
        .map(|idx| &path[..idx])
        .collect()
}
