//! Pure helpers over physical store paths
//!
//! Paths use `/` as the hierarchy separator regardless of platform. A path
//! ending in the separator names a container.

/// Hierarchy separator
pub const SEPARATOR: char = '/';

/// Length of the shortest container path (`/`).
///
/// A walk that reaches a container this short without matching the store root
/// has left the store; see [`AclError::TraversalGuardTripped`].
///
/// [`AclError::TraversalGuardTripped`]: crate::AclError::TraversalGuardTripped
pub const MIN_CONTAINER_PATH_LEN: usize = 1;

/// Whether `path` names a container
pub fn is_container(path: &str) -> bool {
    path.ends_with(SEPARATOR)
}

/// Whether `path` names a control document under `suffix`
pub fn is_control_document(path: &str, suffix: &str) -> bool {
    !suffix.is_empty() && path.ends_with(suffix)
}

/// Path of the control document attached to `path`.
///
/// A control document is its own control document; it is never re-suffixed.
pub fn control_document_path(path: &str, suffix: &str) -> String {
    if is_control_document(path, suffix) {
        path.to_string()
    } else {
        format!("{path}{suffix}")
    }
}

/// Parent container of `path`, keeping the trailing separator.
///
/// One trailing separator is dropped first, so containers and leaves both move
/// up exactly one level: `/docs/a.txt` and `/docs/sub/` give `/docs/`, `/docs/`
/// gives `/`. The root `/` degenerates to the empty string.
pub fn parent_container(path: &str) -> &str {
    let trimmed = path.strip_suffix(SEPARATOR).unwrap_or(path);
    match trimmed.rfind(SEPARATOR) {
        Some(index) => &path[..=index],
        None => "",
    }
}

/// Path of the resource a control document is attached to
pub fn governed_path<'a>(document_path: &'a str, suffix: &str) -> &'a str {
    document_path.strip_suffix(suffix).unwrap_or(document_path)
}
