//! Document path handling.
//!
//! Folio paths are `/`-separated and relative to an area root. A canonical
//! path has no leading or trailing separator and no empty, `.` or `..`
//! segments. The root itself is the empty string and is never a valid entry
//! path.

use crate::error::TypeError;

/// Path separator used by every area.
pub const SEPARATOR: char = '/';

/// Validate and canonicalize a user-supplied path.
///
/// Leading and trailing separators are stripped. Anything that would escape
/// or alias another path is rejected.
pub fn normalize(raw: &str) -> Result<String, TypeError> {
    let trimmed = raw.trim_matches(SEPARATOR);
    if trimmed.is_empty() {
        return Err(invalid(raw, "path is empty"));
    }
    for segment in trimmed.split(SEPARATOR) {
        match segment {
            "" => return Err(invalid(raw, "empty path segment")),
            "." | ".." => return Err(invalid(raw, "relative segments are not allowed")),
            _ => {}
        }
    }
    Ok(trimmed.to_string())
}

/// Canonicalize a folder path, allowing the empty root.
pub fn normalize_dir(raw: &str) -> Result<String, TypeError> {
    if raw.trim_matches(SEPARATOR).is_empty() {
        return Ok(String::new());
    }
    normalize(raw)
}

fn invalid(path: &str, reason: &str) -> TypeError {
    TypeError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Iterate over the segments of a canonical path. The root yields nothing.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// The parent folder of a canonical path, or `None` for top-level entries.
pub fn parent(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|idx| &path[..idx])
}

/// The last segment of a canonical path.
pub fn file_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Join a folder path (possibly the empty root) with a child name.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}

/// Split a file name into stem and extension.
///
/// Dotfiles such as `.env` have no extension; only the last dot counts.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(idx) if idx + 1 == name.len() => (name, None),
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
    }
}

/// Strip `root` from the front of `path`, returning the remainder.
///
/// An empty root matches everything.
pub fn relative_to<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    if root.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(root)?;
    rest.strip_prefix(SEPARATOR)
}

/// Returns `true` if `path` is `ancestor` or lies underneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    ancestor.is_empty() || path == ancestor || relative_to(path, ancestor).is_some()
}
