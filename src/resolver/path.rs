//! Path resolution and sandbox guard
//!
//! Request segments are joined under a mount's root and normalized
//! lexically, without touching the filesystem. The result must stay inside
//! the root; anything else is rejected before any I/O happens.

use crate::error::ServeError;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.`, let `..` pop, restart at absolute parts
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    push_normalized(&mut out, path);
    out
}

fn push_normalized(out: &mut PathBuf, part: &Path) {
    for component in part.components() {
        match component {
            Component::Prefix(prefix) => *out = PathBuf::from(prefix.as_os_str()),
            Component::RootDir => {
                let prefix = out.components().next().and_then(|c| match c {
                    Component::Prefix(p) => Some(p.as_os_str().to_owned()),
                    _ => None,
                });
                *out = prefix.map(PathBuf::from).unwrap_or_default();
                out.push(Component::RootDir.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(name) => out.push(name),
        }
    }
}

/// Resolve `segments` below `root`
///
/// `root` must already be absolute and normalized. An empty segment list
/// resolves to `root` itself.
pub fn resolve(root: &Path, segments: &[String]) -> Result<PathBuf, ServeError> {
    let mut path = root.to_path_buf();
    for segment in segments {
        push_normalized(&mut path, Path::new(segment));
    }

    if path.starts_with(root) {
        Ok(path)
    } else {
        Err(ServeError::OutsideRoot(path))
    }
}
