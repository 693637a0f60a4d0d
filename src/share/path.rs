use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("path escapes its root")]
    Traversal,
    #[error("path cannot be resolved: {0}")]
    Io(#[from] io::Error),
}

/// Resolves `requested`, a `/`-separated path relative to `root`, to a path that
/// lies under `root`. `root` must be canonical.
///
/// The target doesn't need to exist yet, but its parent directory does. Existing
/// targets are returned in canonical form, so symlinks pointing out of `root`
/// are rejected along with `..` segments that climb above it.
pub async fn resolve(root: &Path, requested: &str) -> Result<PathBuf, PathError> {
    let joined = root.join(normalize(requested)?);

    let resolved = match fs::canonicalize(&joined).await {
        Ok(canonical) => canonical,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // a dangling symlink would let a later write land anywhere
            if fs::symlink_metadata(&joined).await.is_ok() {
                return Err(PathError::Traversal);
            }
            return entry_under(root, &joined).await;
        }
        Err(e) => return Err(e.into()),
    };

    if resolved.starts_with(root) {
        Ok(resolved)
    } else {
        Err(PathError::Traversal)
    }
}

/// Resolves `requested` to a directory entry under `root` without following the
/// entry itself, so a symlink names the link rather than its target.
///
/// Only the parent directory is canonicalized and checked for containment; `root`
/// itself never resolves.
pub async fn resolve_entry(root: &Path, requested: &str) -> Result<PathBuf, PathError> {
    entry_under(root, &root.join(normalize(requested)?)).await
}

async fn entry_under(root: &Path, joined: &Path) -> Result<PathBuf, PathError> {
    let (Some(parent), Some(name)) = (joined.parent(), joined.file_name()) else {
        return Err(PathError::Traversal);
    };
    let parent = fs::canonicalize(parent).await?;
    if parent.starts_with(root) {
        Ok(parent.join(name))
    } else {
        Err(PathError::Traversal)
    }
}

/// Lexically removes `.` and `..` segments, failing if `..` climbs past the start.
fn normalize(requested: &str) -> Result<PathBuf, PathError> {
    let mut relative = PathBuf::new();
    for component in Path::new(requested.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(PathError::Traversal);
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(PathError::Traversal),
        }
    }
    Ok(relative)
}
