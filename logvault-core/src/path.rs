use std::path::{Component, Path, PathBuf};

use crate::error::{ArchiveError, Result};

/// Relative path of `path` under `root`, forward-slash separated regardless
/// of the host convention. This is the form stored in archives.
pub fn rel_path_string(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| ArchiveError::UnsafePath(path.display().to_string()))?;
    let mut parts: Vec<&str> = Vec::new();
    for comp in rel.components() {
        match comp {
            Component::Normal(seg) => parts.push(
                seg.to_str()
                    .ok_or_else(|| ArchiveError::UnsafePath(path.display().to_string()))?,
            ),
            _ => return Err(ArchiveError::UnsafePath(path.display().to_string())),
        }
    }
    if parts.is_empty() {
        return Err(ArchiveError::UnsafePath(path.display().to_string()));
    }
    Ok(parts.join("/"))
}

/// Resolve an archived relative path inside `out_dir`. Absolute paths,
/// empty segments and parent traversal are rejected so a hostile archive
/// cannot write outside the output tree.
pub fn join_target(out_dir: &Path, rel: &str) -> Result<PathBuf> {
    if rel.is_empty() || Path::new(rel).is_absolute() {
        return Err(ArchiveError::UnsafePath(rel.to_string()));
    }
    let mut target = out_dir.to_path_buf();
    for seg in rel.split('/') {
        if seg.is_empty() || seg == "." || seg == ".." {
            return Err(ArchiveError::UnsafePath(rel.to_string()));
        }
        target.push(seg);
    }
    Ok(target)
}
