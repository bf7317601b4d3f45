use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ArchiveError, Result};

fn walk_err(e: walkdir::Error) -> ArchiveError {
    let msg = e.to_string();
    let io = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, msg));
    ArchiveError::io("scan tree", io)
}

/// Recursively list regular files below `root`. Directories, symlinks and
/// other special entries are ignored. `skip_empty` drops zero-length files.
/// No ordering is guaranteed beyond what the traversal yields.
pub fn scan_tree(root: &Path, skip_empty: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for ent in WalkDir::new(root).min_depth(1).follow_links(false) {
        let ent = ent.map_err(walk_err)?;
        if !ent.file_type().is_file() {
            continue;
        }
        if skip_empty && ent.metadata().map_err(walk_err)?.len() == 0 {
            continue;
        }
        files.push(ent.path().to_path_buf());
    }
    Ok(files)
}
