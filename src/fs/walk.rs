//! Fail-fast tree traversal.
//!
//! Collects every node of a directory tree before any caller mutates it.
//! Discovery must complete up front: removing read/execute bits from a
//! directory mid-walk would lock the walker out of its own children.

use crate::error::{PermError, Result};

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One discovered filesystem node.
///
/// The directory/file classification is taken at discovery time so later
/// mode changes don't require a second stat pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Collects the root and every descendant, depth-first, root first.
///
/// Symlinks are never followed and never recorded: chmod on a symlink
/// follows the target, so managing a link could mutate a path outside the
/// tree. Hidden entries are included. Any listing error aborts the walk;
/// there is no best-effort mode here, a partial view of the tree would
/// defeat snapshot and apply correctness.
///
/// # Errors
///
/// - [`PermError::NotFound`] if the root does not exist
/// - [`PermError::NotADirectory`] if the root is not a directory
/// - [`PermError::PermissionDenied`] if any subdirectory cannot be listed
pub fn collect_tree(root: &Path) -> Result<Vec<TreeNode>> {
    let root_meta =
        fs::symlink_metadata(root).map_err(|e| PermError::classify(root, e))?;
    if !root_meta.is_dir() {
        return Err(PermError::NotADirectory(root.to_path_buf()));
    }

    let mut nodes = vec![TreeNode {
        path: root.to_path_buf(),
        is_dir: true,
    }];

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            match e.into_io_error() {
                Some(io_err) => PermError::classify(&path, io_err),
                None => PermError::NotFound(path),
            }
        })?;

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            log::debug!("Skipping symlink: {}", entry.path().display());
            continue;
        }
        nodes.push(TreeNode {
            path: entry.into_path(),
            is_dir: file_type.is_dir(),
        });
    }

    log::debug!("Collected {} entries under {}", nodes.len(), root.display());
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collects_root_and_descendants() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/file.txt"), "x").unwrap();
        fs::write(temp.path().join("top.txt"), "y").unwrap();

        let nodes = collect_tree(temp.path()).unwrap();

        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].path, temp.path());
        assert!(nodes[0].is_dir);
    }

    #[test]
    fn includes_hidden_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".htaccess"), "deny").unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();

        let nodes = collect_tree(temp.path()).unwrap();
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn classifies_files_and_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        fs::write(temp.path().join("file"), "x").unwrap();

        let nodes = collect_tree(temp.path()).unwrap();

        let dir = nodes.iter().find(|n| n.path.ends_with("dir")).unwrap();
        let file = nodes.iter().find(|n| n.path.ends_with("file")).unwrap();
        assert!(dir.is_dir);
        assert!(!file.is_dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        let nodes = collect_tree(temp.path()).unwrap();
        assert!(nodes.iter().all(|n| !n.path.ends_with("link")));
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn missing_root_is_not_found() {
        let result = collect_tree(Path::new("/nonexistent/permtx/root"));
        assert!(matches!(result, Err(PermError::NotFound(_))));
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let result = collect_tree(&file);
        assert!(matches!(result, Err(PermError::NotADirectory(_))));
    }
}
