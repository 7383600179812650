//! Recursive ownership and mode application.
//!
//! Both operations collect the full path list before the first mutation:
//! chmod'ing a directory before its children are discovered could remove
//! the execute bit the walker needs to descend into it.
//!
//! Neither operation attempts recovery on failure. The first per-entry
//! error aborts and surfaces to the caller; entries mutated before the
//! failure keep their new state. Recovery lives at the transaction
//! boundary, where a pre-mutation [`Snapshot`](crate::fs::Snapshot) can be
//! restored, rather than being duplicated inside every mutation loop.

use crate::error::{PermError, Result};
use crate::fs::snapshot::MODE_MASK;
use crate::fs::walk;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Sets `uid`/`gid` on `root` and recursively on every descendant, files
/// and directories alike.
///
/// Idempotent. The root itself is always included.
///
/// # Errors
///
/// - [`PermError::NotFound`] if `root` is missing, or an entry disappeared
///   between discovery and mutation
/// - [`PermError::PermissionDenied`] if the caller lacks rights to chown
///   an entry
pub fn apply_ownership(root: &Path, uid: u32, gid: u32) -> Result<()> {
    let nodes = walk::collect_tree(root)?;
    chown_nodes(&nodes, uid, gid)?;

    log::info!(
        "Changed ownership of {} entries under {} to {}:{}",
        nodes.len(),
        root.display(),
        uid,
        gid
    );
    Ok(())
}

/// Sets `dir_mode` on `root` and every descendant directory, `file_mode`
/// on every descendant file.
///
/// Idempotent. The root is always treated as a directory. Directories
/// commonly need the execute bit to stay traversable, which is why the two
/// modes are distinct.
///
/// # Errors
///
/// Same taxonomy as [`apply_ownership`]; the first failing entry aborts
/// the operation with no internal rollback.
pub fn apply_mode(root: &Path, dir_mode: u32, file_mode: u32) -> Result<()> {
    let nodes = walk::collect_tree(root)?;
    chmod_nodes(&nodes, dir_mode, file_mode)?;

    log::info!(
        "Changed mode of {} entries under {} (dirs {:o}, files {:o})",
        nodes.len(),
        root.display(),
        dir_mode,
        file_mode
    );
    Ok(())
}

fn chown_nodes(nodes: &[walk::TreeNode], uid: u32, gid: u32) -> Result<()> {
    for node in nodes {
        std::os::unix::fs::chown(&node.path, Some(uid), Some(gid))
            .map_err(|e| PermError::classify(&node.path, e))?;
    }
    Ok(())
}

fn chmod_nodes(nodes: &[walk::TreeNode], dir_mode: u32, file_mode: u32) -> Result<()> {
    for node in nodes {
        let mode = if node.is_dir { dir_mode } else { file_mode };
        fs::set_permissions(&node.path, fs::Permissions::from_mode(mode & MODE_MASK))
            .map_err(|e| PermError::classify(&node.path, e))?;
    }
    Ok(())
}
