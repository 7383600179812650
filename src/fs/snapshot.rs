//! Permission snapshots: capture a tree's ownership and mode bits, restore
//! them later.
//!
//! A snapshot is taken before a transaction mutates anything and consumed
//! only by [`Snapshot::restore`] when the transaction has to roll back. It
//! lives in memory for the duration of one invocation; there is no
//! persisted format.

use crate::error::{PermError, Result};
use crate::fs::walk;

use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// Permission bits carried by chmod: rwx for user/group/other plus
/// setuid/setgid/sticky.
pub const MODE_MASK: u32 = 0o7777;

/// Recorded metadata for one filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEntry {
    /// Permission bits, masked to [`MODE_MASK`].
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

/// Immutable mapping of path → (mode, uid, gid) for one root directory,
/// captured at one instant.
///
/// Always includes the root itself, not only its descendants. Capture is
/// all-or-nothing: a tree that cannot be fully stat'd yields an error, not
/// a partial snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    entries: HashMap<PathBuf, PathEntry>,
}

/// Outcome of a best-effort [`Snapshot::restore`].
///
/// Restore runs in an error path already, so it attempts every entry and
/// aggregates failures instead of aborting on the first one.
#[derive(Debug)]
pub struct RestoreReport {
    /// Entries whose mode and ownership were both reapplied.
    pub restored: usize,
    /// Entries that could not be restored, with the reason.
    pub errors: Vec<(PathBuf, PermError)>,
}

impl RestoreReport {
    /// Returns true if every snapshot entry was restored.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Stats a path and extracts the fields a snapshot records.
pub(crate) fn stat_entry(path: &Path) -> Result<PathEntry> {
    let meta = fs::symlink_metadata(path).map_err(|e| PermError::classify(path, e))?;
    Ok(PathEntry {
        mode: meta.mode() & MODE_MASK,
        uid: meta.uid(),
        gid: meta.gid(),
    })
}

impl Snapshot {
    /// Walks `root` and records mode, uid and gid for the root and every
    /// descendant.
    ///
    /// # Errors
    ///
    /// - [`PermError::NotFound`] if `root` is missing
    /// - [`PermError::PermissionDenied`] if any entry cannot be stat'd
    ///
    /// No partial snapshot is ever returned.
    pub fn capture(root: &Path) -> Result<Snapshot> {
        let nodes = walk::collect_tree(root)?;

        let mut entries = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            entries.insert(node.path.clone(), stat_entry(&node.path)?);
        }

        log::debug!(
            "Captured snapshot of {} entries under {}",
            entries.len(),
            root.display()
        );

        Ok(Snapshot {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// The root directory this snapshot was captured from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of recorded entries, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded metadata for a path, if it was part of the capture.
    pub fn get(&self, path: &Path) -> Option<&PathEntry> {
        self.entries.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &PathEntry)> {
        self.entries.iter()
    }

    /// Reapplies the recorded mode, then ownership, to every entry.
    ///
    /// Best-effort: entries are independent, so one failure (typically
    /// [`PermError::NotFound`] after an external actor removed a path) does
    /// not stop the remaining entries from being restored. Partial
    /// restoration is strictly better than none when this runs as a
    /// last-resort rollback.
    pub fn restore(&self) -> RestoreReport {
        let mut restored = 0;
        let mut errors = Vec::new();

        for (path, entry) in &self.entries {
            match restore_entry(path, entry) {
                Ok(()) => restored += 1,
                Err(e) => {
                    log::warn!("Failed to restore {}: {}", path.display(), e);
                    errors.push((path.clone(), e));
                }
            }
        }

        log::info!(
            "Restored {}/{} entries under {}",
            restored,
            self.entries.len(),
            self.root.display()
        );

        RestoreReport { restored, errors }
    }
}

fn restore_entry(path: &Path, entry: &PathEntry) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(entry.mode))
        .map_err(|e| PermError::classify(path, e))?;
    std::os::unix::fs::chown(path, Some(entry.uid), Some(entry.gid))
        .map_err(|e| PermError::classify(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn build_tree(temp: &TempDir) -> (PathBuf, PathBuf) {
        let sub = temp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let file = sub.join("file.txt");
        fs::write(&file, "content").unwrap();
        (sub, file)
    }

    fn mode_of(path: &Path) -> u32 {
        fs::symlink_metadata(path).unwrap().mode() & MODE_MASK
    }

    #[test]
    fn capture_includes_root_and_every_entry() {
        let temp = TempDir::new().unwrap();
        let (sub, file) = build_tree(&temp);
        fs::write(temp.path().join("top.txt"), "x").unwrap();

        let snap = Snapshot::capture(temp.path()).unwrap();

        assert_eq!(snap.len(), 4);
        assert!(snap.get(temp.path()).is_some());
        assert!(snap.get(&sub).is_some());
        assert!(snap.get(&file).is_some());
    }

    #[test]
    fn capture_records_current_modes() {
        let temp = TempDir::new().unwrap();
        let (sub, file) = build_tree(&temp);
        fs::set_permissions(&sub, fs::Permissions::from_mode(0o700)).unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o600)).unwrap();

        let snap = Snapshot::capture(temp.path()).unwrap();

        assert_eq!(snap.get(&sub).unwrap().mode, 0o700);
        assert_eq!(snap.get(&file).unwrap().mode, 0o600);
    }

    #[test]
    fn capture_missing_root_fails() {
        let result = Snapshot::capture(Path::new("/nonexistent/permtx/root"));
        assert!(matches!(result, Err(PermError::NotFound(_))));
    }

    #[test]
    fn restore_round_trip_leaves_tree_unchanged() {
        let temp = TempDir::new().unwrap();
        let (sub, file) = build_tree(&temp);
        fs::set_permissions(&sub, fs::Permissions::from_mode(0o750)).unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();

        let snap = Snapshot::capture(temp.path()).unwrap();
        let report = snap.restore();

        assert!(report.is_complete());
        assert_eq!(report.restored, snap.len());
        assert_eq!(mode_of(&sub), 0o750);
        assert_eq!(mode_of(&file), 0o640);
    }

    #[test]
    fn restore_undoes_mode_changes() {
        let temp = TempDir::new().unwrap();
        let (sub, file) = build_tree(&temp);
        fs::set_permissions(&sub, fs::Permissions::from_mode(0o700)).unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o600)).unwrap();

        let snap = Snapshot::capture(temp.path()).unwrap();

        fs::set_permissions(&sub, fs::Permissions::from_mode(0o777)).unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o666)).unwrap();

        let report = snap.restore();
        assert!(report.is_complete());
        assert_eq!(mode_of(&sub), 0o700);
        assert_eq!(mode_of(&file), 0o600);
    }

    #[test]
    fn restore_is_best_effort_when_entries_disappear() {
        let temp = TempDir::new().unwrap();
        let (_sub, file) = build_tree(&temp);
        fs::write(temp.path().join("keep.txt"), "x").unwrap();

        let snap = Snapshot::capture(temp.path()).unwrap();
        fs::remove_file(&file).unwrap();

        let report = snap.restore();

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.restored, snap.len() - 1);
        let (bad_path, err) = &report.errors[0];
        assert_eq!(bad_path, &file);
        assert!(matches!(err, PermError::NotFound(_)));
    }

    #[test]
    fn snapshot_ignores_mutations_after_capture() {
        let temp = TempDir::new().unwrap();
        let (_, file) = build_tree(&temp);
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        let snap = Snapshot::capture(temp.path()).unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o600)).unwrap();

        // The capture keeps what it saw, not the live state.
        assert_eq!(snap.get(&file).unwrap().mode, 0o644);
    }
}
