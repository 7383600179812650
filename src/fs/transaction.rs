//! Snapshot-guarded permission transactions.
//!
//! Coordinates one or more recursive ownership/mode changes against a
//! single tree that must succeed or be rolled back as a unit.
//!
//! ## Execution Guarantees
//!
//! - **Snapshot first**: a full permission snapshot is captured before the
//!   first mutation
//! - **Ordering**: staged operations run in staging order
//! - **No partial success**: a failed operation leaves the transaction in
//!   a failed state; `rollback()` restores the snapshot
//! - **Idempotency**: recursive chown/chmod can be re-run safely
//!
//! ## Phases
//!
//! 1. **Build**: stage operations via `chown()` and `chmod()`
//! 2. **Commit**: capture snapshot, apply each operation to the tree
//! 3. **Rollback** (on failure): best-effort restore of every snapshot
//!    entry, aggregating any errors
//!
//! ## Example
//!
//! ```no_run
//! # use permtx::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> permtx::error::Result<()> {
//! let mut txn = Transaction::new(PathBuf::from("/srv/www/site"), false);
//!
//! txn.chown(1000, 48)?;
//! txn.chmod(0o775, 0o664)?;
//!
//! if txn.commit().is_err() {
//!     txn.rollback()?;
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{PermError, Result};
use crate::fs::apply::{apply_mode, apply_ownership};
use crate::fs::snapshot::Snapshot;

use colored::Colorize;
use std::path::{Path, PathBuf};

/// A staged recursive permission change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Set owner/group on the root and every descendant.
    Chown { uid: u32, gid: u32 },
    /// Set `dir_mode` on directories (root included) and `file_mode` on
    /// files.
    Chmod { dir_mode: u32, file_mode: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    /// Staging operations.
    Building,
    /// All operations succeeded.
    Committed,
    /// Commit failed partway; snapshot retained for rollback.
    Failed,
    /// Snapshot restored after commit or failure.
    RolledBack,
}

/// Transaction applying staged permission changes to one tree.
///
/// Must be explicitly committed. If dropped without committing, logs a
/// warning but doesn't roll back (since operations weren't applied).
///
/// ## Dry-Run Mode
///
/// When `dry_run = true`, operations are staged and previewed but never
/// executed, and no snapshot is captured.
#[must_use = "Transaction must be committed or rolled back"]
pub struct Transaction {
    root: PathBuf,
    operations: Vec<Operation>,
    dry_run: bool,
    state: TransactionState,
    snapshot: Option<Snapshot>,
}

impl Transaction {
    /// Creates a new transaction for the tree rooted at `root`.
    pub fn new(root: PathBuf, dry_run: bool) -> Self {
        Self {
            root,
            operations: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            snapshot: None,
        }
    }

    /// The tree this transaction operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns true if successfully committed.
    pub fn is_committed(&self) -> bool {
        self.state == TransactionState::Committed
    }

    /// Stages a recursive ownership change.
    ///
    /// Not executed until `commit()`.
    pub fn chown(&mut self, uid: u32, gid: u32) -> Result<()> {
        self.stage(Operation::Chown { uid, gid })
    }

    /// Stages a recursive mode change.
    ///
    /// Not executed until `commit()`. Modes above the chmod bit range are
    /// rejected here rather than surfacing as an OS error mid-commit.
    pub fn chmod(&mut self, dir_mode: u32, file_mode: u32) -> Result<()> {
        for mode in [dir_mode, file_mode] {
            if mode > 0o7777 {
                return Err(PermError::InvalidMode(
                    format!("{mode:o}"),
                    "exceeds the 07777 permission bit range".to_string(),
                ));
            }
        }
        self.stage(Operation::Chmod {
            dir_mode,
            file_mode,
        })
    }

    fn stage(&mut self, op: Operation) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(PermError::Other(anyhow::anyhow!(
                "Cannot modify transaction after commit/rollback"
            )));
        }

        if self.dry_run {
            log::info!("Would apply {} to {}", describe(&op), self.root.display());
        } else {
            log::debug!("Staging {} for {}", describe(&op), self.root.display());
        }

        self.operations.push(op);
        Ok(())
    }

    /// Returns human-readable preview of operations.
    pub fn preview(&self) -> Vec<String> {
        self.operations.iter().map(describe).collect()
    }

    /// Commits all staged operations.
    ///
    /// Order:
    /// 1. Capture a snapshot of the whole tree
    /// 2. Apply each staged operation, in staging order
    ///
    /// On failure the error is returned untouched and the snapshot is
    /// retained; call [`rollback`](Self::rollback) to restore it. The
    /// engine never rolls back implicitly inside an operation, so entries
    /// mutated before the failure keep their new state until then.
    pub fn commit(&mut self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(PermError::Other(anyhow::anyhow!(
                "Transaction already committed/rolled back"
            )));
        }

        if self.dry_run {
            self.state = TransactionState::Committed;
            return Ok(());
        }

        // Capture before the first mutation. A capture failure aborts with
        // nothing applied.
        let snapshot = match Snapshot::capture(&self.root) {
            Ok(s) => s,
            Err(e) => {
                self.state = TransactionState::Failed;
                return Err(e);
            }
        };
        log::debug!("Snapshot of {} entries captured", snapshot.len());
        self.snapshot = Some(snapshot);

        for op in &self.operations {
            let result = match *op {
                Operation::Chown { uid, gid } => apply_ownership(&self.root, uid, gid),
                Operation::Chmod {
                    dir_mode,
                    file_mode,
                } => apply_mode(&self.root, dir_mode, file_mode),
            };

            if let Err(e) = result {
                log::error!("{} failed on {}: {}", describe(op), self.root.display(), e);
                self.state = TransactionState::Failed;
                return Err(e);
            }
        }

        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Restores the pre-commit snapshot.
    ///
    /// Works after a failed commit (the usual case) and after a successful
    /// one (manual undo). Restoration is best-effort per entry; if any
    /// entry cannot be restored the aggregated failures are returned as
    /// [`PermError::RollbackFailed`].
    pub fn rollback(&mut self) -> Result<()> {
        match self.state {
            // Nothing was applied.
            TransactionState::Building => Ok(()),
            TransactionState::Committed if self.dry_run => Ok(()),
            TransactionState::Committed | TransactionState::Failed => {
                let Some(snapshot) = self.snapshot.as_ref() else {
                    // Failed before capture; tree untouched.
                    self.state = TransactionState::RolledBack;
                    return Ok(());
                };

                let report = snapshot.restore();
                self.state = TransactionState::RolledBack;

                if report.is_complete() {
                    log::info!("Rollback completed, {} entries restored", report.restored);
                    Ok(())
                } else {
                    let detail: Vec<String> = report
                        .errors
                        .iter()
                        .map(|(path, e)| format!("{}: {}", path.display(), e))
                        .collect();
                    Err(PermError::RollbackFailed(detail.join("; ")))
                }
            }
            TransactionState::RolledBack => Err(PermError::Other(anyhow::anyhow!(
                "Transaction already rolled back"
            ))),
        }
    }

    /// Prints a short summary to stdout.
    ///
    /// `display_root` is used to render the managed root relative to the
    /// caller's working directory where possible.
    pub fn print_summary(&self, display_root: &Path) {
        let root = pathdiff::diff_paths(&self.root, display_root)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| self.root.clone());

        if self.operations.is_empty() {
            println!("\n{}", "No changes staged".yellow());
            return;
        }

        if self.dry_run {
            println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        } else {
            println!("\n{}", "Changes applied:".green().bold());
        }

        for op in &self.operations {
            if self.dry_run {
                println!("   • {} on {}", describe(op), root.display());
            } else {
                println!("   {} {} on {}", "✓".green(), describe(op), root.display());
            }
        }

        if let Some(snapshot) = &self.snapshot {
            println!(
                "\n{} entries covered by the rollback snapshot",
                snapshot.len().to_string().cyan().bold()
            );
        }
    }
}

fn describe(op: &Operation) -> String {
    match op {
        Operation::Chown { uid, gid } => format!("chown {uid}:{gid} (recursive)"),
        Operation::Chmod {
            dir_mode,
            file_mode,
        } => format!("chmod dirs={dir_mode:o} files={file_mode:o} (recursive)"),
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.operations.is_empty() && !self.dry_run
        {
            log::warn!("Transaction dropped without commit");
        }
    }
}
