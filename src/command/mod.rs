pub mod apply;
pub mod chmod;
pub mod chown;

use crate::error::{PermError, Result};
use crate::fs::Transaction;
use crate::validation::{check_root, confirm_plan};

use colored::Colorize;
use std::path::{Path, PathBuf};

/// Validates the tree root and resolves it to an absolute path.
pub(crate) fn resolve_root(path: &Path) -> Result<PathBuf> {
    check_root(path)?;
    path.canonicalize()
        .map_err(|e| PermError::classify(path, e))
}

/// Confirms and commits a staged transaction, rolling back on failure.
///
/// Shared tail of every subcommand: prompt (unless `--yes`/`--dry-run`),
/// commit, attempt rollback if the commit fails partway, print a summary
/// on success.
pub(crate) fn finish(mut txn: Transaction, yes: bool, dry_run: bool) -> Result<()> {
    if !confirm_plan(txn.root(), &txn.preview(), yes, dry_run)? {
        println!("\n{}", "Operation cancelled.".yellow());
        return Err(PermError::Cancelled);
    }

    if let Err(e) = txn.commit() {
        eprintln!("{} {}", "Error during commit:".red().bold(), e);

        if !dry_run && !txn.is_empty() {
            eprintln!("{}", "Attempting to rollback changes...".yellow().bold());
            match txn.rollback() {
                Ok(_) => eprintln!("{}", "✓ Rollback successful.".green()),
                Err(rollback_err) => {
                    eprintln!("{} {}", "✗ Rollback failed:".red().bold(), rollback_err);
                }
            }
        }

        return Err(e);
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    txn.print_summary(&cwd);

    if !dry_run {
        println!(
            "{} {} operation(s) on {}",
            "✓ Successfully applied".green().bold(),
            txn.len(),
            txn.root().display()
        );
    }

    Ok(())
}
