use crate::command::{finish, resolve_root};
use crate::error::Result;
use crate::fs::Transaction;
use crate::validation::parse_mode;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct ChmodArgs {
    /// Root of the tree to change
    pub path: PathBuf,

    /// Octal mode for directories, root included (e.g. 755)
    pub dir_mode: String,

    /// Octal mode for files (e.g. 644)
    pub file_mode: String,

    /// Show what would change without applying any modifications
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Skip the interactive confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn execute(args: ChmodArgs) -> Result<()> {
    let dir_mode = parse_mode(&args.dir_mode)?;
    let file_mode = parse_mode(&args.file_mode)?;
    let root = resolve_root(&args.path)?;

    log::debug!(
        "chmod dirs={:o} files={:o} on {}",
        dir_mode,
        file_mode,
        root.display()
    );

    let mut txn = Transaction::new(root, args.dry_run);
    txn.chmod(dir_mode, file_mode)?;
    finish(txn, args.yes, args.dry_run)
}
