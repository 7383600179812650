use crate::command::{finish, resolve_root};
use crate::error::{PermError, Result};
use crate::fs::Transaction;
use crate::validation::{parse_mode, parse_owner};

use clap::Parser;
use std::path::PathBuf;

/// Combined ownership and mode change in one transaction.
///
/// Typical site lockdown, taken from the original provisioning workflow:
///
///   permtx apply /srv/www/site --owner 1000 --dir-mode 755 --file-mode 644
///
/// Any failure partway rolls the whole tree back to its pre-transaction
/// snapshot.
#[derive(Parser, Debug, Clone)]
#[clap(verbatim_doc_comment)]
pub struct ApplyArgs {
    /// Root of the tree to change
    pub path: PathBuf,

    /// New owner, as UID or UID:GID
    #[arg(long, value_name = "UID[:GID]")]
    pub owner: Option<String>,

    /// Octal mode for directories, root included
    #[arg(long, value_name = "MODE", requires = "file_mode")]
    pub dir_mode: Option<String>,

    /// Octal mode for files
    #[arg(long, value_name = "MODE", requires = "dir_mode")]
    pub file_mode: Option<String>,

    /// Show what would change without applying any modifications
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Skip the interactive confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn execute(args: ApplyArgs) -> Result<()> {
    if args.owner.is_none() && args.dir_mode.is_none() {
        return Err(PermError::Other(anyhow::anyhow!(
            "Nothing to do: pass --owner and/or --dir-mode with --file-mode"
        )));
    }

    let root = resolve_root(&args.path)?;
    let mut txn = Transaction::new(root, args.dry_run);

    // Ownership first, modes second, matching the original hardening order.
    if let Some(owner) = &args.owner {
        let (uid, gid) = parse_owner(owner)?;
        txn.chown(uid, gid)?;
    }

    if let (Some(dir_mode), Some(file_mode)) = (&args.dir_mode, &args.file_mode) {
        txn.chmod(parse_mode(dir_mode)?, parse_mode(file_mode)?)?;
    }

    finish(txn, args.yes, args.dry_run)
}
