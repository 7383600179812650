use crate::command::{finish, resolve_root};
use crate::error::Result;
use crate::fs::Transaction;
use crate::validation::parse_owner;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct ChownArgs {
    /// Root of the tree to change
    pub path: PathBuf,

    /// New owner, as UID or UID:GID
    ///
    /// A bare UID implies GID = UID.
    pub owner: String,

    /// Show what would change without applying any modifications
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Skip the interactive confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn execute(args: ChownArgs) -> Result<()> {
    let (uid, gid) = parse_owner(&args.owner)?;
    let root = resolve_root(&args.path)?;

    log::debug!("chown {}:{} on {}", uid, gid, root.display());

    let mut txn = Transaction::new(root, args.dry_run);
    txn.chown(uid, gid)?;
    finish(txn, args.yes, args.dry_run)
}
