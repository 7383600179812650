use crate::command::{apply, chmod, chown};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "permtx", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Recursively change ownership of a tree, with rollback on failure.
    Chown(chown::ChownArgs),

    /// Recursively change permissions of a tree, with rollback on failure.
    Chmod(chmod::ChmodArgs),

    /// Apply ownership and mode changes in one transaction.
    Apply(apply::ApplyArgs),
}
