#![doc = include_str!("../README.md")]

pub mod cli;
pub mod command;
pub mod error;
pub mod fs;
pub mod validation;

pub use error::*;
pub use fs::{Snapshot, Transaction, apply_mode, apply_ownership};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use cli::Command;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::Cli::parse();
    match cli.command {
        Command::Chown(args) => command::chown::execute(args),
        Command::Chmod(args) => command::chmod::execute(args),
        Command::Apply(args) => command::apply::execute(args),
    }
}
