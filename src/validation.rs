use crate::error::{PermError, Result};
use colored::Colorize;
use std::path::Path;

/// Parses an octal mode string (`755`, `0644`, `2775`).
pub fn parse_mode(input: &str) -> Result<u32> {
    if input.is_empty() {
        return Err(PermError::InvalidMode(
            input.to_string(),
            "cannot be empty".to_string(),
        ));
    }

    let mode = u32::from_str_radix(input, 8).map_err(|_| {
        PermError::InvalidMode(
            input.to_string(),
            "must be an octal number".to_string(),
        )
    })?;

    if mode > 0o7777 {
        return Err(PermError::InvalidMode(
            input.to_string(),
            "exceeds the 07777 permission bit range".to_string(),
        ));
    }

    Ok(mode)
}

/// Parses an owner spec: `UID` or `UID:GID`.
///
/// A bare uid implies `gid = uid`, matching the common case of a user
/// whose primary group shares their id.
pub fn parse_owner(input: &str) -> Result<(u32, u32)> {
    let invalid = |reason: &str| {
        PermError::InvalidOwner(input.to_string(), reason.to_string())
    };

    match input.split_once(':') {
        Some((uid, gid)) => {
            let uid = uid
                .parse::<u32>()
                .map_err(|_| invalid("uid must be a non-negative integer"))?;
            let gid = gid
                .parse::<u32>()
                .map_err(|_| invalid("gid must be a non-negative integer"))?;
            Ok((uid, gid))
        }
        None => {
            let uid = input
                .parse::<u32>()
                .map_err(|_| invalid("expected UID or UID:GID"))?;
            Ok((uid, uid))
        }
    }
}

/// Checks that `root` exists and is a directory before staging anything.
pub fn check_root(root: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(root).map_err(|e| PermError::classify(root, e))?;
    if !meta.is_dir() {
        return Err(PermError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Prints the staged plan and asks for confirmation.
///
/// Skipped (treated as confirmed) with `--yes` or `--dry-run`.
pub fn confirm_plan(
    root: &Path,
    operations: &[String],
    yes: bool,
    dry_run: bool,
) -> Result<bool> {
    if yes || dry_run {
        return Ok(true);
    }

    println!("\n{}", "Plan:".bold().cyan());
    println!("  {} {}", "Tree:".bold(), root.display());
    for op in operations {
        println!("  {} {}", "✓".green(), op);
    }

    print!("\n{} [y/N] ", "Continue?".bold());
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut response = String::new();
    std::io::stdin().read_line(&mut response)?;

    Ok(response.trim().eq_ignore_ascii_case("y"))
}
