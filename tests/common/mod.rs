//! Integration test helpers for permtx
//!
//! These tests verify end-to-end behavior by building real directory trees
//! and executing permission changes through the command-line interface.

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a small site-like tree:
///
/// ```text
/// root/
///   index.html        (0644)
///   .htaccess         (0600)
///   content/          (0750)
///     uploads/        (0750)
///       pic.jpg       (0640)
/// ```
#[allow(unused)]
pub fn create_test_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::write(root.join("index.html"), "<html></html>").unwrap();
    set_mode(&root.join("index.html"), 0o644);

    fs::write(root.join(".htaccess"), "Deny from all").unwrap();
    set_mode(&root.join(".htaccess"), 0o600);

    let content = root.join("content");
    fs::create_dir(&content).unwrap();
    set_mode(&content, 0o750);

    let uploads = content.join("uploads");
    fs::create_dir(&uploads).unwrap();
    fs::write(uploads.join("pic.jpg"), "jpeg").unwrap();
    set_mode(&uploads.join("pic.jpg"), 0o640);
    set_mode(&uploads, 0o750);

    temp
}

#[allow(unused)]
pub fn set_mode(path: &Path, mode: u32) {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[allow(unused)]
pub fn mode_of(path: &Path) -> u32 {
    fs::symlink_metadata(path).unwrap().mode() & 0o7777
}

#[allow(unused)]
pub fn owner_of(path: &Path) -> (u32, u32) {
    let meta = fs::symlink_metadata(path).unwrap();
    (meta.uid(), meta.gid())
}

/// Helper to run a permtx subcommand with `--yes`
#[allow(unused)]
pub fn run_permtx(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("permtx");
    cmd.args(args).arg("--yes");
    cmd.assert()
}
