#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// Create a configured `ligi` command suitable for integration tests,
/// pointed at `home` as `$HOME` so the global workspace (`~/.ligi`) stays
/// isolated between test cases.
pub fn ligi_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ligi").expect("ligi binary should build");
    cmd.env("HOME", home);
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Scaffold a bare repo workspace at `root/art` (spec's `ligi init` is a
/// non-goal, so tests create the directory directly).
pub fn init_repo(root: &Path) {
    std::fs::create_dir_all(root.join("art")).expect("create art/");
}
