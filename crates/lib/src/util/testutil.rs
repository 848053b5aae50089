//! Test utilities for cmbridge-lib.
//!
//! Cross-platform helpers for tests that need to run shell commands or lay
//! out a fake project tree.

use std::fs;
use std::path::{Path, PathBuf};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Write a minimal `CMakeLists.txt` at `rel` under `root`, creating parents.
pub fn write_descriptor(root: &Path, rel: &str) -> PathBuf {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, "cmake_minimum_required(VERSION 3.16)\nproject(fixture C)\n").unwrap();
  path
}
