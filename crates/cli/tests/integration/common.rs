//! Shared test helpers for CLI integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in for `cmake`: logs its arguments, prints a little output, and
/// exits as instructed by `CMBRIDGE_FAKE_*` variables.
const FAKE_TOOLCHAIN: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "$CMBRIDGE_FAKE_LOG"
if [ "$1" = "--build" ]; then
  echo "fake build output"
  echo "build diagnostics" >&2
  if [ -n "$CMBRIDGE_FAKE_BUILD_SLEEP" ]; then exec sleep "$CMBRIDGE_FAKE_BUILD_SLEEP"; fi
  exit "${CMBRIDGE_FAKE_BUILD_EXIT:-0}"
fi
echo "fake configure output"
echo "configure diagnostics" >&2
if [ -n "$CMBRIDGE_FAKE_CONFIGURE_SLEEP" ]; then exec sleep "$CMBRIDGE_FAKE_CONFIGURE_SLEEP"; fi
exit "${CMBRIDGE_FAKE_CONFIGURE_EXIT:-0}"
"#;

/// Variables that would leak host settings into the run under test.
const HOST_VARS: &[&str] = &["PROJECT_DIR", "CMBRIDGE_TOOLCHAIN", "CFLAGS", "CXXFLAGS", "RUST_LOG"];

/// Isolated project tree plus a fake toolchain.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let toolchain = temp.path().join("bin").join("fake-cmake");
    fs::create_dir_all(toolchain.parent().unwrap()).unwrap();
    fs::write(&toolchain, FAKE_TOOLCHAIN).unwrap();
    fs::set_permissions(&toolchain, fs::Permissions::from_mode(0o755)).unwrap();
    Self { temp }
  }

  /// Project root handed to `cmbridge`.
  pub fn project_dir(&self) -> PathBuf {
    self.temp.path().join("project")
  }

  pub fn src_dir(&self) -> PathBuf {
    self.project_dir().join("src")
  }

  pub fn toolchain(&self) -> PathBuf {
    self.temp.path().join("bin").join("fake-cmake")
  }

  pub fn log_path(&self) -> PathBuf {
    self.temp.path().join("toolchain.log")
  }

  /// Write a descriptor relative to the project's `src` directory.
  pub fn write_descriptor(&self, rel: &str) -> PathBuf {
    let path = self.src_dir().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "cmake_minimum_required(VERSION 3.16)\nproject(demo C)\n").unwrap();
    path
  }

  pub fn mkdir(&self, rel: &str) {
    fs::create_dir_all(self.project_dir().join(rel)).unwrap();
  }

  /// Lines the fake toolchain logged, one per invocation.
  pub fn invocations(&self) -> Vec<String> {
    match fs::read_to_string(self.log_path()) {
      Ok(log) => log.lines().map(String::from).collect(),
      Err(_) => Vec::new(),
    }
  }

  /// `cmbridge` with host variables cleared and the fake log wired up.
  pub fn cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("cmbridge");
    for var in HOST_VARS {
      cmd.env_remove(var);
    }
    cmd.env("CMBRIDGE_FAKE_LOG", self.log_path());
    cmd
  }

  /// `cmbridge <sub> <project> --toolchain <fake>`.
  pub fn run(&self, sub: &str) -> Command {
    let mut cmd = self.cmd();
    cmd.arg(sub).arg(self.project_dir()).arg("--toolchain").arg(self.toolchain());
    cmd
  }
}

pub fn display(path: &Path) -> String {
  path.display().to_string()
}
