//! Types for build orchestration.
//!
//! Configuration for the two toolchain phases, the stage enum that names
//! each step of the state machine, and the errors and reports it produces.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::consts::{BUILD_DIR_NAME, DEFAULT_TOOLCHAIN};
use crate::toolchain::{InvocationOutput, ToolchainInvocation};

/// Compiler flag lists preserved from the host environment.
///
/// Non-empty lists are forwarded to the configure phase as
/// `CMAKE_C_FLAGS` / `CMAKE_CXX_FLAGS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostFlags {
  pub cflags: Vec<String>,
  pub cxxflags: Vec<String>,
}

impl HostFlags {
  /// Split whitespace-separated flag strings, as found in `CFLAGS`/`CXXFLAGS`.
  pub fn parse(cflags: &str, cxxflags: &str) -> Self {
    Self {
      cflags: cflags.split_whitespace().map(String::from).collect(),
      cxxflags: cxxflags.split_whitespace().map(String::from).collect(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.cflags.is_empty() && self.cxxflags.is_empty()
  }

  /// `-D` arguments for the configure phase.
  pub fn defines(&self) -> Vec<String> {
    let mut out = Vec::new();
    if !self.cflags.is_empty() {
      out.push(format!("-DCMAKE_C_FLAGS={}", self.cflags.join(" ")));
    }
    if !self.cxxflags.is_empty() {
      out.push(format!("-DCMAKE_CXX_FLAGS={}", self.cxxflags.join(" ")));
    }
    out
  }
}

/// Configuration for the build orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
  /// Toolchain program, resolved through `PATH` when not absolute.
  pub toolchain: String,

  /// Name of the build-output directory created beside the descriptor.
  pub build_dir_name: String,

  /// Upper bound for each toolchain phase. `None` waits forever.
  pub timeout: Option<Duration>,

  /// CMake generator (`-G`).
  pub generator: Option<String>,

  /// `CMAKE_BUILD_TYPE` for single-config generators.
  pub build_type: Option<String>,

  /// Cache entries passed as `-D KEY=VALUE`.
  pub defines: BTreeMap<String, String>,

  pub flags: HostFlags,

  /// Parallel build jobs (`--parallel`).
  pub jobs: Option<usize>,

  /// Configuration for multi-config generators (`--config`).
  pub build_config: Option<String>,

  /// Extra arguments appended verbatim to the configure phase.
  pub configure_args: Vec<String>,

  /// Extra arguments appended verbatim to the build phase.
  pub build_args: Vec<String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      toolchain: DEFAULT_TOOLCHAIN.to_string(),
      build_dir_name: BUILD_DIR_NAME.to_string(),
      timeout: None,
      generator: None,
      build_type: None,
      defines: BTreeMap::new(),
      flags: HostFlags::default(),
      jobs: None,
      build_config: None,
      configure_args: Vec::new(),
      build_args: Vec::new(),
    }
  }
}

/// Steps of the orchestration state machine, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStage {
  EnsureDir,
  Configure,
  Compile,
  Done,
}

impl fmt::Display for BuildStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      BuildStage::EnsureDir => "ensure-dir",
      BuildStage::Configure => "configure",
      BuildStage::Compile => "compile",
      BuildStage::Done => "done",
    };
    f.write_str(name)
  }
}

/// Why a toolchain phase did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
  #[error("exited with code {0}")]
  ExitCode(i32),

  #[error("was terminated by a signal")]
  Signal,

  #[error("timed out after {0:?}")]
  TimedOut(Duration),

  #[error("could not be started: {0}")]
  Spawn(String),
}

/// A failed toolchain phase with everything needed to diagnose it.
#[derive(Debug, Clone, Error)]
#[error("`{invocation}` {reason}")]
pub struct ToolFailure {
  pub invocation: ToolchainInvocation,
  pub reason: FailureReason,
  pub output: InvocationOutput,
}

impl ToolFailure {
  pub fn code(&self) -> Option<i32> {
    self.output.code
  }

  /// Last `max_lines` lines of captured diagnostics, preferring stderr.
  pub fn diagnostics(&self, max_lines: usize) -> Vec<&str> {
    let source = if self.output.stderr.trim().is_empty() {
      &self.output.stdout
    } else {
      &self.output.stderr
    };
    let lines: Vec<&str> = source.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].to_vec()
  }
}

/// Errors that can occur during orchestration. Each variant stops the run.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The build-output directory could not be created.
  #[error("failed to create build directory {}: {source}", path.display())]
  Dir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The configure phase failed; the build phase was not run.
  #[error("configure failed: {0}")]
  Configure(#[source] ToolFailure),

  /// The build phase failed.
  #[error("build failed: {0}")]
  BuildTool(#[source] ToolFailure),
}

impl BuildError {
  /// The stage at which the run stopped.
  pub fn stage(&self) -> BuildStage {
    match self {
      BuildError::Dir { .. } => BuildStage::EnsureDir,
      BuildError::Configure(_) => BuildStage::Configure,
      BuildError::BuildTool(_) => BuildStage::Compile,
    }
  }

  pub fn failure(&self) -> Option<&ToolFailure> {
    match self {
      BuildError::Dir { .. } => None,
      BuildError::Configure(f) | BuildError::BuildTool(f) => Some(f),
    }
  }
}

/// What a run would do, computed without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
  pub descriptor: PathBuf,
  pub source_dir: PathBuf,
  pub build_dir: PathBuf,
  pub configure: ToolchainInvocation,
  pub compile: ToolchainInvocation,
}

/// Outcome of one successful toolchain phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
  pub invocation: ToolchainInvocation,
  pub output: InvocationOutput,
  pub elapsed: Duration,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub source_dir: PathBuf,
  pub build_dir: PathBuf,
  /// Whether this run created the build directory.
  pub created_build_dir: bool,
  pub configure: PhaseReport,
  pub compile: PhaseReport,
}
