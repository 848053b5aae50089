//! Host configuration.
//!
//! Everything the locator and orchestrator need is carried in an explicit
//! [`BridgeConfig`] handed to them by value. The only place the process
//! environment is consulted is [`BridgeConfig::from_env`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{PROJECT_DIR_ENV, SOURCE_SUBDIR, TOOLCHAIN_ENV};
use crate::locate::TraversalPolicy;
use crate::orchestrate::{BuildConfig, HostFlags};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeConfig {
  /// Root of the host project.
  pub project_dir: PathBuf,

  /// Directory below `project_dir` that is searched for descriptors.
  pub source_subdir: PathBuf,

  pub traversal: TraversalPolicy,

  pub build: BuildConfig,
}

impl BridgeConfig {
  pub fn new(project_dir: impl Into<PathBuf>) -> Self {
    Self {
      project_dir: project_dir.into(),
      source_subdir: PathBuf::from(SOURCE_SUBDIR),
      traversal: TraversalPolicy::default(),
      build: BuildConfig::default(),
    }
  }

  /// Build a configuration from the host environment.
  ///
  /// - `PROJECT_DIR`: project root (default: current directory)
  /// - `CMBRIDGE_TOOLCHAIN`: toolchain program (default: `cmake`)
  /// - `CFLAGS` / `CXXFLAGS`: preserved compiler flags
  pub fn from_env() -> Self {
    let project_dir = non_empty_var(PROJECT_DIR_ENV).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let mut config = Self::new(project_dir);
    if let Some(toolchain) = non_empty_var(TOOLCHAIN_ENV) {
      config.build.toolchain = toolchain;
    }
    config.build.flags = HostFlags::parse(
      &non_empty_var("CFLAGS").unwrap_or_default(),
      &non_empty_var("CXXFLAGS").unwrap_or_default(),
    );
    config
  }

  /// Directory the locator walks: `project_dir/source_subdir`.
  pub fn search_root(&self) -> PathBuf {
    if self.source_subdir.as_os_str().is_empty() || self.source_subdir == Path::new(".") {
      return self.project_dir.clone();
    }
    self.project_dir.join(&self.source_subdir)
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
