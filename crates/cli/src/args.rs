//! Command-line arguments shared by the subcommands.
//!
//! Every option is an override on top of [`BridgeConfig::from_env`]. The
//! options the host environment can supply (`PROJECT_DIR`,
//! `CMBRIDGE_TOOLCHAIN`, `CFLAGS`, `CXXFLAGS`) fall back to those variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use cmbridge_lib::BridgeConfig;
use cmbridge_lib::consts::{PROJECT_DIR_ENV, TOOLCHAIN_ENV};
use cmbridge_lib::locate::IoErrorPolicy;
use cmbridge_lib::orchestrate::HostFlags;

/// Where to look for the top-level `CMakeLists.txt`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
  /// Project root (default: the current directory)
  #[arg(env = PROJECT_DIR_ENV)]
  pub project_dir: Option<PathBuf>,

  /// Directory under the project root to search
  #[arg(long, value_name = "DIR")]
  pub source_subdir: Option<PathBuf>,

  /// Abort on unreadable directories instead of skipping them
  #[arg(long)]
  pub strict_io: bool,

  /// Descend into symlinked directories
  #[arg(long)]
  pub follow_symlinks: bool,
}

impl SearchArgs {
  pub fn apply(&self, config: &mut BridgeConfig) {
    if let Some(dir) = &self.project_dir {
      config.project_dir = dir.clone();
    }
    if let Some(subdir) = &self.source_subdir {
      config.source_subdir = subdir.clone();
    }
    if self.strict_io {
      config.traversal.on_error = IoErrorPolicy::Abort;
    }
    config.traversal.follow_symlinks = self.follow_symlinks;
  }

  pub fn to_config(&self) -> BridgeConfig {
    let mut config = BridgeConfig::from_env();
    self.apply(&mut config);
    config
  }
}

/// Options controlling the toolchain invocations.
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
  #[command(flatten)]
  pub search: SearchArgs,

  /// Toolchain program (default: `cmake`)
  #[arg(long, value_name = "PROGRAM", env = TOOLCHAIN_ENV)]
  pub toolchain: Option<String>,

  /// Name of the build directory created next to the descriptor
  #[arg(long, value_name = "NAME")]
  pub build_dir_name: Option<String>,

  /// Kill a toolchain phase that runs longer than this (e.g. `10m`, `90s`)
  #[arg(long, value_parser = humantime::parse_duration)]
  pub timeout: Option<Duration>,

  /// CMake generator passed as `-G`
  #[arg(short = 'G', long)]
  pub generator: Option<String>,

  /// Value for CMAKE_BUILD_TYPE
  #[arg(long)]
  pub build_type: Option<String>,

  /// Cache entry passed to configure (repeatable)
  #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_define)]
  pub defines: Vec<(String, String)>,

  /// C compiler flags
  #[arg(long, env = "CFLAGS", allow_hyphen_values = true)]
  pub cflags: Option<String>,

  /// C++ compiler flags
  #[arg(long, env = "CXXFLAGS", allow_hyphen_values = true)]
  pub cxxflags: Option<String>,

  /// Parallel build jobs
  #[arg(short, long)]
  pub jobs: Option<usize>,

  /// Configuration for multi-config generators
  #[arg(long, value_name = "CONFIG")]
  pub config: Option<String>,

  /// Extra argument appended to the configure phase (repeatable)
  #[arg(long = "configure-arg", value_name = "ARG", allow_hyphen_values = true)]
  pub configure_args: Vec<String>,

  /// Extra argument appended to the build phase (repeatable)
  #[arg(long = "build-arg", value_name = "ARG", allow_hyphen_values = true)]
  pub build_args: Vec<String>,
}

impl BuildArgs {
  pub fn to_config(&self) -> BridgeConfig {
    let mut config = self.search.to_config();
    let build = &mut config.build;

    if let Some(toolchain) = &self.toolchain {
      build.toolchain = toolchain.clone();
    }
    if let Some(name) = &self.build_dir_name {
      build.build_dir_name = name.clone();
    }
    if self.cflags.is_some() || self.cxxflags.is_some() {
      let cflags = self.cflags.clone().unwrap_or_else(|| build.flags.cflags.join(" "));
      let cxxflags = self.cxxflags.clone().unwrap_or_else(|| build.flags.cxxflags.join(" "));
      build.flags = HostFlags::parse(&cflags, &cxxflags);
    }
    build.timeout = self.timeout;
    build.generator = self.generator.clone();
    build.build_type = self.build_type.clone();
    build.defines.extend(self.defines.iter().cloned());
    build.jobs = self.jobs;
    build.build_config = self.config.clone();
    build.configure_args = self.configure_args.clone();
    build.build_args = self.build_args.clone();

    config
  }
}

fn parse_define(s: &str) -> Result<(String, String), String> {
  match s.split_once('=') {
    Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
    _ => Err(format!("expected KEY=VALUE, got `{}`", s)),
  }
}
