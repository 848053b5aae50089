//! Configure-then-build orchestration.
//!
//! Given the top-level descriptor, the orchestrator walks a strictly linear
//! state machine:
//!
//! ```text
//! ENSURE_DIR -> CONFIGURE -> COMPILE -> DONE
//! ```
//!
//! Each step runs only if the previous one succeeded. There are no retries
//! and the build directory is never removed, so a failed run leaves the
//! toolchain's cache in place for diagnosis and for the next attempt.

mod types;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info};

use crate::toolchain::{ProcessRunner, SystemRunner, ToolchainInvocation};

pub use types::{
  BuildConfig, BuildError, BuildPlan, BuildReport, BuildStage, FailureReason, HostFlags, PhaseReport, ToolFailure,
};

/// Drives the toolchain through configure and build.
#[derive(Debug, Clone)]
pub struct Orchestrator<R = SystemRunner> {
  config: BuildConfig,
  runner: R,
}

impl Orchestrator<SystemRunner> {
  pub fn new(config: BuildConfig) -> Self {
    Self::with_runner(config, SystemRunner::new())
  }
}

impl<R: ProcessRunner> Orchestrator<R> {
  pub fn with_runner(config: BuildConfig, runner: R) -> Self {
    Self { config, runner }
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Compute the build directory and both invocations for `descriptor`.
  pub fn plan(&self, descriptor: &Path) -> BuildPlan {
    let source_dir = match descriptor.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    let build_dir = source_dir.join(&self.config.build_dir_name);

    BuildPlan {
      descriptor: descriptor.to_path_buf(),
      configure: self.configure_invocation(&source_dir, &build_dir),
      compile: self.compile_invocation(&build_dir),
      source_dir,
      build_dir,
    }
  }

  /// Run the full state machine for `descriptor`.
  ///
  /// # Errors
  ///
  /// - [`BuildError::Dir`] if the build directory cannot be created.
  /// - [`BuildError::Configure`] if configure does not exit zero; the build
  ///   phase is not invoked.
  /// - [`BuildError::BuildTool`] if the build phase does not exit zero.
  pub async fn build(&self, descriptor: &Path) -> Result<BuildReport, BuildError> {
    let plan = self.plan(descriptor);

    info!(stage = %BuildStage::EnsureDir, path = %plan.build_dir.display(), "preparing build directory");
    let created_build_dir = ensure_build_dir(&plan.build_dir).await?;

    info!(stage = %BuildStage::Configure, build_dir = %plan.build_dir.display(), "configuring project");
    let configure = self.run_phase(&plan.configure).await.map_err(|failure| {
      error!(stage = %BuildStage::Configure, error = %failure, "configure failed");
      BuildError::Configure(failure)
    })?;

    info!(stage = %BuildStage::Compile, build_dir = %plan.build_dir.display(), "building project");
    let compile = self.run_phase(&plan.compile).await.map_err(|failure| {
      error!(stage = %BuildStage::Compile, error = %failure, "build failed");
      BuildError::BuildTool(failure)
    })?;

    info!(
      stage = %BuildStage::Done,
      configure_ms = configure.elapsed.as_millis() as u64,
      compile_ms = compile.elapsed.as_millis() as u64,
      "build succeeded"
    );

    Ok(BuildReport {
      source_dir: plan.source_dir,
      build_dir: plan.build_dir,
      created_build_dir,
      configure,
      compile,
    })
  }

  fn configure_invocation(&self, source_dir: &Path, build_dir: &Path) -> ToolchainInvocation {
    let config = &self.config;
    let mut inv = ToolchainInvocation::new(&config.toolchain)
      .arg("-B")
      .arg(build_dir.to_string_lossy())
      .arg("-S")
      .arg(source_dir.to_string_lossy());

    if let Some(generator) = &config.generator {
      inv = inv.arg("-G").arg(generator);
    }
    if let Some(build_type) = &config.build_type {
      inv = inv.arg(format!("-DCMAKE_BUILD_TYPE={}", build_type));
    }
    inv = inv.args(config.flags.defines());
    inv = inv.args(config.defines.iter().map(|(key, value)| format!("-D{}={}", key, value)));
    inv.args(config.configure_args.iter().cloned())
  }

  fn compile_invocation(&self, build_dir: &Path) -> ToolchainInvocation {
    let config = &self.config;
    let mut inv = ToolchainInvocation::new(&config.toolchain)
      .arg("--build")
      .arg(build_dir.to_string_lossy());

    if let Some(build_config) = &config.build_config {
      inv = inv.arg("--config").arg(build_config);
    }
    if let Some(jobs) = config.jobs {
      inv = inv.arg("--parallel").arg(jobs.to_string());
    }
    inv.args(config.build_args.iter().cloned())
  }

  async fn run_phase(&self, invocation: &ToolchainInvocation) -> Result<PhaseReport, ToolFailure> {
    let started = Instant::now();

    let output = match self.runner.run(invocation, self.config.timeout).await {
      Ok(output) => output,
      Err(e) => {
        return Err(ToolFailure {
          invocation: invocation.clone(),
          reason: FailureReason::Spawn(e.to_string()),
          output: Default::default(),
        });
      }
    };

    if output.success() {
      return Ok(PhaseReport {
        invocation: invocation.clone(),
        output,
        elapsed: started.elapsed(),
      });
    }

    let reason = match (output.timed_out, output.code) {
      (true, _) => FailureReason::TimedOut(self.config.timeout.unwrap_or_default()),
      (false, Some(code)) => FailureReason::ExitCode(code),
      (false, None) => FailureReason::Signal,
    };
    Err(ToolFailure {
      invocation: invocation.clone(),
      reason,
      output,
    })
  }
}

/// Create the build directory if missing. Returns whether it was created.
async fn ensure_build_dir(path: &Path) -> Result<bool, BuildError> {
  let dir_error = |source: io::Error| BuildError::Dir {
    path: path.to_path_buf(),
    source,
  };

  match tokio::fs::metadata(path).await {
    Ok(meta) if meta.is_dir() => {
      debug!(path = %path.display(), "build directory exists");
      return Ok(false);
    }
    Ok(_) => {
      return Err(dir_error(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "path exists and is not a directory",
      )));
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(dir_error(e)),
  }

  tokio::fs::create_dir_all(path).await.map_err(dir_error)?;
  debug!(path = %path.display(), "created build directory");
  Ok(true)
}
