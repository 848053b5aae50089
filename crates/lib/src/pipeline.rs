//! Locate-then-build pipeline.
//!
//! Composes the locator and the orchestrator for one run. A tree without
//! any descriptor is a soft abort: it yields [`RunOutcome::Skipped`] rather
//! than an error, so the enclosing build step can report it and move on.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::locate::{LocateError, Locator, TopLevelDescriptor};
use crate::orchestrate::{BuildReport, Orchestrator};
use crate::toolchain::ProcessRunner;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RunOutcome {
  Built {
    descriptor: TopLevelDescriptor,
    report: BuildReport,
  },
  /// No descriptor under the search root; nothing was run.
  Skipped { root: PathBuf },
}

/// Locate the top-level descriptor and build it.
///
/// # Errors
///
/// Any locator error other than "not found", and every orchestration error.
pub async fn run<R: ProcessRunner>(config: BridgeConfig, runner: R) -> Result<RunOutcome, BridgeError> {
  let root = config.search_root();
  let locator = Locator::new(config.traversal);
  let orchestrator = Orchestrator::with_runner(config.build, runner);

  let descriptor = match locator.locate(&root) {
    Ok(descriptor) => descriptor,
    Err(LocateError::NotFound { root }) => {
      warn!(root = %root.display(), "no CMakeLists.txt found, skipping build");
      return Ok(RunOutcome::Skipped { root });
    }
    Err(e) => return Err(e.into()),
  };

  let report = orchestrator.build(&descriptor.path).await?;
  Ok(RunOutcome::Built { descriptor, report })
}
