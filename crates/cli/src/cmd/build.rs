//! Implementation of the `cmbridge build` command.
//!
//! Locates the top-level `CMakeLists.txt`, then configures and builds it.
//! A tree without any descriptor is reported and treated as a successful
//! no-op so the enclosing host build step is not torn down.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use cmbridge_lib::orchestrate::BuildError;
use cmbridge_lib::toolchain::SystemRunner;
use cmbridge_lib::{BridgeError, ErrorKind, RunOutcome, run};

use crate::args::BuildArgs;
use crate::output::{
  OutputFormat, format_duration, print_detail_lines, print_error, print_info, print_json, print_stat, print_success,
  print_warning,
};

/// Diagnostic lines of toolchain output shown on failure.
const DIAGNOSTIC_LINES: usize = 20;

#[derive(Serialize)]
struct FailureJson<'a> {
  status: &'static str,
  kind: ErrorKind,
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  build_dir: Option<PathBuf>,
  #[serde(skip_serializing_if = "Option::is_none")]
  code: Option<i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  stdout: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  stderr: Option<&'a str>,
}

/// Execute the build command.
///
/// Returns a failing exit code for every error except a missing descriptor.
pub fn cmd_build(args: &BuildArgs, format: OutputFormat) -> Result<ExitCode> {
  let config = args.to_config();
  let root = config.search_root();
  debug!(config = ?config, "resolved configuration");

  // Toolchain output would corrupt the JSON document on stdout.
  let runner = if format.is_json() {
    SystemRunner::quiet()
  } else {
    print_info(&format!("Searching for CMakeLists.txt in {}", root.display()));
    SystemRunner::new()
  };

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(run(config, runner));

  match result {
    Ok(outcome) if format.is_json() => {
      print_json(&outcome)?;
      Ok(ExitCode::SUCCESS)
    }
    Ok(RunOutcome::Built { descriptor, report }) => {
      println!();
      print_success("CMake build successful");
      print_stat("Descriptor", &descriptor.path.display().to_string());
      print_stat("Build dir", &report.build_dir.display().to_string());
      print_stat("Configure", &format_duration(report.configure.elapsed));
      print_stat("Build", &format_duration(report.compile.elapsed));
      print_stat("Total", &format_duration(started.elapsed()));
      Ok(ExitCode::SUCCESS)
    }
    Ok(RunOutcome::Skipped { root }) => {
      print_warning(&format!("No CMakeLists.txt found in {}", root.display()));
      print_warning("Aborting build process due to missing CMakeLists.txt.");
      Ok(ExitCode::SUCCESS)
    }
    Err(err) => {
      report_failure(&err, format)?;
      Ok(ExitCode::FAILURE)
    }
  }
}

fn report_failure(err: &BridgeError, format: OutputFormat) -> Result<()> {
  let failure = match err {
    BridgeError::Build(build_err) => build_err.failure(),
    BridgeError::Locate(_) => None,
  };

  if format.is_json() {
    let build_dir = match err {
      BridgeError::Build(BuildError::Dir { path, .. }) => Some(path.clone()),
      _ => None,
    };
    return print_json(&FailureJson {
      status: "failed",
      kind: err.kind(),
      message: err.to_string(),
      build_dir,
      code: failure.and_then(|f| f.code()),
      stdout: failure.map(|f| f.output.stdout.as_str()),
      stderr: failure.map(|f| f.output.stderr.as_str()),
    });
  }

  print_error(&format!("{}: {}", err.kind(), err));
  if let Some(failure) = failure {
    let lines = failure.diagnostics(DIAGNOSTIC_LINES);
    // Already streamed live; repeat the tail so it sits next to the error.
    if !lines.is_empty() {
      print_detail_lines(lines);
    }
  }
  Ok(())
}
