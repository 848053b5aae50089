//! Implementation of the `cmbridge plan` command.
//!
//! Shows which descriptor would be built and the exact toolchain commands,
//! without creating the build directory or running anything.

use std::process::ExitCode;

use anyhow::Result;

use cmbridge_lib::locate::{LocateError, Locator};
use cmbridge_lib::orchestrate::Orchestrator;

use crate::args::BuildArgs;
use crate::output::{OutputFormat, print_error, print_info, print_json, print_step, print_warning};

pub fn cmd_plan(args: &BuildArgs, format: OutputFormat) -> Result<ExitCode> {
  let config = args.to_config();
  let root = config.search_root();

  let descriptor = match Locator::new(config.traversal).locate(&root) {
    Ok(top) => top,
    Err(LocateError::NotFound { root }) => {
      print_warning(&format!("No CMakeLists.txt found in {}", root.display()));
      return Ok(ExitCode::SUCCESS);
    }
    Err(e) => {
      print_error(&format!("traversal: {}", e));
      return Ok(ExitCode::FAILURE);
    }
  };

  let plan = Orchestrator::new(config.build).plan(&descriptor.path);

  if format.is_json() {
    print_json(&plan)?;
    return Ok(ExitCode::SUCCESS);
  }

  print_info(&format!("Top-level CMakeLists.txt: {}", plan.descriptor.display()));
  let state = if plan.build_dir.is_dir() { "exists" } else { "will be created" };
  print_info(&format!("Build directory: {} ({})", plan.build_dir.display(), state));
  print_step("configure", &plan.configure.to_string());
  print_step("build", &plan.compile.to_string());

  Ok(ExitCode::SUCCESS)
}
