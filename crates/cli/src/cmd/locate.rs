//! Implementation of the `cmbridge locate` command.
//!
//! Prints the top-level `CMakeLists.txt` without building anything.

use std::process::ExitCode;

use anyhow::Result;

use cmbridge_lib::locate::{LocateError, Locator};

use crate::args::SearchArgs;
use crate::output::{OutputFormat, print_error, print_json, print_stat};

pub fn cmd_locate(args: &SearchArgs, format: OutputFormat, verbose: bool) -> Result<ExitCode> {
  let config = args.to_config();
  let root = config.search_root();

  let top = match Locator::new(config.traversal).locate(&root) {
    Ok(top) => top,
    Err(LocateError::NotFound { root }) => {
      print_error(&format!("No CMakeLists.txt found in {}", root.display()));
      return Ok(ExitCode::FAILURE);
    }
    Err(e) => {
      print_error(&format!("traversal: {}", e));
      return Ok(ExitCode::FAILURE);
    }
  };

  if format.is_json() {
    print_json(&top)?;
    return Ok(ExitCode::SUCCESS);
  }

  // Bare path on stdout so the command composes in scripts.
  println!("{}", top.path.display());

  if verbose {
    print_stat("Depth", &top.depth.to_string());
    print_stat("Candidates", &top.candidate_count().to_string());
    for nested in &top.nested {
      print_stat("Nested", &nested.display().to_string());
    }
  }

  Ok(ExitCode::SUCCESS)
}
