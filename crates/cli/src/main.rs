mod args;
mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{BuildArgs, SearchArgs};
use cmd::{cmd_build, cmd_locate, cmd_plan};
use output::{OutputFormat, print_error};

/// cmbridge - build the CMake project inside a host source tree
#[derive(Parser)]
#[command(name = "cmbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Locate the top-level CMakeLists.txt, then configure and build it
  Build(BuildArgs),

  /// Print the top-level CMakeLists.txt
  Locate(SearchArgs),

  /// Show the toolchain commands a build would run
  Plan(BuildArgs),
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  // RUST_LOG wins; otherwise quiet unless --verbose.
  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match &cli.command {
    Commands::Build(args) => cmd_build(args, cli.format),
    Commands::Locate(args) => cmd_locate(args, cli.format, cli.verbose),
    Commands::Plan(args) => cmd_plan(args, cli.format),
  };

  match result {
    Ok(code) => code,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
