//! Terminal output for the `build`, `locate` and `plan` commands.
//!
//! Results go to stdout so `cmbridge locate` can be captured by a host build
//! script. Warnings, errors and replayed toolchain diagnostics go to stderr.
//! In JSON mode stdout carries exactly one document.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

/// Value of the global `--format` flag.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

/// Width the labels of [`print_stat`] are padded to.
const STAT_LABEL_WIDTH: usize = 10;

/// Render a phase duration. Full builds can run for hours, a no-op rebuild
/// for milliseconds.
pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 3600 {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
  } else if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

/// One toolchain phase of a plan: `→ configure: cmake -B … -S …`.
pub fn print_step(phase: &str, command: &str) {
  println!(
    "  {} {}: {}",
    symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
    phase,
    command
  );
}

pub fn print_stat(label: &str, value: &str) {
  let label = format!("{:<width$}", format!("{label}:"), width = STAT_LABEL_WIDTH + 1);
  println!("  {} {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

/// Replay the tail of a failed phase's output under the error line.
pub fn print_detail_lines<'a>(lines: impl IntoIterator<Item = &'a str>) {
  for line in lines {
    eprintln!("    {}", line.if_supports_color(Stream::Stderr, |s| s.dimmed()));
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
