//! Value types describing one toolchain process call and its result.

use std::fmt;

use serde::Serialize;

/// One external process call: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainInvocation {
  pub program: String,
  pub args: Vec<String>,
}

impl ToolchainInvocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }
}

impl fmt::Display for ToolchainInvocation {
  /// Shell-like rendering, quoting arguments that contain whitespace.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", quote(&self.program))?;
    for arg in &self.args {
      write!(f, " {}", quote(arg))?;
    }
    Ok(())
  }
}

fn quote(s: &str) -> String {
  if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"') {
    format!("\"{}\"", s.replace('"', "\\\""))
  } else {
    s.to_string()
  }
}

/// Structured result of a finished (or killed) process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvocationOutput {
  /// Exit code; `None` when the process was killed by a signal or timed out.
  pub code: Option<i32>,
  /// Captured stdout (tail, lossily decoded).
  pub stdout: String,
  /// Captured stderr (tail, lossily decoded).
  pub stderr: String,
  pub timed_out: bool,
}

impl InvocationOutput {
  pub fn success(&self) -> bool {
    !self.timed_out && self.code == Some(0)
  }
}
