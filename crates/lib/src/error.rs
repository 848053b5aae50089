//! Top-level error type for a bridge run.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::locate::LocateError;
use crate::orchestrate::BuildError;

/// Coarse classification of a failed run, kept in operator-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
  NotFound,
  Traversal,
  Dir,
  Configure,
  BuildTool,
}

impl ErrorKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ErrorKind::NotFound => "not-found",
      ErrorKind::Traversal => "traversal",
      ErrorKind::Dir => "dir",
      ErrorKind::Configure => "configure",
      ErrorKind::BuildTool => "build-tool",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum BridgeError {
  #[error(transparent)]
  Locate(#[from] LocateError),

  #[error(transparent)]
  Build(#[from] BuildError),
}

impl BridgeError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      BridgeError::Locate(LocateError::NotFound { .. }) => ErrorKind::NotFound,
      BridgeError::Locate(_) => ErrorKind::Traversal,
      BridgeError::Build(BuildError::Dir { .. }) => ErrorKind::Dir,
      BridgeError::Build(BuildError::Configure(_)) => ErrorKind::Configure,
      BridgeError::Build(BuildError::BuildTool(_)) => ErrorKind::BuildTool,
    }
  }
}
