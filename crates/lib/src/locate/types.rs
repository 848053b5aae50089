//! Types for descriptor discovery.
//!
//! This module defines the traversal policy, the discovered candidates, and
//! the errors produced while searching a source tree for `CMakeLists.txt`.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// What to do when a directory inside the search root cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IoErrorPolicy {
  /// Log a warning and continue past the offending path.
  #[default]
  SkipAndWarn,
  /// Stop discovery and report the error.
  Abort,
}

/// Knobs for the directory walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraversalPolicy {
  pub on_error: IoErrorPolicy,

  /// Descend into symlinked directories. A link back to one of its own
  /// ancestors is not descended.
  pub follow_symlinks: bool,
}

/// Errors that can occur while locating the top-level descriptor.
#[derive(Debug, Error)]
pub enum LocateError {
  /// No descriptor exists anywhere under the search root.
  #[error("no CMakeLists.txt found under {}", root.display())]
  NotFound { root: PathBuf },

  /// The search root itself does not exist or is not a directory.
  #[error("search root is not a directory: {}", root.display())]
  RootMissing { root: PathBuf },

  /// A directory could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A discovered descriptor file and its nesting depth.
///
/// Depth counts path components relative to the search root, so a
/// descriptor directly inside the root has depth 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorCandidate {
  pub path: PathBuf,
  pub depth: usize,
}

impl DescriptorCandidate {
  pub fn new(root: &Path, path: PathBuf) -> Self {
    let depth = path
      .strip_prefix(root)
      .map(|rel| rel.components().count())
      .unwrap_or_else(|_| path.components().count());
    Self { path, depth }
  }
}

impl Ord for DescriptorCandidate {
  /// Shallowest first; equal depths fall back to path order so the
  /// selection never depends on directory listing order.
  fn cmp(&self, other: &Self) -> Ordering {
    self.depth.cmp(&other.depth).then_with(|| self.path.cmp(&other.path))
  }
}

impl PartialOrd for DescriptorCandidate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// The descriptor governing the whole project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLevelDescriptor {
  /// Path to the selected `CMakeLists.txt`.
  pub path: PathBuf,
  pub depth: usize,
  /// Deeper descriptors that were passed over, shallowest first.
  pub nested: Vec<PathBuf>,
}

impl TopLevelDescriptor {
  /// Directory containing the descriptor, used as the CMake source root.
  pub fn source_dir(&self) -> &Path {
    self.path.parent().unwrap_or_else(|| Path::new("."))
  }

  /// Total number of descriptors seen during the walk.
  pub fn candidate_count(&self) -> usize {
    self.nested.len() + 1
  }
}
