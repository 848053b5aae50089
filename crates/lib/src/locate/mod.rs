//! Top-level descriptor discovery.
//!
//! Walks a source tree with [`WalkDir`], collects every `CMakeLists.txt`,
//! and selects the shallowest one as the descriptor for the whole project.
//! Deeper descriptors are assumed to belong to vendored or nested
//! sub-projects.

mod types;

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::consts::DESCRIPTOR_FILE_NAME;

pub use types::{DescriptorCandidate, IoErrorPolicy, LocateError, TopLevelDescriptor, TraversalPolicy};

/// Finds the top-level descriptor under a search root.
#[derive(Debug, Clone, Default)]
pub struct Locator {
  policy: TraversalPolicy,
}

impl Locator {
  pub fn new(policy: TraversalPolicy) -> Self {
    Self { policy }
  }

  pub fn policy(&self) -> &TraversalPolicy {
    &self.policy
  }

  /// Locate the shallowest `CMakeLists.txt` under `root`.
  ///
  /// # Errors
  ///
  /// Returns [`LocateError::NotFound`] when the tree holds no descriptor,
  /// [`LocateError::RootMissing`] when `root` is not a directory, and
  /// [`LocateError::Io`] when the root is unreadable or when the policy is
  /// [`IoErrorPolicy::Abort`] and any path below it is.
  pub fn locate(&self, root: &Path) -> Result<TopLevelDescriptor, LocateError> {
    info!(root = %root.display(), "searching for {}", DESCRIPTOR_FILE_NAME);

    let candidates = self.collect(root)?;
    let top = select(root, candidates)?;

    info!(
      path = %top.path.display(),
      depth = top.depth,
      nested = top.nested.len(),
      "top-level descriptor found"
    );
    Ok(top)
  }

  /// Collect every descriptor under `root`, in discovery order.
  pub fn collect(&self, root: &Path) -> Result<Vec<DescriptorCandidate>, LocateError> {
    if !root.is_dir() {
      return Err(LocateError::RootMissing {
        root: root.to_path_buf(),
      });
    }

    let mut candidates = Vec::new();
    let walker = WalkDir::new(root)
      .follow_links(self.policy.follow_symlinks)
      .sort_by_file_name();

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          self.handle_walk_error(root, e)?;
          continue;
        }
      };

      if entry.file_name() != DESCRIPTOR_FILE_NAME {
        continue;
      }

      let file_type = entry.file_type();
      if file_type.is_symlink() {
        // Links are only reported as links when they are not being followed.
        match fs::metadata(entry.path()) {
          Ok(meta) if meta.is_file() => {}
          Ok(_) => continue,
          Err(e) => {
            self.handle_io(entry.path(), e)?;
            continue;
          }
        }
      } else if !file_type.is_file() {
        continue;
      }

      let candidate = DescriptorCandidate::new(root, entry.into_path());
      debug!(path = %candidate.path.display(), depth = candidate.depth, "found descriptor");
      candidates.push(candidate);
    }

    Ok(candidates)
  }

  fn handle_walk_error(&self, root: &Path, error: walkdir::Error) -> Result<(), LocateError> {
    if let Some(ancestor) = error.loop_ancestor() {
      debug!(
        path = ?error.path(),
        ancestor = %ancestor.display(),
        "symlink cycle, not descending"
      );
      return Ok(());
    }

    let path = error.path().unwrap_or(root).to_path_buf();
    let at_root = error.depth() == 0;
    let source = io::Error::from(error);

    if at_root {
      return Err(LocateError::Io { path, source });
    }

    // A broken link only matters if it claims to be a descriptor.
    let is_descriptor = path.file_name().is_some_and(|n| n == DESCRIPTOR_FILE_NAME);
    let is_link = fs::symlink_metadata(&path).is_ok_and(|m| m.file_type().is_symlink());
    if is_link && !is_descriptor && fs::metadata(&path).is_err() {
      debug!(path = %path.display(), "ignoring dangling symlink");
      return Ok(());
    }

    self.handle_io(&path, source)
  }

  fn handle_io(&self, path: &Path, error: io::Error) -> Result<(), LocateError> {
    match self.policy.on_error {
      IoErrorPolicy::SkipAndWarn => {
        warn!(path = %path.display(), error = %error, "skipping unreadable path");
        Ok(())
      }
      IoErrorPolicy::Abort => Err(LocateError::Io {
        path: path.to_path_buf(),
        source: error,
      }),
    }
  }
}

/// Convenience wrapper around [`Locator::locate`].
pub fn locate(root: &Path, policy: TraversalPolicy) -> Result<TopLevelDescriptor, LocateError> {
  Locator::new(policy).locate(root)
}

/// Pick the shallowest candidate, breaking ties by path.
pub fn select(root: &Path, mut candidates: Vec<DescriptorCandidate>) -> Result<TopLevelDescriptor, LocateError> {
  candidates.sort();
  let mut ranked = candidates.into_iter();
  let Some(first) = ranked.next() else {
    return Err(LocateError::NotFound {
      root: root.to_path_buf(),
    });
  };

  Ok(TopLevelDescriptor {
    path: first.path,
    depth: first.depth,
    nested: ranked.map(|c| c.path).collect(),
  })
}
