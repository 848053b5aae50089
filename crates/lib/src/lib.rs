//! cmbridge-lib: drive a CMake project from a host build step.
//!
//! The crate has two core pieces:
//! - `locate`: find the top-level `CMakeLists.txt` in a source tree
//! - `orchestrate`: create the build directory, then run the toolchain's
//!   configure and build phases, failing fast on the first error
//!
//! `pipeline` composes them; `config` carries the host settings;
//! `toolchain` is the process interface the orchestrator runs through.

pub mod config;
pub mod consts;
pub mod error;
pub mod locate;
pub mod orchestrate;
pub mod pipeline;
pub mod toolchain;
pub mod util;

pub use config::BridgeConfig;
pub use error::{BridgeError, ErrorKind};
pub use pipeline::{RunOutcome, run};
