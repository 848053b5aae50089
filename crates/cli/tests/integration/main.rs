//! End-to-end tests driving the `cmbridge` binary against a fake toolchain.

#![cfg(unix)]

mod build_tests;
mod common;
mod plan_tests;
