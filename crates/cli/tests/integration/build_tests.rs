use std::fs;

use predicates::prelude::*;

use crate::common::{TestEnv, display};

#[test]
fn builds_the_top_level_project() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");
  env.write_descriptor("vendor/lib/CMakeLists.txt");

  env
    .run("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("CMake build successful"))
    .stdout(predicate::str::contains("fake configure output"))
    .stdout(predicate::str::contains("fake build output"));

  let src = env.src_dir();
  let build = src.join("build");
  assert!(build.is_dir());
  assert!(!src.join("vendor/lib/build").exists());
  assert_eq!(
    env.invocations(),
    vec![
      format!("-B {} -S {}", display(&build), display(&src)),
      format!("--build {}", display(&build)),
    ]
  );
}

#[test]
fn rerun_reuses_build_directory() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  env.run("build").assert().success();
  env.run("build").assert().success();

  assert_eq!(env.invocations().len(), 4);
}

#[test]
fn missing_descriptor_is_a_soft_abort() {
  let env = TestEnv::new();
  env.mkdir("src/include");

  env
    .run("build")
    .assert()
    .success()
    .stderr(predicate::str::contains("No CMakeLists.txt found"))
    .stderr(predicate::str::contains("Aborting build process"));

  assert!(env.invocations().is_empty());
}

#[test]
fn missing_source_directory_fails() {
  let env = TestEnv::new();
  fs::create_dir_all(env.project_dir()).unwrap();
  assert!(!env.src_dir().exists());

  env
    .run("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("traversal"));
}

#[test]
fn configure_failure_stops_before_build() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  env
    .run("build")
    .env("CMBRIDGE_FAKE_CONFIGURE_EXIT", "3")
    .assert()
    .failure()
    .stderr(predicate::str::contains("configure: configure failed"))
    .stderr(predicate::str::contains("exited with code 3"))
    .stderr(predicate::str::contains("configure diagnostics"));

  let calls = env.invocations();
  assert_eq!(calls.len(), 1);
  assert!(calls[0].starts_with("-B "));
  // Kept for the next attempt.
  assert!(env.src_dir().join("build").is_dir());
}

#[test]
fn build_failure_is_reported() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  env
    .run("build")
    .env("CMBRIDGE_FAKE_BUILD_EXIT", "2")
    .assert()
    .failure()
    .stderr(predicate::str::contains("build-tool: build failed"))
    .stderr(predicate::str::contains("exited with code 2"));

  assert_eq!(env.invocations().len(), 2);
}

#[test]
fn slow_phase_times_out() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  env
    .run("build")
    .arg("--timeout")
    .arg("300ms")
    .env("CMBRIDGE_FAKE_CONFIGURE_SLEEP", "10")
    .assert()
    .failure()
    .stderr(predicate::str::contains("timed out"));

  assert_eq!(env.invocations().len(), 1);
}

#[test]
fn file_blocking_build_directory_fails() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");
  std::fs::write(env.src_dir().join("build"), "").unwrap();

  env
    .run("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("dir: failed to create build directory"));

  assert!(env.invocations().is_empty());
}

#[test]
fn missing_toolchain_fails_to_start() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  env
    .cmd()
    .arg("build")
    .arg(env.project_dir())
    .arg("--toolchain")
    .arg(env.temp.path().join("bin/no-such-cmake"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not be started"));
}

#[test]
fn host_environment_supplies_defaults() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  env
    .cmd()
    .arg("build")
    .env("PROJECT_DIR", env.project_dir())
    .env("CMBRIDGE_TOOLCHAIN", env.toolchain())
    .env("CFLAGS", "-O2 -g")
    .env("CXXFLAGS", "-std=c++17")
    .assert()
    .success();

  let calls = env.invocations();
  assert_eq!(calls.len(), 2);
  assert!(calls[0].contains("-DCMAKE_C_FLAGS=-O2 -g"));
  assert!(calls[0].contains("-DCMAKE_CXX_FLAGS=-std=c++17"));
}

#[test]
fn build_options_reach_the_toolchain() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  env
    .run("build")
    .args(["-G", "Ninja", "--build-type", "Debug", "-D", "BUILD_TESTING=OFF", "--jobs", "4"])
    .assert()
    .success();

  let calls = env.invocations();
  assert!(calls[0].ends_with("-G Ninja -DCMAKE_BUILD_TYPE=Debug -DBUILD_TESTING=OFF"));
  assert!(calls[1].ends_with("--parallel 4"));
}

#[test]
fn json_report_on_success() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  let output = env.run("build").arg("--format").arg("json").output().unwrap();

  assert!(output.status.success());
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["status"], "built");
  assert_eq!(report["report"]["build_dir"], display(&env.src_dir().join("build")));
  assert_eq!(report["report"]["configure"]["output"]["stdout"], "fake configure output\n");
}

#[test]
fn json_report_on_failure() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");

  let output = env
    .run("build")
    .arg("--format")
    .arg("json")
    .env("CMBRIDGE_FAKE_BUILD_EXIT", "5")
    .output()
    .unwrap();

  assert!(!output.status.success());
  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["status"], "failed");
  assert_eq!(report["kind"], "build-tool");
  assert_eq!(report["code"], 5);
  assert_eq!(report["stderr"], "build diagnostics\n");
}
