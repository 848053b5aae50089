use predicates::prelude::*;

use crate::common::{TestEnv, display};

#[test]
fn plan_shows_commands_without_running_them() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");
  let build = env.src_dir().join("build");

  env
    .run("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("will be created"))
    .stdout(predicate::str::contains(format!("-B {}", display(&build))))
    .stdout(predicate::str::contains(format!("--build {}", display(&build))));

  assert!(!build.exists());
  assert!(env.invocations().is_empty());
}

#[test]
fn plan_notes_existing_build_directory() {
  let env = TestEnv::new();
  env.write_descriptor("CMakeLists.txt");
  env.mkdir("src/build");

  env
    .run("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("(exists)"));
}

#[test]
fn plan_without_descriptor_warns() {
  let env = TestEnv::new();
  env.mkdir("src");

  env
    .run("plan")
    .assert()
    .success()
    .stderr(predicate::str::contains("No CMakeLists.txt found"));
}

#[test]
fn locate_prints_top_level_path() {
  let env = TestEnv::new();
  let top = env.write_descriptor("CMakeLists.txt");
  let nested = env.write_descriptor("third_party/zlib/CMakeLists.txt");

  env
    .cmd()
    .arg("locate")
    .arg(env.project_dir())
    .arg("--verbose")
    .assert()
    .success()
    .stdout(predicate::str::starts_with(display(&top)))
    .stdout(predicate::str::contains(display(&nested)));
}

#[test]
fn locate_without_descriptor_fails() {
  let env = TestEnv::new();
  env.mkdir("src");

  env
    .cmd()
    .arg("locate")
    .arg(env.project_dir())
    .assert()
    .failure()
    .stderr(predicate::str::contains("No CMakeLists.txt found"));
}

#[test]
fn locate_honours_source_subdir() {
  let env = TestEnv::new();
  env.mkdir("src");
  let path = env.project_dir().join("native/CMakeLists.txt");
  std::fs::create_dir_all(path.parent().unwrap()).unwrap();
  std::fs::write(&path, "project(native)\n").unwrap();

  env
    .cmd()
    .arg("locate")
    .arg(env.project_dir())
    .arg("--source-subdir")
    .arg("native")
    .assert()
    .success()
    .stdout(predicate::str::contains(display(&path)));
}
