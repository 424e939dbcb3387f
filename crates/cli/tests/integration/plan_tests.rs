//! Plan and clean command integration tests.

use std::fs;

use predicates::prelude::*;
use serial_test::serial;

use super::common::TestEnv;

#[test]
#[serial]
fn plan_lists_resources_without_side_effects() {
  let env = TestEnv::new();
  env.write_file("libs/a.dll", "a");
  env.write_file("libs/.aarch64/a.dll", "arm a");
  env.write_file("resources/icon.png", "icon");
  env.write_config(&["libs/*", "resources/icon.png"]);

  env
    .apebuild()
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("libs/*"))
    .stdout(predicate::str::contains("libs/a.dll"))
    .stdout(predicate::str::contains("libs/.aarch64/a.dll"))
    .stdout(predicate::str::contains("Resources: 2"))
    .stdout(predicate::str::contains("-s build_dir/######a.dll.zip.o"));

  assert!(!env.staging().exists());
  assert!(!env.path("packager.log").exists());
  assert!(!env.path("compiler-args.txt").exists());
}

#[test]
#[serial]
fn plan_json_is_machine_readable() {
  let env = TestEnv::new();
  env.write_file("libs/a.dll", "a");
  env.write_file("libs/b.dll", "b");
  env.write_config(&["libs/*"]);

  let output = env.apebuild().args(["plan", "--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(plan["secondary_arch"], "aarch64");
  assert_eq!(plan["specs"][0]["resources"].as_array().unwrap().len(), 2);
  assert!(plan["compiler"]["path"].is_string());
}

#[test]
#[serial]
fn plan_fails_on_missing_wildcard_dir() {
  let env = TestEnv::new();
  env.write_config(&["missing/*"]);

  env
    .apebuild()
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("wildcard directory does not exist"));
}

#[test]
#[serial]
fn clean_removes_staging_dir() {
  let env = TestEnv::new();
  env.write_config(&[]);
  fs::create_dir_all(env.staging().join(".aarch64")).unwrap();

  env
    .apebuild()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed build_dir"));
  assert!(!env.staging().exists());

  env
    .apebuild()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to clean"));
}

#[test]
#[serial]
fn alternate_config_path() {
  let env = TestEnv::new();
  env.write_config(&[]);
  fs::rename(env.path("apebuild.toml"), env.path("release.toml")).unwrap();

  env.apebuild().args(["--config", "release.toml", "plan"]).assert().success();
  env.apebuild().arg("plan").assert().failure();
}
