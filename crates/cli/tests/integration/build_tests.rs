//! Build command integration tests.

use std::collections::HashSet;
use std::fs;

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, link_flags, objects_in};

#[test]
#[serial]
fn build_packages_file_and_wildcard_resources() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "icon");
  env.write_file("libs/libgme.dll", "gme");
  env.write_file("libs/libogg-0.dll", "ogg");
  env.write_config(&["resources/icon.png", "libs/*"]);

  env
    .apebuild()
    .assert()
    .success()
    .stdout(predicate::str::contains("Built build_dir/app.com"))
    .stdout(predicate::str::contains("compiled ok"));

  let staging = env.staging();
  let objects = objects_in(&staging);
  assert_eq!(objects.len(), 3);
  assert_eq!(objects_in(&staging.join(".aarch64")), objects);
  assert!(staging.join("app.com").exists());

  let links = link_flags(&env.compiler_args());
  assert_eq!(links.len(), 3);
  assert_eq!(links.iter().collect::<HashSet<_>>().len(), 3);
  for link in &links {
    assert!(link.starts_with("build_dir/"), "unexpected link path {link}");
  }
}

#[test]
#[serial]
fn build_subcommand_matches_default() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "icon");
  env.write_config(&["resources/icon.png"]);

  env.apebuild().arg("build").assert().success();

  assert_eq!(objects_in(&env.staging()).len(), 1);
}

#[test]
#[serial]
fn build_logs_each_tool_invocation() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "icon");
  env.write_config(&["resources/icon.png"]);

  env
    .apebuild()
    .assert()
    .success()
    .stderr(predicate::str::contains("executing command").count(3));
}

#[test]
#[serial]
fn override_directory_supplies_secondary_file() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "x86 icon");
  env.write_file("resources/.aarch64/icon.png", "arm icon");
  env.write_config(&["resources/*"]);

  env.apebuild().assert().success();

  let staging = env.staging();
  let objects = objects_in(&staging);
  assert_eq!(objects.len(), 1);
  assert_eq!(fs::read_to_string(staging.join(&objects[0])).unwrap(), "x86 icon");
  assert_eq!(
    fs::read_to_string(staging.join(".aarch64").join(&objects[0])).unwrap(),
    "arm icon"
  );
}

#[test]
#[serial]
fn empty_wildcard_builds_without_resources() {
  let env = TestEnv::new();
  fs::create_dir_all(env.path("resources")).unwrap();
  env.write_config(&["resources/*"]);

  env
    .apebuild()
    .assert()
    .success()
    .stdout(predicate::str::contains("No resources were embedded"));

  assert!(link_flags(&env.compiler_args()).is_empty());
}

#[test]
#[serial]
fn rebuild_discards_previous_artifacts() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "icon");
  env.write_config(&["resources/icon.png"]);

  env.apebuild().assert().success();
  fs::write(env.staging().join("123456stale.zip.o"), "stale").unwrap();
  env.apebuild().assert().success();

  let objects = objects_in(&env.staging());
  assert_eq!(objects.len(), 1);
  assert!(objects[0].ends_with("icon.png.zip.o"));
}

#[test]
#[serial]
fn missing_wildcard_dir_fails() {
  let env = TestEnv::new();
  env.write_config(&["nope/*"]);

  env
    .apebuild()
    .assert()
    .failure()
    .stderr(predicate::str::contains("wildcard directory does not exist"));

  assert!(!env.path("packager.log").exists());
}

#[test]
#[serial]
fn override_path_conflict_fails() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "icon");
  env.write_file("resources/second.png", "second");
  env.write_config(&["resources/icon.png", "resources/second.png"]);
  // Packager that replaces the override subtree with a plain file.
  env.write_script(
    "tools/zipobj",
    "rm -rf build_dir/.aarch64\necho oops > build_dir/.aarch64",
  );

  env
    .apebuild()
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not a folder"));
}

#[test]
#[serial]
fn compiler_failure_fails_the_build() {
  let env = TestEnv::new();
  env.write_config(&[]);

  env
    .apebuild()
    .env("APEBUILD_COMPILER", env.path("tools/broken-cc"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("undefined reference to main"))
    .stderr(predicate::str::contains("Build failed"));
}

#[test]
#[serial]
fn packager_failure_can_be_skipped() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "icon");
  env.write_script("tools/zipobj", "exit 9");
  env.write_config_with(&["resources/icon.png"], "\n[packaging]\non_failure = \"skip\"\n");

  env
    .apebuild()
    .assert()
    .success()
    .stderr(predicate::str::contains("Skipped resources/icon.png"));

  assert!(link_flags(&env.compiler_args()).is_empty());
}

#[test]
#[serial]
fn packager_failure_aborts_by_default() {
  let env = TestEnv::new();
  env.write_file("resources/icon.png", "icon");
  env.write_script("tools/zipobj", "exit 9");
  env.write_config(&["resources/icon.png"]);

  env
    .apebuild()
    .assert()
    .failure()
    .stderr(predicate::str::contains("exit code Some(9)"));

  assert!(!env.path("compiler-args.txt").exists());
}

#[test]
#[serial]
fn json_report_lists_artifacts() {
  let env = TestEnv::new();
  env.write_file("libs/a.dll", "a");
  env.write_file("libs/b.dll", "b");
  env.write_config(&["libs/*"]);

  let output = env.apebuild().args(["--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let outcomes = report["specs"][0]["outcomes"].as_array().unwrap();
  assert_eq!(outcomes.len(), 2);
  assert!(outcomes.iter().all(|o| o["status"] == "packaged"));
  assert_eq!(report["compiler"]["code"], 0);
  assert_eq!(report["compiler"]["stdout"], "compiled ok\n");
}

#[test]
#[serial]
fn compiler_output_streams_before_summary() {
  let env = TestEnv::new();
  env.write_script("tools/cosmoc++", "echo 'linking app.com'\necho 'warning: unused variable' >&2");
  env.write_config(&[]);

  let output = env.apebuild().output().unwrap();
  assert!(output.status.success());

  let stdout = String::from_utf8(output.stdout).unwrap();
  let stderr = String::from_utf8(output.stderr).unwrap();
  let linking = stdout.find("linking app.com").unwrap();
  let built = stdout.find("Built build_dir/app.com").unwrap();
  assert!(linking < built);
  assert_eq!(stderr.matches("warning: unused variable").count(), 1);
}
