//! CLI integration tests for bazelify.
//!
//! `true` and `false` stand in for the dependency resolver and formatter,
//! so these only run on Unix.
#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the bazelify binary command, isolated from the user's global config.
fn bazelify(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bazelify").unwrap();
    cmd.env("HOME", home).arg("--color=never");
    cmd
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A workspace with the default Java layout.
fn java_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "core/src/main/java/com/example/Foo.java", "class Foo {}");
    write(
        tmp.path(),
        "core/src/main/java/com/example/util/Strings.java",
        "class Strings {}",
    );
    write(
        tmp.path(),
        "core/src/test/java/com/example/FooTest.java",
        "class FooTest {}",
    );
    tmp
}

// ============================================================================
// bazelify migrate
// ============================================================================

#[test]
fn test_migrate_writes_manifests() {
    let tmp = java_workspace();

    bazelify(tmp.path())
        .args(["migrate", "--resolver", "true"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Resolving"))
        .stderr(predicate::str::contains("-content_roots=core/src/main/java //core/src/main/java/com/example"))
        .stderr(predicate::str::contains(
            "-content_roots=core/src/main/java,core/src/test/java core/src/test/java/com/example/FooTest.java",
        ))
        .stderr(predicate::str::contains("Finished"));

    let lib = fs::read_to_string(tmp.path().join("core/src/main/java/com/example/BUILD")).unwrap();
    assert!(lib.contains("package(default_visibility = [\"//:__subpackages__\"])"));
    assert!(lib.contains("java_library(name = \"example\", srcs = glob([\"*.java\"]))"));

    let util =
        fs::read_to_string(tmp.path().join("core/src/main/java/com/example/util/BUILD")).unwrap();
    assert!(util.contains("name = \"util\""));

    let test = fs::read_to_string(tmp.path().join("core/src/test/java/com/example/BUILD")).unwrap();
    assert!(test.contains("java_test(name = \"example\", srcs = glob([\"*.java\"]))"));
}

#[test]
fn test_migrate_continues_when_resolver_fails() {
    let tmp = java_workspace();

    bazelify(tmp.path())
        .args(["migrate", "--resolver", "false"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("dependency resolver failed"));

    let test = fs::read_to_string(tmp.path().join("core/src/test/java/com/example/BUILD")).unwrap();
    assert!(test.contains("java_test"));
}

#[test]
fn test_migrate_missing_resolver_fails() {
    let tmp = java_workspace();

    bazelify(tmp.path())
        .args(["migrate", "--resolver", "./no-such-resolver"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to execute"));
}

#[test]
fn test_migrate_missing_root_fails() {
    let tmp = TempDir::new().unwrap();

    bazelify(tmp.path())
        .args(["migrate", "--resolver", "true"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));
}

#[test]
fn test_migrate_json_report() {
    let tmp = java_workspace();

    let output = bazelify(tmp.path())
        .args(["migrate", "--resolver", "true", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["library_dirs"].as_array().unwrap().len(), 2);
    assert_eq!(report["test_dirs"].as_array().unwrap().len(), 1);
    assert_eq!(report["library_pass"]["code"], 0);
    assert_eq!(
        report["test_request"]["targets"][0],
        "core/src/test/java/com/example/FooTest.java"
    );
}

#[test]
fn test_migrate_reads_project_config() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "lib/a/Foo.unit", "");
    write(tmp.path(), "test/a/FooTest.unit", "");
    write(
        tmp.path(),
        "bazelify.toml",
        r#"
[layout]
library-root = "lib"
test-root = "test"

[rules]
suffix = ".unit"

[resolver]
program = "true"
"#,
    );

    bazelify(tmp.path())
        .args(["migrate"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let lib = fs::read_to_string(tmp.path().join("lib/a/BUILD")).unwrap();
    assert!(lib.contains("java_library(name = \"a\", srcs = glob([\"*.unit\"]))"));
    let test = fs::read_to_string(tmp.path().join("test/a/BUILD")).unwrap();
    assert!(test.contains("java_test(name = \"a\""));
}

// ============================================================================
// bazelify scan / reclassify
// ============================================================================

#[test]
fn test_scan_lists_directories() {
    let tmp = java_workspace();

    bazelify(tmp.path())
        .args(["scan"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("com/example"))
        .stdout(predicate::str::contains("com/example/util"));
}

#[test]
fn test_reclassify_requires_manifests() {
    let tmp = java_workspace();

    bazelify(tmp.path())
        .args(["reclassify"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));
}

#[test]
fn test_reclassify_custom_root() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "it/a/SmokeTest.java", "");
    write(
        tmp.path(),
        "it/a/BUILD",
        "java_library(name = \"a\", srcs = glob([\"*.java\"]))\n",
    );

    bazelify(tmp.path())
        .args(["reclassify", "it"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let manifest = fs::read_to_string(tmp.path().join("it/a/BUILD")).unwrap();
    assert_eq!(manifest, "java_test(name = \"a\", srcs = glob([\"*.java\"]))\n");
}

// ============================================================================
// bazelify fmt
// ============================================================================

#[test]
fn test_fmt_reports_failures() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/Foo.java", "class Foo {}");
    write(
        tmp.path(),
        "bazelify.toml",
        "[formatter]\nprogram = \"false\"\n",
    );

    bazelify(tmp.path())
        .args(["fmt", "src"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("formatter failed on 1 file(s)"));
}

#[test]
fn test_fmt_missing_path() {
    let tmp = TempDir::new().unwrap();

    bazelify(tmp.path())
        .args(["fmt", "nowhere"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));
}
