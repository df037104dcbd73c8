//! Diagnostic check over a directory of artifacts

mod helper;

use std::fs;

use tempfile::TempDir;

use helper::ArtifactBuilder;
use version_lookup::check::{CheckFailure, run_check};
use version_lookup::config::LookupConfig;

fn run(path: &std::path::Path) -> (version_lookup::check::CheckSummary, String) {
    let mut out = Vec::new();
    let summary = run_check(path, &LookupConfig::default(), &mut out).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

#[test]
fn check_reports_each_artifact_and_summary() {
    let temp_dir = TempDir::new().unwrap();
    ArtifactBuilder::new()
        .version_json(r#"{"id": "1.20.4", "name": "1.20.4"}"#)
        .write_jar(temp_dir.path(), "a-release.jar");
    ArtifactBuilder::new()
        .version_json(r#"{"id": "24w03a", "name": "24w03a"}"#)
        .write_jar(temp_dir.path(), "b-snapshot.jar");
    ArtifactBuilder::new()
        .version_json(r#"{"id": "1.RV-Pre1", "name": "1.RV-Pre1"}"#)
        .write_jar(temp_dir.path(), "c-joke.jar");
    fs::write(temp_dir.path().join("notes.txt"), b"ignored").unwrap();

    let (summary, output) = run(temp_dir.path());

    assert_eq!(summary.passed, 2);
    assert_eq!(
        summary.failures,
        vec![CheckFailure::Nonconforming {
            name: "c-joke.jar".to_string(),
            normalized: "1.RV-Pre1".to_string(),
        }]
    );
    assert!(output.contains("a-release.jar: 1.20.4 (raw=1.20.4 id=1.20.4 name=1.20.4)"));
    assert!(output.contains("b-snapshot.jar: 1.20.5-alpha.24.3.a (raw=24w03a id=24w03a name=24w03a)"));
    assert!(output.contains("c-joke.jar: unrecognized version '1.RV-Pre1'"));
    assert!(output.contains("Newest: 1.20.5-alpha.24.3.a"));
    assert!(output.ends_with("2 passed, 1 failed\n"));
}

#[test]
fn check_continues_after_unreadable_artifact() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a-broken.jar"), b"not a zip").unwrap();
    ArtifactBuilder::new()
        .manifest(&[("Implementation-Version", "1.19.4")])
        .write_jar(temp_dir.path(), "b-good.jar");

    let (summary, output) = run(temp_dir.path());

    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed(), 1);
    assert!(matches!(
        &summary.failures[0],
        CheckFailure::Unreadable { name, .. } if name == "a-broken.jar"
    ));
    assert!(output.contains("b-good.jar: 1.19.4 (raw=1.19.4 id=- name=-)"));
    assert!(output.ends_with("1 passed, 1 failed\n"));
}

#[test]
fn check_single_exploded_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .version_json(r#"{"id": "b1.7.3"}"#)
        .write_dir(temp_dir.path(), "beta");

    let (summary, output) = run(&path);

    assert_eq!(summary.passed, 1);
    assert!(output.contains("beta: 1.0.0-beta.7.3 (raw=b1.7.3 id=b1.7.3 name=-)"));
}

#[test]
fn check_empty_directory_passes_nothing() {
    let temp_dir = TempDir::new().unwrap();

    let (summary, output) = run(temp_dir.path());

    assert_eq!(summary.passed, 0);
    assert!(summary.failures.is_empty());
    assert_eq!(output, "0 passed, 0 failed\n");
}

#[test]
fn check_missing_path_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut out = Vec::new();

    let result = run_check(
        &temp_dir.path().join("missing"),
        &LookupConfig::default(),
        &mut out,
    );

    assert!(result.is_err());
    assert!(out.is_empty());
}
