//! Artifact version lookup against on-disk jars and exploded directories

mod helper;

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use helper::{ArtifactBuilder, class_with_constant};
use version_lookup::artifact::ArtifactError;
use version_lookup::config::LookupConfig;
use version_lookup::lookup::{VersionLookup, VersionSource, grammar};
use version_lookup::version::Version;

fn lookup() -> VersionLookup {
    VersionLookup::new(&LookupConfig::default())
}

#[test]
fn metadata_wins_over_conflicting_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .version_json(r#"{"id": "1.2.3", "name": "1.2.3"}"#)
        .manifest(&[("Implementation-Version", "1.2.0")])
        .write_jar(temp_dir.path(), "client.jar");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.normalized, "1.2.3");
    assert_eq!(result.source, Some(VersionSource::Metadata));
    assert_eq!(result.id.as_deref(), Some("1.2.3"));
    assert_eq!(result.name.as_deref(), Some("1.2.3"));
}

#[test]
fn manifest_used_when_metadata_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .version_json("{\"id\": ")
        .manifest(&[("Implementation-Version", "1.2.0")])
        .write_jar(temp_dir.path(), "client.jar");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.normalized, "1.2.0");
    assert_eq!(result.source, Some(VersionSource::Manifest));
}

#[test]
fn snapshot_label_normalizes_into_grammar() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .version_json(r#"{"id": "24w03a", "name": "24w03a", "world_version": 3691}"#)
        .write_jar(temp_dir.path(), "client.jar");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.raw, "24w03a");
    assert_eq!(result.normalized, "1.20.5-alpha.24.3.a");
    assert!(grammar::is_valid(&result.normalized));
}

#[test]
fn marker_class_used_without_textual_metadata() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .entry(
            "net/minecraft/client/Minecraft.class",
            &class_with_constant(50, "Minecraft Beta 1.7.3"),
        )
        .write_jar(temp_dir.path(), "client.jar");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.source, Some(VersionSource::Marker));
    assert_eq!(result.raw, "Beta 1.7.3");
    assert_eq!(result.normalized, "1.0.0-beta.7.3");
    assert_eq!(result.class_version, Some(50));
}

#[test]
fn file_name_used_as_last_source() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .entry("assets/readme.txt", b"hello")
        .write_jar(temp_dir.path(), "minecraft-1.16.5-client.jar");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.source, Some(VersionSource::FileName));
    assert_eq!(result.normalized, "1.16.5");
}

#[rstest]
#[case("minecraft-1.20.4", "1.20.4")]
#[case("client-b1.7.3", "1.0.0-beta.7.3")]
fn versioned_directory_name_is_not_truncated(#[case] dir_name: &str, #[case] expected: &str) {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .entry("assets/readme.txt", b"hello")
        .write_dir(temp_dir.path(), dir_name);

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.source, Some(VersionSource::FileName));
    assert_eq!(result.normalized, expected);
}

#[test]
fn legacy_label_in_jar_name_keeps_its_stage() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .entry("assets/readme.txt", b"hello")
        .write_jar(temp_dir.path(), "client-b1.7.3.jar");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.raw, "b1.7.3");
    assert_eq!(result.normalized, "1.0.0-beta.7.3");
}

#[test]
fn unrecognized_artifact_keeps_raw_guess() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .entry("assets/readme.txt", b"hello")
        .write_jar(temp_dir.path(), "custom-client.jar");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.raw, "custom-client");
    assert_eq!(result.normalized, result.raw);
    assert!(!result.is_conforming());
}

#[test]
fn exploded_directory_is_an_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let path = ArtifactBuilder::new()
        .version_json(r#"{"id": "1.14 Pre-Release 2", "name": "1.14 Pre-Release 2"}"#)
        .write_dir(temp_dir.path(), "exploded");

    let result = lookup().lookup_path(&path).unwrap();

    assert_eq!(result.normalized, "1.14-beta.2");
}

#[test]
fn unreadable_artifact_is_a_hard_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.jar");
    fs::write(&path, b"PK but not really").unwrap();

    let result = lookup().lookup_path(&path);

    assert!(matches!(result, Err(ArtifactError::Unreadable { .. })));
}

#[rstest]
#[case("24w03a", "24w03b")]
#[case("24w03b", "24w04a")]
#[case("23w51b", "24w03a")]
#[case("24w14a", "24w18a")]
#[case("1.20.4", "24w03a")]
fn normalized_snapshots_preserve_chronology(#[case] older: &str, #[case] newer: &str) {
    let temp_dir = TempDir::new().unwrap();
    let versions: Vec<Version> = [older, newer]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let json = format!(r#"{{"id": "{}"}}"#, id);
            let path = ArtifactBuilder::new()
                .version_json(&json)
                .write_jar(temp_dir.path(), &format!("{}.jar", i));
            lookup().lookup_path(&path).unwrap().version().unwrap()
        })
        .collect();

    assert!(versions[0] < versions[1], "{} < {}", versions[0], versions[1]);
}
