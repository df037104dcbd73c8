//! Artifact version check
//!
//! Looks up the version of every artifact under a path, prints one line per
//! artifact and collects the ones whose normalized version does not match the
//! public grammar or that could not be opened.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::warn;

use crate::config::LookupConfig;
use crate::lookup::{NormalizedArtifactVersion, VersionLookup};
use crate::version::{Version, latest_version};

/// Artifact that did not pass the check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// Normalized version does not match the public grammar
    Nonconforming { name: String, normalized: String },
    /// Artifact could not be opened
    Unreadable { name: String, error: String },
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckFailure::Nonconforming { name, normalized } => {
                write!(f, "{}: unrecognized version '{}'", name, normalized)
            }
            CheckFailure::Unreadable { name, error } => write!(f, "{}: {}", name, error),
        }
    }
}

#[derive(Debug, Default)]
pub struct CheckSummary {
    pub passed: usize,
    pub failures: Vec<CheckFailure>,
    /// Greatest normalized version among the artifacts that passed
    pub newest: Option<Version>,
}

impl CheckSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Artifacts to check under `path`.
///
/// A file is one artifact. A directory holding the metadata or manifest
/// entry is one exploded artifact. Any other directory contributes its
/// files with an artifact extension, sorted by name. Fails when `path`
/// itself cannot be read.
pub fn collect_artifacts(path: &Path, config: &LookupConfig) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path).with_context(|| format!("Failed to read {:?}", path))?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.join(&config.metadata_entry).is_file() || path.join(&config.manifest_entry).is_file()
    {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut artifacts = Vec::new();
    for entry in std::fs::read_dir(path).with_context(|| format!("Failed to read {:?}", path))? {
        let entry_path = entry?.path();
        if entry_path.is_file() && config.is_artifact_file(&entry_path) {
            artifacts.push(entry_path);
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

/// Check every artifact under `path`, writing the report to `out`.
pub fn run_check<W: Write>(
    path: &Path,
    config: &LookupConfig,
    out: &mut W,
) -> anyhow::Result<CheckSummary> {
    let lookup = VersionLookup::new(config);
    let mut summary = CheckSummary::default();
    let mut conforming = Vec::new();

    for artifact_path in collect_artifacts(path, config)? {
        let name = artifact_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| artifact_path.display().to_string());

        match lookup.lookup_path(&artifact_path) {
            Ok(version) => {
                writeln!(out, "{}", report_line(&name, &version))?;
                if version.is_conforming() {
                    summary.passed += 1;
                    conforming.push(version.normalized);
                } else {
                    warn!("{} has an unrecognized version '{}'", name, version.normalized);
                    summary.failures.push(CheckFailure::Nonconforming {
                        name,
                        normalized: version.normalized,
                    });
                }
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                writeln!(out, "{}: unreadable ({})", name, e)?;
                summary.failures.push(CheckFailure::Unreadable {
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    summary.newest = latest_version(&conforming);

    if !summary.failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "Failures:")?;
        for failure in &summary.failures {
            writeln!(out, "  {}", failure)?;
        }
    }
    if let Some(newest) = &summary.newest {
        writeln!(out, "Newest: {}", newest)?;
    }
    writeln!(out, "{} passed, {} failed", summary.passed, summary.failed())?;

    Ok(summary)
}

/// `<name>: <normalized> (raw=<raw> id=<id> name=<name>)`
pub fn report_line(name: &str, version: &NormalizedArtifactVersion) -> String {
    format!(
        "{}: {} (raw={} id={} name={})",
        name,
        version.normalized,
        version.raw,
        version.id.as_deref().unwrap_or("-"),
        version.name.as_deref().unwrap_or("-"),
    )
}
