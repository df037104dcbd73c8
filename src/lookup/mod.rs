//! Artifact version lookup
//!
//! Derives one normalized version for an artifact from several sources,
//! highest priority first:
//!
//! 1. the structured metadata record (`version.json`)
//! 2. the archive manifest
//! 3. version strings embedded in known class files
//! 4. the artifact file name
//!
//! A source that is missing or unreadable is skipped. The first source that
//! yields a value wins and its value goes through [`normalize`].
//!
//! # Modules
//!
//! - [`grammar`]: public grammar of normalized versions
//! - [`normalize`]: rewrite table for legacy labels
//! - [`sources`]: probe implementations

pub mod grammar;
pub mod normalize;
pub mod sources;

use std::fmt;
use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::artifact::{Artifact, ArtifactError, open_artifact};
use crate::config::{LookupConfig, UNKNOWN_VERSION};
use crate::lookup::normalize::normalize_version;
use crate::lookup::sources::{
    FileNameProbe, ManifestProbe, MarkerProbe, MetadataProbe, class_version, file_stem,
};
use crate::version::{Version, VersionError};

/// Where the winning evidence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSource {
    Metadata,
    Manifest,
    Marker,
    FileName,
}

impl VersionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionSource::Metadata => "metadata",
            VersionSource::Manifest => "manifest",
            VersionSource::Marker => "marker",
            VersionSource::FileName => "file name",
        }
    }
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw version found by a probe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    pub raw: String,
    /// Declared identifier, metadata only
    pub id: Option<String>,
    /// Declared human-readable name, metadata only
    pub name: Option<String>,
    /// Declared release a snapshot leads up to, metadata only
    pub release_target: Option<String>,
}

impl Evidence {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            ..Self::default()
        }
    }
}

/// Why a source yielded nothing. Never escapes [`VersionLookup::lookup`].
#[derive(Debug, Error)]
pub enum SourceUnavailable {
    #[error("entry {0} not present")]
    Missing(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed {entry}: {reason}")]
    Malformed { entry: String, reason: String },

    #[error("no version found")]
    NoMatch,
}

/// One source of version evidence
#[cfg_attr(test, automock)]
pub trait VersionProbe: Send + Sync {
    fn source(&self) -> VersionSource;

    fn probe(&self, artifact: &dyn Artifact) -> Result<Evidence, SourceUnavailable>;
}

/// Version derived for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArtifactVersion {
    /// Winning evidence, verbatim
    pub raw: String,
    /// Rewritten value; equals `raw` when nothing conforms
    pub normalized: String,
    /// Winning source, `None` when no source yielded anything
    pub source: Option<VersionSource>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub release_target: Option<String>,
    /// Class-file major version of the first readable marker class
    pub class_version: Option<u16>,
}

impl NormalizedArtifactVersion {
    /// Whether `normalized` matches the public grammar
    pub fn is_conforming(&self) -> bool {
        grammar::is_valid(&self.normalized)
    }

    /// Parse the normalized value with the general parser.
    pub fn version(&self) -> Result<Version, VersionError> {
        Version::parse(&self.normalized)
    }
}

pub struct VersionLookup {
    probes: Vec<Box<dyn VersionProbe>>,
    class_entries: Vec<String>,
    artifact_extensions: Vec<String>,
}

impl VersionLookup {
    /// Build the default probes in priority order
    pub fn new(config: &LookupConfig) -> Self {
        let probes: Vec<Box<dyn VersionProbe>> = vec![
            Box::new(MetadataProbe::new(&config.metadata_entry)),
            Box::new(ManifestProbe::new(
                &config.manifest_entry,
                &config.manifest_keys,
            )),
            Box::new(MarkerProbe::new(&config.marker_entries)),
            Box::new(FileNameProbe::new(&config.artifact_extensions)),
        ];
        Self::with_probes(probes, config)
    }

    /// Use custom probes, tried in the given order
    pub fn with_probes(probes: Vec<Box<dyn VersionProbe>>, config: &LookupConfig) -> Self {
        Self {
            probes,
            class_entries: config.marker_entries.clone(),
            artifact_extensions: config.artifact_extensions.clone(),
        }
    }

    /// Open the artifact at `path` and look up its version.
    ///
    /// Fails only when the artifact itself cannot be opened.
    pub fn lookup_path(&self, path: &Path) -> Result<NormalizedArtifactVersion, ArtifactError> {
        let artifact = open_artifact(path)?;
        Ok(self.lookup(artifact.as_ref()))
    }

    pub fn lookup(&self, artifact: &dyn Artifact) -> NormalizedArtifactVersion {
        let class_version = class_version(artifact, &self.class_entries);

        let Some((source, evidence)) = self.first_evidence(artifact) else {
            let stem = file_stem(artifact.name(), &self.artifact_extensions);
            let raw = if stem.is_empty() { UNKNOWN_VERSION } else { stem };
            warn!("No version source available for {}", artifact.name());
            return NormalizedArtifactVersion {
                raw: raw.to_string(),
                normalized: raw.to_string(),
                source: None,
                id: None,
                name: None,
                release_target: None,
                class_version,
            };
        };

        let normalized = normalize_evidence(&evidence);
        info!(
            "{}: {} -> {} (from {})",
            artifact.name(),
            evidence.raw,
            normalized,
            source
        );

        NormalizedArtifactVersion {
            raw: evidence.raw,
            normalized,
            source: Some(source),
            id: evidence.id,
            name: evidence.name,
            release_target: evidence.release_target,
            class_version,
        }
    }

    fn first_evidence(&self, artifact: &dyn Artifact) -> Option<(VersionSource, Evidence)> {
        self.probes
            .iter()
            .find_map(|probe| match probe.probe(artifact) {
                Ok(evidence) => Some((probe.source(), evidence)),
                Err(e) => {
                    debug!(
                        "{} source unavailable for {}: {}",
                        probe.source(),
                        artifact.name(),
                        e
                    );
                    None
                }
            })
    }
}

/// Normalize the raw value, letting a declared name stand in when the raw
/// value does not normalize but the name does.
fn normalize_evidence(evidence: &Evidence) -> String {
    let release_target = evidence.release_target.as_deref();
    let primary = normalize_version(&evidence.raw, release_target);
    if grammar::is_valid(&primary) {
        return primary;
    }

    evidence
        .name
        .as_deref()
        .filter(|name| *name != evidence.raw)
        .map(|name| normalize_version(name, release_target))
        .filter(|alternative| grammar::is_valid(alternative))
        .unwrap_or(primary)
}
