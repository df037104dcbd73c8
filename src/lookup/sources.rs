//! Version sources inside an artifact
//!
//! Each probe reads one kind of evidence and fails with
//! [`SourceUnavailable`] when its source is absent or unusable.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use regex::bytes::Regex as BytesRegex;
use serde::Deserialize;
use tracing::debug;

use crate::artifact::Artifact;
use crate::lookup::{Evidence, SourceUnavailable, VersionProbe, VersionSource};

/// Class file magic number
const CLASS_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

/// Version strings embedded in class constant pools. Constants are delimited
/// by non-printable bytes, so a capture stops at the end of its constant.
static MARKER_PATTERNS: LazyLock<Vec<BytesRegex>> = LazyLock::new(|| {
    [
        r"(?-u)Minecraft Minecraft ([\x21-\x7e][\x20-\x7e]*)",
        r"(?-u)Minecraft ((?:Alpha |Beta |Infdev |Indev )?v?[0-9][\x20-\x7e]*)",
        r"(?-u)\b([0-9]{2}w[0-9]{2}[a-z])\b",
    ]
    .into_iter()
    .map(|pattern| BytesRegex::new(pattern).expect("static regex"))
    .collect()
});

/// Legacy prefixed labels come first so `b1.7.3` is not read as `1.7.3`
static FILE_NAME_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:^|[^0-9A-Za-z])(",
        r"[ab]1\.[0-9]+(?:\.[0-9]+)?(?:_[0-9]+)?[a-z]?",
        r"|inf-[0-9]{8}",
        r"|[0-9]{2}w[0-9]{2}[a-z]",
        r"|[0-9]+\.[0-9]+(?:\.[0-9]+)?(?:-(?:pre|rc)[0-9]+)?",
        r")(?:$|[^0-9A-Za-z.])",
    ))
    .expect("static regex")
});

fn read_required(artifact: &dyn Artifact, entry: &str) -> Result<Vec<u8>, SourceUnavailable> {
    artifact
        .read_entry(entry)?
        .ok_or_else(|| SourceUnavailable::Missing(entry.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Layout of the embedded `version.json` record
#[derive(Debug, Deserialize)]
struct VersionMetadata {
    id: Option<String>,
    name: Option<String>,
    release_target: Option<String>,
}

/// Structured metadata record: declared id, name and release target
pub struct MetadataProbe {
    entry: String,
}

impl MetadataProbe {
    pub fn new(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
        }
    }
}

impl VersionProbe for MetadataProbe {
    fn source(&self) -> VersionSource {
        VersionSource::Metadata
    }

    fn probe(&self, artifact: &dyn Artifact) -> Result<Evidence, SourceUnavailable> {
        let body = read_required(artifact, &self.entry)?;
        let metadata: VersionMetadata = serde_json::from_slice(&body)?;

        let id = non_empty(metadata.id);
        let name = non_empty(metadata.name);
        let raw = id
            .clone()
            .or_else(|| name.clone())
            .ok_or_else(|| SourceUnavailable::Malformed {
                entry: self.entry.clone(),
                reason: "neither id nor name is declared".to_string(),
            })?;

        Ok(Evidence {
            raw,
            id,
            name,
            release_target: non_empty(metadata.release_target),
        })
    }
}

/// Archive manifest attribute such as `Implementation-Version`
pub struct ManifestProbe {
    entry: String,
    keys: Vec<String>,
}

impl ManifestProbe {
    pub fn new(entry: &str, keys: &[String]) -> Self {
        Self {
            entry: entry.to_string(),
            keys: keys.to_vec(),
        }
    }
}

impl VersionProbe for ManifestProbe {
    fn source(&self) -> VersionSource {
        VersionSource::Manifest
    }

    fn probe(&self, artifact: &dyn Artifact) -> Result<Evidence, SourceUnavailable> {
        let body = read_required(artifact, &self.entry)?;
        let text = String::from_utf8(body).map_err(|e| SourceUnavailable::Malformed {
            entry: self.entry.clone(),
            reason: e.to_string(),
        })?;
        let attributes = parse_manifest(&text);

        self.keys
            .iter()
            .find_map(|key| attributes.get(key.as_str()))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(Evidence::new)
            .ok_or(SourceUnavailable::NoMatch)
    }
}

/// Parse the main section of a jar manifest.
///
/// Lines starting with a single space continue the previous value.
pub fn parse_manifest(text: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(continuation);
            }
            continue;
        }
        if let Some((key, value)) = current.take() {
            attributes.insert(key, value);
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.strip_prefix(' ').unwrap_or(value);
            current = Some((key.trim().to_string(), value.to_string()));
        }
    }
    if let Some((key, value)) = current {
        attributes.insert(key, value);
    }

    attributes
}

/// Version strings embedded in known class entries
pub struct MarkerProbe {
    entries: Vec<String>,
}

impl MarkerProbe {
    pub fn new(entries: &[String]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
    }
}

impl VersionProbe for MarkerProbe {
    fn source(&self) -> VersionSource {
        VersionSource::Marker
    }

    fn probe(&self, artifact: &dyn Artifact) -> Result<Evidence, SourceUnavailable> {
        for entry in &self.entries {
            let body = match artifact.read_entry(entry) {
                Ok(Some(body)) => body,
                Ok(None) => continue,
                Err(e) => {
                    debug!("Skipping marker entry {} in {}: {}", entry, artifact.name(), e);
                    continue;
                }
            };
            if let Some(found) = scan_markers(&body) {
                return Ok(Evidence::new(&found));
            }
        }
        Err(SourceUnavailable::NoMatch)
    }
}

/// First embedded version string in `bytes`, trying each marker pattern in order
pub fn scan_markers(bytes: &[u8]) -> Option<String> {
    MARKER_PATTERNS.iter().find_map(|pattern| {
        let found = pattern.captures(bytes)?.get(1)?;
        let text = String::from_utf8_lossy(found.as_bytes()).trim().to_string();
        (!text.is_empty()).then_some(text)
    })
}

/// Version-looking token in the artifact file name
pub struct FileNameProbe {
    extensions: Vec<String>,
}

impl FileNameProbe {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.to_vec(),
        }
    }
}

impl VersionProbe for FileNameProbe {
    fn source(&self) -> VersionSource {
        VersionSource::FileName
    }

    fn probe(&self, artifact: &dyn Artifact) -> Result<Evidence, SourceUnavailable> {
        FILE_NAME_VERSION
            .captures(file_stem(artifact.name(), &self.extensions))
            .and_then(|captures| captures.get(1))
            .map(|found| Evidence::new(found.as_str()))
            .ok_or(SourceUnavailable::NoMatch)
    }
}

/// Artifact name without its extension.
///
/// Only a configured artifact extension is stripped, so a directory such as
/// `minecraft-1.20.4` keeps its last dotted segment.
pub fn file_stem<'a>(name: &'a str, extensions: &[String]) -> &'a str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Class-file major version of the first readable class among `entries`
pub fn class_version(artifact: &dyn Artifact, entries: &[String]) -> Option<u16> {
    entries.iter().find_map(|entry| {
        let body = artifact.read_entry(entry).ok()??;
        if body.len() < 8 || body[..4] != CLASS_MAGIC {
            return None;
        }
        Some(u16::from_be_bytes([body[6], body[7]]))
    })
}
