//! Version string parsing
//!
//! Structured grammar:
//!
//! ```text
//! version    := release ("-" prerelease)? ("+" build)?
//! release    := number ("." number)*
//! prerelease := ("alpha" | "beta" | "rc") ("." (number | [a-z]+))*
//! number     := "0" | [1-9][0-9]*
//! build      := [0-9A-Za-z.-]+
//! ```
//!
//! [`Version::parse`] falls back to an opaque value when the grammar does not
//! match. [`SemanticVersion::parse`] and [`SemanticVersion::parse_range`]
//! report the violation instead.

use std::str::FromStr;

use tracing::trace;

use crate::version::error::VersionError;
use crate::version::model::{
    Prerelease, PrereleaseComponent, PrereleaseKey, SemanticVersion, Version,
};

/// Markers accepted as the last release component of a range version
const WILDCARDS: [&str; 3] = ["x", "X", "*"];

impl Version {
    /// Parse any non-empty string.
    ///
    /// Input that does not match the structured grammar becomes
    /// [`Version::Opaque`]. Only empty or whitespace-only input fails.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        if input.trim().is_empty() {
            return Err(VersionError::invalid(input, "version must not be empty"));
        }

        match parse_semantic(input, false) {
            Ok(version) => Ok(Version::Semantic(version)),
            Err(e) => {
                trace!("Treating '{}' as opaque version: {}", input, e);
                Ok(Version::Opaque(input.to_string()))
            }
        }
    }
}

impl SemanticVersion {
    /// Parse a version that must match the structured grammar.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        parse_semantic(input, false)
    }

    /// Parse a dependency-range version, which may end in a wildcard
    /// component (`1.2.x`, `1.*`).
    pub fn parse_range(input: &str) -> Result<Self, VersionError> {
        parse_semantic(input, true)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticVersion::parse(s)
    }
}

fn parse_semantic(input: &str, allow_wildcard: bool) -> Result<SemanticVersion, VersionError> {
    if input.trim().is_empty() {
        return Err(VersionError::invalid(input, "version must not be empty"));
    }

    let (rest, build) = match input.split_once('+') {
        Some((rest, build)) => {
            validate_build(build).map_err(|reason| VersionError::invalid(input, reason))?;
            (rest, Some(build.to_string()))
        }
        None => (input, None),
    };

    let (release, prerelease) = match rest.split_once('-') {
        Some((release, prerelease)) => (release, Some(prerelease)),
        None => (rest, None),
    };

    let parts: Vec<&str> = release.split('.').collect();
    let mut components = Vec::with_capacity(parts.len());
    let mut wildcard = false;

    for (i, part) in parts.iter().enumerate() {
        if WILDCARDS.contains(part) {
            if !allow_wildcard {
                return Err(VersionError::invalid(
                    input,
                    format!("wildcard '{}' is only allowed in dependency ranges", part),
                ));
            }
            if i == 0 {
                return Err(VersionError::invalid(
                    input,
                    "version must start with a numeric component",
                ));
            }
            if i != parts.len() - 1 {
                return Err(VersionError::invalid(
                    input,
                    "wildcard must be the last release component",
                ));
            }
            wildcard = true;
            continue;
        }

        let number = parse_number(part).map_err(|reason| {
            VersionError::invalid(input, format!("release component {}: {}", i + 1, reason))
        })?;
        components.push(number);
    }

    let prerelease = prerelease
        .map(parse_prerelease)
        .transpose()
        .map_err(|reason| VersionError::invalid(input, reason))?;

    if wildcard {
        if prerelease.is_some() || build.is_some() {
            return Err(VersionError::invalid(
                input,
                "a wildcard version cannot carry a pre-release or build metadata",
            ));
        }
        return Ok(SemanticVersion::with_wildcard(components));
    }

    SemanticVersion::new(components, prerelease, build)
        .ok_or_else(|| VersionError::invalid(input, "missing release component"))
}

fn parse_number(part: &str) -> Result<u64, String> {
    if part.is_empty() {
        return Err("empty component".to_string());
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a non-negative integer", part));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(format!("'{}' has a leading zero", part));
    }
    part.parse::<u64>()
        .map_err(|_| format!("'{}' is out of range", part))
}

fn parse_prerelease(segment: &str) -> Result<Prerelease, String> {
    let mut parts = segment.split('.');
    let key_text = parts.next().unwrap_or_default();
    let key = PrereleaseKey::from_token(key_text).ok_or_else(|| {
        format!(
            "unknown pre-release key '{}', expected one of alpha, beta, rc",
            key_text
        )
    })?;

    let components = parts
        .map(|part| {
            if !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase()) {
                Ok(PrereleaseComponent::Token(part.to_string()))
            } else {
                parse_number(part)
                    .map(PrereleaseComponent::Numeric)
                    .map_err(|reason| format!("pre-release component: {}", reason))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Prerelease::new(key, components))
}

fn validate_build(build: &str) -> Result<(), String> {
    if build.is_empty() {
        return Err("empty build metadata".to_string());
    }
    if let Some(c) = build
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
    {
        return Err(format!("invalid character '{}' in build metadata", c));
    }
    Ok(())
}
