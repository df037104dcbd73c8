//! Public grammar for normalized artifact versions
//!
//! ```text
//! version    := release ("-" prerelease)?
//! release    := digits ("." digits){1,2}
//! prerelease := ("alpha" | "beta" | "rc") "." prenum ("." prenum)? ("." (prenum | [a-z]))?
//! prenum     := "0" | [1-9][0-9]*
//! digits     := "0" | [1-9][0-9]*
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::version::{SemanticVersion, VersionError};

static NORMALIZED_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:0|[1-9][0-9]*)(?:\.(?:0|[1-9][0-9]*)){1,2}",
        r"(?:-(?:alpha|beta|rc)\.(?:0|[1-9][0-9]*)(?:\.(?:0|[1-9][0-9]*))?(?:\.(?:0|[1-9][0-9]*|[a-z]))?)?$",
    ))
    .expect("static regex")
});

static RELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0|[1-9][0-9]*)(?:\.(?:0|[1-9][0-9]*)){1,2}$").expect("static regex")
});

/// Exact match against the public grammar
pub fn is_valid(version: &str) -> bool {
    NORMALIZED_VERSION.is_match(version)
}

/// Exact match against the release part of the public grammar
pub fn is_release(version: &str) -> bool {
    RELEASE.is_match(version)
}

/// Validate against the public grammar and parse the result.
pub fn validate(version: &str) -> Result<SemanticVersion, VersionError> {
    if !is_valid(version) {
        return Err(VersionError::invalid(
            version,
            "does not match the normalized version grammar",
        ));
    }
    SemanticVersion::parse(version)
}
