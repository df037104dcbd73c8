//! Version value model
//!
//! A [`Version`] is either a [`SemanticVersion`] that matched the structured
//! grammar or an opaque string that did not. Values are immutable once
//! constructed; ordering lives in [`crate::version::compare`].

use std::fmt;

/// A parsed version string.
#[derive(Debug, Clone)]
pub enum Version {
    /// Matched the structured grammar
    Semantic(SemanticVersion),
    /// Anything else, kept verbatim
    Opaque(String),
}

impl Version {
    pub fn as_semantic(&self) -> Option<&SemanticVersion> {
        match self {
            Version::Semantic(version) => Some(version),
            Version::Opaque(_) => None,
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, Version::Semantic(_))
    }

    pub fn is_prerelease(&self) -> bool {
        self.as_semantic()
            .is_some_and(|version| version.is_prerelease())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Semantic(version) => version.fmt(f),
            Version::Opaque(raw) => f.write_str(raw),
        }
    }
}

/// Pre-release key. Declaration order is precedence: `alpha < beta < rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrereleaseKey {
    Alpha,
    Beta,
    Rc,
}

impl PrereleaseKey {
    pub const ALL: [PrereleaseKey; 3] = [
        PrereleaseKey::Alpha,
        PrereleaseKey::Beta,
        PrereleaseKey::Rc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrereleaseKey::Alpha => "alpha",
            PrereleaseKey::Beta => "beta",
            PrereleaseKey::Rc => "rc",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == token)
    }
}

impl fmt::Display for PrereleaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dot-separated part of a pre-release after its key.
///
/// Numeric parts sort before tokens; tokens sort lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrereleaseComponent {
    Numeric(u64),
    /// Lowercase ASCII letters only
    Token(String),
}

impl fmt::Display for PrereleaseComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrereleaseComponent::Numeric(n) => write!(f, "{}", n),
            PrereleaseComponent::Token(token) => f.write_str(token),
        }
    }
}

/// Pre-release segment such as `alpha.24.3.a`.
///
/// The derived ordering compares the key first, then the components as a
/// sequence where a missing component loses to any present one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prerelease {
    key: PrereleaseKey,
    components: Vec<PrereleaseComponent>,
}

impl Prerelease {
    pub fn new(key: PrereleaseKey, components: Vec<PrereleaseComponent>) -> Self {
        Self { key, components }
    }

    pub fn key(&self) -> PrereleaseKey {
        self.key
    }

    pub fn components(&self) -> &[PrereleaseComponent] {
        &self.components
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key.as_str())?;
        for component in &self.components {
            write!(f, ".{}", component)?;
        }
        Ok(())
    }
}

/// A version that matched the structured grammar.
///
/// `components` holds the concrete release numbers. When `wildcard` is set
/// an extra "any" position follows them (`1.2.x`); only the range parser
/// produces such values.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    components: Vec<u64>,
    prerelease: Option<Prerelease>,
    build: Option<String>,
    wildcard: bool,
}

impl SemanticVersion {
    /// Build a concrete version from its parts.
    ///
    /// Returns `None` when `components` is empty.
    pub fn new(
        components: Vec<u64>,
        prerelease: Option<Prerelease>,
        build: Option<String>,
    ) -> Option<Self> {
        if components.is_empty() {
            return None;
        }
        Some(Self {
            components,
            prerelease,
            build,
            wildcard: false,
        })
    }

    pub(crate) fn with_wildcard(components: Vec<u64>) -> Self {
        Self {
            components,
            prerelease: None,
            build: None,
            wildcard: true,
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Release component at `index`, 0 past the end.
    pub fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }

    pub fn prerelease(&self) -> Option<&Prerelease> {
        self.prerelease.as_ref()
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
        }
        if self.wildcard {
            f.write_str(".x")?;
        }
        if let Some(prerelease) = &self.prerelease {
            write!(f, "-{}", prerelease)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}
