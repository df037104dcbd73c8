//! Version ordering
//!
//! Structured versions compare release components left to right, treating
//! missing trailing components as 0. A wildcard position sorts above every
//! concrete number. With equal releases a version without pre-release is
//! greater than one with a pre-release, and two pre-releases compare by key
//! (`alpha < beta < rc`) and then component by component. Build metadata is
//! ignored.
//!
//! Every structured version sorts before every opaque one; opaque versions
//! compare as plain strings.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::version::error::VersionError;
use crate::version::model::{SemanticVersion, Version};

/// One release position. `Any` is the wildcard and beats any number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Number(u64),
    Any,
}

impl SemanticVersion {
    fn slot(&self, index: usize) -> Slot {
        let concrete = self.components().len();
        if index < concrete {
            Slot::Number(self.component(index))
        } else if self.has_wildcard() && index == concrete {
            Slot::Any
        } else {
            Slot::Number(0)
        }
    }

    fn slot_count(&self) -> usize {
        self.components().len() + usize::from(self.has_wildcard())
    }

    fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.slot_count().max(other.slot_count());
        (0..len)
            .map(|i| self.slot(i).cmp(&other.slot(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Check whether `candidate` satisfies this version used as a pattern.
    ///
    /// A concrete pattern matches only an equal version. A wildcard pattern
    /// (`1.2.x`) matches any candidate whose leading components equal the
    /// pattern's concrete ones, whatever follows.
    pub fn matches(&self, candidate: &SemanticVersion) -> bool {
        if !self.has_wildcard() {
            return self == candidate;
        }
        (0..self.components().len()).all(|i| self.component(i) == candidate.component(i))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_release(other)
            .then_with(|| match (self.prerelease(), other.prerelease()) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Trailing zeros are insignificant unless a wildcard follows them
        let components = self.components();
        let significant = if self.has_wildcard() {
            components
        } else {
            let end = components
                .iter()
                .rposition(|&c| c != 0)
                .map_or(0, |i| i + 1);
            &components[..end]
        };
        significant.hash(state);
        self.has_wildcard().hash(state);
        self.prerelease().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Version::Semantic(a), Version::Semantic(b)) => a.cmp(b),
            (Version::Opaque(a), Version::Opaque(b)) => a.cmp(b),
            (Version::Semantic(_), Version::Opaque(_)) => Ordering::Less,
            (Version::Opaque(_), Version::Semantic(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Version::Semantic(version) => {
                0u8.hash(state);
                version.hash(state);
            }
            Version::Opaque(raw) => {
                1u8.hash(state);
                raw.hash(state);
            }
        }
    }
}

/// Parse and compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}

/// Return the greatest of the given versions, skipping empty strings.
pub fn latest_version<I, S>(versions: I) -> Option<Version>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    versions
        .into_iter()
        .filter_map(|v| Version::parse(v.as_ref()).ok())
        .max()
}
