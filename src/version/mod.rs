//! Version model, parsing and ordering
//!
//! # Modules
//!
//! - [`model`]: `Version` (structured or opaque) and its parts
//! - [`parser`]: general, strict and range entry points
//! - [`compare`]: total ordering, equality and wildcard matching
//! - [`error`]: `VersionError`

pub mod compare;
pub mod error;
pub mod model;
pub mod parser;

pub use compare::{compare_versions, latest_version};
pub use error::VersionError;
pub use model::{Prerelease, PrereleaseComponent, PrereleaseKey, SemanticVersion, Version};
