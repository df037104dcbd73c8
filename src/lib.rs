//! Version parsing, ordering and artifact version lookup
//!
//! - [`version`]: structured/opaque version values, parser and comparator
//! - [`artifact`]: read access to archives and exploded directories
//! - [`lookup`]: derives a normalized version for an artifact
//! - [`check`]: report over a set of artifacts
//! - [`config`]: lookup configuration and paths

pub mod artifact;
pub mod check;
pub mod config;
pub mod lookup;
pub mod version;
