//! Shared test utilities

pub mod artifact;

#[allow(unused_imports)]
pub use artifact::{ArtifactBuilder, class_with_constant};
