use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },
}

impl VersionError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
