//! Artifact access
//!
//! An artifact is a packaged bundle whose entries can be read by path:
//! a jar/zip archive ([`ZipArtifact`]) or an exploded directory
//! ([`DirArtifact`]).

pub mod archive;
pub mod directory;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::MAX_ENTRY_BYTES;

pub use archive::ZipArtifact;
pub use directory::DirArtifact;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact unreadable: {path:?}: {source}")]
    Unreadable { path: PathBuf, source: io::Error },
}

impl ArtifactError {
    pub(crate) fn unreadable(path: &Path, source: io::Error) -> Self {
        Self::Unreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read access to the entries of a bundle
pub trait Artifact: Send + Sync {
    /// File name of the artifact, e.g. `client.jar`
    fn name(&self) -> &str;

    /// Read the entry at a `/`-separated path.
    ///
    /// Returns `Ok(None)` when the entry does not exist.
    fn read_entry(&self, path: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Open a directory as an exploded artifact and anything else as an archive.
pub fn open_artifact(path: &Path) -> Result<Box<dyn Artifact>, ArtifactError> {
    if path.is_dir() {
        Ok(Box::new(DirArtifact::open(path)?))
    } else {
        Ok(Box::new(ZipArtifact::open(path)?))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read an entry body, refusing anything larger than [`MAX_ENTRY_BYTES`].
fn read_bounded<R: Read>(reader: R, path: &str) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(MAX_ENTRY_BYTES + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > MAX_ENTRY_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("entry {} exceeds {} bytes", path, MAX_ENTRY_BYTES),
        ));
    }
    Ok(buf)
}
