//! Jar/zip archive artifact

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::artifact::{Artifact, ArtifactError, display_name, read_bounded};

pub struct ZipArtifact {
    archive: Mutex<ZipArchive<File>>,
    name: String,
}

impl ZipArtifact {
    pub fn open(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::unreadable(path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| {
            ArtifactError::unreadable(path, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        debug!("Opened archive {:?} with {} entries", path, archive.len());

        Ok(Self {
            archive: Mutex::new(archive),
            name: display_name(path),
        })
    }

    /// Acquire the archive lock; a poisoned lock becomes an I/O error
    fn lock_archive(&self) -> io::Result<MutexGuard<'_, ZipArchive<File>>> {
        self.archive
            .lock()
            .map_err(|_| io::Error::other("archive lock poisoned"))
    }
}

impl Artifact for ZipArtifact {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_entry(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        let mut archive = self.lock_archive()?;
        match archive.by_name(path) {
            Ok(entry) => read_bounded(entry, path).map(Some),
            Err(ZipError::FileNotFound) => Ok(None),
            Err(ZipError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }
}
