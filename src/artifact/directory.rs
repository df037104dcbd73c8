//! Exploded (unpacked) artifact directory

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::artifact::{Artifact, ArtifactError, display_name, read_bounded};

pub struct DirArtifact {
    root: PathBuf,
    name: String,
}

impl DirArtifact {
    pub fn open(root: &Path) -> Result<Self, ArtifactError> {
        let metadata = fs::metadata(root).map_err(|e| ArtifactError::unreadable(root, e))?;
        if !metadata.is_dir() {
            return Err(ArtifactError::unreadable(
                root,
                io::Error::other("not a directory"),
            ));
        }
        fs::read_dir(root).map_err(|e| ArtifactError::unreadable(root, e))?;

        Ok(Self {
            root: root.to_path_buf(),
            name: display_name(root),
        })
    }

    fn entry_path(&self, path: &str) -> io::Result<PathBuf> {
        let relative = Path::new(path);
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("entry path {} escapes the artifact", path),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl Artifact for DirArtifact {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_entry(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        let full_path = self.entry_path(path)?;
        match File::open(&full_path) {
            Ok(file) => read_bounded(file, path).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
