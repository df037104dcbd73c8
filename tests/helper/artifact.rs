//! Artifact fixtures written to disk

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Collects entries and writes them as a jar or an exploded directory
#[derive(Default)]
pub struct ArtifactBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

#[allow(dead_code)]
impl ArtifactBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, path: &str, body: &[u8]) -> Self {
        self.entries.push((path.to_string(), body.to_vec()));
        self
    }

    pub fn version_json(self, json: &str) -> Self {
        self.entry("version.json", json.as_bytes())
    }

    pub fn manifest(self, attributes: &[(&str, &str)]) -> Self {
        let mut manifest = String::from("Manifest-Version: 1.0\r\n");
        for (key, value) in attributes {
            manifest.push_str(&format!("{}: {}\r\n", key, value));
        }
        manifest.push_str("\r\n");
        self.entry("META-INF/MANIFEST.MF", manifest.as_bytes())
    }

    pub fn write_jar(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        for (entry, body) in &self.entries {
            writer
                .start_file(entry.as_str(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    pub fn write_dir(&self, dir: &Path, name: &str) -> PathBuf {
        let root = dir.join(name);
        fs::create_dir_all(&root).unwrap();
        for (entry, body) in &self.entries {
            let path = root.join(entry);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, body).unwrap();
        }
        root
    }
}

/// Minimal class file bytes holding one UTF-8 constant
#[allow(dead_code)]
pub fn class_with_constant(major: u16, constant: &str) -> Vec<u8> {
    let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00];
    bytes.extend_from_slice(&major.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x03, 0x01]);
    bytes.extend_from_slice(&(constant.len() as u16).to_be_bytes());
    bytes.extend_from_slice(constant.as_bytes());
    bytes.extend_from_slice(&[0x07, 0x00, 0x01]);
    bytes
}
