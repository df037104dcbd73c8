use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Artifact layout constants
// =============================================================================

/// Structured metadata record embedded in the artifact
pub const DEFAULT_METADATA_ENTRY: &str = "version.json";

/// Archive-level manifest
pub const DEFAULT_MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Manifest attributes that may declare a version, in priority order
pub const DEFAULT_MANIFEST_KEYS: [&str; 2] = ["Implementation-Version", "Specification-Version"];

/// Class entries known to embed a version string
pub const DEFAULT_MARKER_ENTRIES: [&str; 4] = [
    "net/minecraft/client/Minecraft.class",
    "net/minecraft/client/main/Main.class",
    "net/minecraft/server/MinecraftServer.class",
    "net/minecraft/realms/RealmsSharedConstants.class",
];

/// File extensions treated as artifacts when scanning a directory
pub const DEFAULT_ARTIFACT_EXTENSIONS: [&str; 2] = ["jar", "zip"];

/// Largest entry read from an artifact (64 MiB)
pub const MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// Raw version reported when nothing identifies the artifact
pub const UNKNOWN_VERSION: &str = "unknown";

/// Lookup configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupConfig {
    pub metadata_entry: String,
    pub manifest_entry: String,
    pub manifest_keys: Vec<String>,
    pub marker_entries: Vec<String>,
    pub artifact_extensions: Vec<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            metadata_entry: DEFAULT_METADATA_ENTRY.to_string(),
            manifest_entry: DEFAULT_MANIFEST_ENTRY.to_string(),
            manifest_keys: DEFAULT_MANIFEST_KEYS.map(String::from).to_vec(),
            marker_entries: DEFAULT_MARKER_ENTRIES.map(String::from).to_vec(),
            artifact_extensions: DEFAULT_ARTIFACT_EXTENSIONS.map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LookupConfig {
    /// Load a JSON configuration file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether `path` has one of the configured artifact extensions
    pub fn is_artifact_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.artifact_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

/// Directory name under the data root
const APP_DIR: &str = "version-lookup";

/// Data directory holding the default log file.
///
/// `$XDG_DATA_HOME` wins when it is an absolute path, then the platform's
/// local data directory, then the current directory.
pub fn data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        dirs::data_local_dir(),
    )
}

/// Default `--log` destination
pub fn log_path() -> PathBuf {
    data_dir().join(format!("{}.log", APP_DIR))
}

fn resolve_data_dir(xdg_data_home: Option<PathBuf>, platform_dir: Option<PathBuf>) -> PathBuf {
    xdg_data_home
        .filter(|dir| dir.is_absolute())
        .or(platform_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn lookup_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<LookupConfig>(json!({
            "metadataEntry": "meta/version.json"
        }))
        .unwrap();

        assert_eq!(result.metadata_entry, "meta/version.json");
        assert_eq!(result.manifest_entry, DEFAULT_MANIFEST_ENTRY);
        assert_eq!(result.marker_entries.len(), DEFAULT_MARKER_ENTRIES.len());
    }

    #[test]
    fn lookup_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<LookupConfig>(json!({
            "metadataEntry": "v.json",
            "manifestEntry": "MANIFEST",
            "manifestKeys": ["Bundle-Version"],
            "markerEntries": ["Game.class"],
            "artifactExtensions": ["pak"]
        }))
        .unwrap();

        assert_eq!(
            result,
            LookupConfig {
                metadata_entry: "v.json".to_string(),
                manifest_entry: "MANIFEST".to_string(),
                manifest_keys: vec!["Bundle-Version".to_string()],
                marker_entries: vec!["Game.class".to_string()],
                artifact_extensions: vec!["pak".to_string()],
            }
        );
    }

    #[test]
    fn from_file_reads_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "artifactExtensions": ["jar"] }}"#).unwrap();

        let config = LookupConfig::from_file(file.path()).unwrap();

        assert_eq!(config.artifact_extensions, vec!["jar".to_string()]);
    }

    #[test]
    fn from_file_reports_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = LookupConfig::from_file(file.path());

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[rstest]
    #[case("client.jar", true)]
    #[case("server.ZIP", true)]
    #[case("notes.txt", false)]
    #[case("no_extension", false)]
    fn is_artifact_file_checks_extension(#[case] name: &str, #[case] expected: bool) {
        let config = LookupConfig::default();
        assert_eq!(config.is_artifact_file(Path::new(name)), expected);
    }

    #[rstest]
    #[case(Some("/srv/data"), Some("/home/u/.local/share"), "/srv/data/version-lookup")]
    #[case(Some("relative/data"), Some("/home/u/.local/share"), "/home/u/.local/share/version-lookup")]
    #[case(None, Some("/home/u/.local/share"), "/home/u/.local/share/version-lookup")]
    #[case(Some("relative/data"), None, "./version-lookup")]
    #[case(None, None, "./version-lookup")]
    fn resolve_data_dir_picks_first_usable_root(
        #[case] xdg_data_home: Option<&str>,
        #[case] platform_dir: Option<&str>,
        #[case] expected: &str,
    ) {
        let path = resolve_data_dir(
            xdg_data_home.map(PathBuf::from),
            platform_dir.map(PathBuf::from),
        );

        assert_eq!(path, PathBuf::from(expected));
    }
}
