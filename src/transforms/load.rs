//! File-loading transforms with first-match-wins candidate search.
//!
//! A loader scans its candidate list in order and reads only the first path
//! that exists. Keys loaded from the file fill gaps in the incoming
//! configuration; they never replace keys that are already present.

use crate::configuration::{Configuration, value_kind};
use crate::error::{ConfabError, ConfabResult};
use crate::fs::{OsFileSystem, SharedFileSystem, expand_home};
use crate::transform::Transform;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Parse file content into a top-level mapping.
    pub fn parse(&self, path: &Path, content: &str) -> ConfabResult<Map<String, Value>> {
        let parse_err = |message: String| ConfabError::Parse {
            path: path.to_path_buf(),
            format: self.as_str(),
            message,
        };

        let value = match self {
            Format::Json => {
                serde_json::from_str::<Value>(content).map_err(|e| parse_err(e.to_string()))?
            }
            Format::Yaml => parse_yaml(content).map_err(&parse_err)?,
        };

        match value {
            Value::Object(map) => Ok(map),
            // An empty YAML document is an empty mapping.
            Value::Null if *self == Format::Yaml => Ok(Map::new()),
            other => Err(parse_err(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str) -> Result<Value, String> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string())
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str) -> Result<Value, String> {
    Err("yaml support is not compiled in".to_string())
}

/// Whether YAML loading is operational in this build.
///
/// When it is not, [`load_yaml`] transforms pass the configuration through
/// unchanged.
pub fn yaml_available() -> bool {
    cfg!(feature = "yaml")
}

/// Ordered list of candidate paths.
///
/// Converts from a single path or from any sequence of paths, so callers can
/// write `load_json("config.json")` as well as `load_json(["a.json", "b.json"])`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates(Vec<PathBuf>);

impl Candidates {
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.0
    }
}

impl From<&str> for Candidates {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<String> for Candidates {
    fn from(path: String) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<&Path> for Candidates {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for Candidates {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl<T: Into<PathBuf>> From<Vec<T>> for Candidates {
    fn from(paths: Vec<T>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PathBuf>, const N: usize> From<[T; N]> for Candidates {
    fn from(paths: [T; N]) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PathBuf>> FromIterator<T> for Candidates {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Transform that merges the first existing candidate file into the
/// configuration.
#[derive(Clone)]
pub struct FileLoader {
    candidates: Vec<PathBuf>,
    format: Format,
    fs: SharedFileSystem,
}

impl FileLoader {
    pub fn new(candidates: impl Into<Candidates>, format: Format) -> Self {
        let candidates = candidates
            .into()
            .into_vec()
            .into_iter()
            .map(expand_home)
            .collect();
        Self {
            candidates,
            format,
            fs: Arc::new(OsFileSystem),
        }
    }

    /// Use a different filesystem, e.g. an in-memory one in tests.
    pub fn with_filesystem(mut self, fs: SharedFileSystem) -> Self {
        self.fs = fs;
        self
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// First candidate that currently exists. Later entries are not probed.
    pub fn resolve(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .find(|path| self.fs.exists(path))
            .map(PathBuf::as_path)
    }
}

impl Transform for FileLoader {
    fn apply(&self, mut config: Configuration) -> ConfabResult<Configuration> {
        if self.format == Format::Yaml && !yaml_available() {
            debug!("yaml support not compiled in; loader is a no-op");
            return Ok(config);
        }

        let Some(path) = self.resolve() else {
            debug!(candidates = ?self.candidates, "No config available");
            return Err(ConfabError::MissingConfig {
                candidates: self.candidates.clone(),
            });
        };

        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| ConfabError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let loaded = self.format.parse(path, &content)?;
        debug!(path = %path.display(), keys = loaded.len(), "loaded config file");

        for (key, value) in loaded {
            config.insert_if_absent(&key, value)?;
        }
        Ok(config)
    }

    fn name(&self) -> &str {
        match self.format {
            Format::Json => "load_json",
            Format::Yaml => "load_yaml",
        }
    }
}

impl std::fmt::Debug for FileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLoader")
            .field("candidates", &self.candidates)
            .field("format", &self.format)
            .finish()
    }
}

/// Load the first existing JSON file among `paths`.
///
/// Fails with [`ConfabError::MissingConfig`] when none exists.
pub fn load_json(paths: impl Into<Candidates>) -> FileLoader {
    FileLoader::new(paths, Format::Json)
}

/// Load the first existing YAML file among `paths`.
///
/// A no-op when YAML support is not compiled in (see [`yaml_available`]).
pub fn load_yaml(paths: impl Into<Candidates>) -> FileLoader {
    FileLoader::new(paths, Format::Yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileSystem, MemoryFileSystem};
    use serde_json::json;
    use std::io;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_loads_single_path() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "test.json", r#"{"author": "Lewis Carroll"}"#);

        let config = load_json(path).apply(Configuration::new()).unwrap();
        assert_eq!(config.get("author"), Some(&json!("Lewis Carroll")));
    }

    #[test]
    fn test_skips_missing_candidates() {
        let temp = TempDir::new().unwrap();
        let real = write(&temp, "real.json", r#"{"author": "Lewis Carroll"}"#);
        let missing = temp.path().join("missing.json");

        let config = load_json(vec![missing, real])
            .apply(Configuration::new())
            .unwrap();
        assert_eq!(config.get("author"), Some(&json!("Lewis Carroll")));
    }

    #[test]
    fn test_first_match_wins() {
        let fs = MemoryFileSystem::new()
            .with_file("/a.json", r#"{"from": "a"}"#)
            .with_file("/b.json", r#"{"from": "b"}"#);
        let loader = load_json(["/missing.json", "/a.json", "/b.json"]).with_filesystem(Arc::new(fs));

        assert_eq!(loader.resolve(), Some(Path::new("/a.json")));
        let config = loader.apply(Configuration::new()).unwrap();
        assert_eq!(config.get("from"), Some(&json!("a")));
    }

    /// Filesystem that records every existence probe.
    struct ProbeLog {
        inner: MemoryFileSystem,
        probed: Mutex<Vec<PathBuf>>,
    }

    impl FileSystem for ProbeLog {
        fn exists(&self, path: &Path) -> bool {
            self.probed.lock().unwrap().push(path.to_path_buf());
            self.inner.exists(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.inner.read_to_string(path)
        }
    }

    #[test]
    fn test_later_candidates_not_probed() {
        let fs = Arc::new(ProbeLog {
            inner: MemoryFileSystem::new().with_file("/b.json", r#"{"from": "b"}"#),
            probed: Mutex::new(Vec::new()),
        });
        let loader = load_json(["/a.json", "/b.json", "/c.json"]).with_filesystem(fs.clone());

        let config = loader.apply(Configuration::new()).unwrap();
        assert_eq!(config.get("from"), Some(&json!("b")));
        assert_eq!(
            *fs.probed.lock().unwrap(),
            vec![PathBuf::from("/a.json"), PathBuf::from("/b.json")]
        );
    }

    #[test]
    fn test_existing_keys_take_precedence() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "test.json", r#"{"extra": "ignored", "author": "X"}"#);

        let incoming = Configuration::from_value(json!({"extra": "anything"})).unwrap();
        let config = load_json(path).apply(incoming).unwrap();
        assert_eq!(config.get("extra"), Some(&json!("anything")));
        assert_eq!(config.get("author"), Some(&json!("X")));
    }

    #[test]
    fn test_all_missing_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");

        let err = load_json(missing.clone())
            .apply(Configuration::new())
            .unwrap_err();
        match err {
            ConfabError::MissingConfig { candidates } => assert_eq!(candidates, vec![missing]),
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_candidate_list_is_an_error() {
        let err = load_json(Vec::<PathBuf>::new())
            .apply(Configuration::new())
            .unwrap_err();
        assert!(matches!(err, ConfabError::MissingConfig { .. }));
    }

    #[test]
    fn test_invalid_json_propagates_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "invalid.json", "{ not json");

        let err = load_json(path).apply(Configuration::new()).unwrap_err();
        assert!(matches!(err, ConfabError::Parse { format: "json", .. }));
    }

    #[test]
    fn test_non_mapping_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "list.json", "[1, 2, 3]");

        let err = load_json(path).apply(Configuration::new()).unwrap_err();
        assert!(err.to_string().contains("expected a mapping"));
    }

    #[test]
    fn test_loading_into_frozen_config_fails() {
        let fs = MemoryFileSystem::new().with_file("/c.json", r#"{"new": 1}"#);
        let mut frozen = Configuration::new();
        frozen.freeze();

        let err = load_json("/c.json")
            .with_filesystem(Arc::new(fs))
            .apply(frozen)
            .unwrap_err();
        assert!(matches!(err, ConfabError::Frozen { .. }));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.toml")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_loads_yaml() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "test.yaml",
            "author: Lewis Carroll\nserver:\n  port: 8080\n",
        );

        assert!(yaml_available());
        let config = load_yaml(path).apply(Configuration::new()).unwrap();
        assert_eq!(config.get("author"), Some(&json!("Lewis Carroll")));
        assert_eq!(config.get("server"), Some(&json!({"port": 8080})));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_empty_yaml_is_empty_mapping() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "empty.yml", "");

        let config = load_yaml(path).apply(Configuration::new()).unwrap();
        assert!(config.is_empty());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_invalid_yaml_propagates_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "bad.yaml", "key: [unclosed");

        let err = load_yaml(path).apply(Configuration::new()).unwrap_err();
        assert!(matches!(err, ConfabError::Parse { format: "yaml", .. }));
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn test_yaml_loader_is_noop_without_support() {
        assert!(!yaml_available());
        let incoming = Configuration::from_value(json!({"a": 1})).unwrap();
        let config = load_yaml("/definitely/missing.yaml").apply(incoming.clone()).unwrap();
        assert_eq!(config, incoming);
    }
}
