//! Convenience accessor over a finished configuration.
//!
//! [`Config`] copies the pipeline result and offers path-based lookups such
//! as `server.hosts[1].name`. It is sugar only; the pipeline never uses it.

use crate::configuration::Configuration;
use crate::error::ConfabResult;
use crate::pipeline::confab;
use crate::transform::Transform;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One step of a parsed lookup path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Split `a.b[0].c` into segments. Returns `None` for an empty or malformed
/// path.
fn parse_path(path: &str) -> Option<Vec<Segment>> {
    if path.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                let mut inner = String::new();
                loop {
                    match chars.next()? {
                        ']' => break,
                        ch => inner.push(ch),
                    }
                }
                let inner = inner.trim_matches(|q| q == '"' || q == '\'');
                segments.push(match inner.parse::<usize>() {
                    Ok(index) => Segment::Index(index),
                    Err(_) => Segment::Key(inner.to_string()),
                });
            }
            ch => current.push(ch),
        }
    }
    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, segments: &[Segment]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut node = match first {
        Segment::Key(key) => root.get(key)?,
        Segment::Index(index) => root.get(&index.to_string())?,
    };

    for segment in rest {
        node = match (node, segment) {
            (Value::Object(map), Segment::Key(key)) => map.get(key)?,
            (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string())?,
            (Value::Array(items), Segment::Index(index)) => items.get(*index)?,
            (Value::Array(items), Segment::Key(key)) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Read-mostly wrapper with dotted/indexed path lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    data: Map<String, Value>,
}

impl Config {
    /// Run `transforms` and wrap the result.
    pub fn create<I, T>(transforms: I) -> ConfabResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Transform,
    {
        confab(transforms).map(Self::from)
    }

    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Value at `path`, or `None` if any step is missing.
    ///
    /// ```
    /// use confab::Config;
    /// use serde_json::json;
    ///
    /// let cfg = Config::from_map(
    ///     json!({"sample": {"y": [{"d": 3}, {"temp": "value"}]}})
    ///         .as_object()
    ///         .cloned()
    ///         .unwrap(),
    /// );
    /// assert_eq!(cfg.get("sample.y[1].temp"), Some(&json!("value")));
    /// assert_eq!(cfg.get("sample.missing"), None);
    /// ```
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = parse_path(path)?;
        lookup(&self.data, &segments)
    }

    /// Whether `path` resolves, including to `null`.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Deserialize the value at `path`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.get(path)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Deep copy of the current data.
    pub fn clone_data(&self) -> Map<String, Value> {
        self.data.clone()
    }

    /// Drop all data.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }
}

impl From<Configuration> for Config {
    fn from(config: Configuration) -> Self {
        Self::from_map(config.into_map())
    }
}
