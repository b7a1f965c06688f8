//! Explicit merges: `assign` (shallow) and `merge` (deep).
//!
//! Unlike the file loaders, merged values override keys that already exist
//! in the configuration. Later objects override earlier ones.

use crate::configuration::{Configuration, value_kind};
use crate::error::{ConfabError, ConfabResult};
use crate::transform::Transform;
use serde_json::{Map, Value};

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key by key. Any other overlay value replaces the base value
/// outright, except `null`, which means "leave as is": it keeps an existing
/// value and never introduces a key.
///
/// ```
/// use confab::transforms::deep_merge;
/// use serde_json::json;
///
/// let merged = deep_merge(
///     json!({"db": {"url": "postgres://localhost", "pool": 4}, "tags": ["a"]}),
///     json!({"db": {"pool": 16, "timeout": null}, "tags": ["b"]}),
/// );
/// assert_eq!(
///     merged,
///     json!({"db": {"url": "postgres://localhost", "pool": 16}, "tags": ["b"]})
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut target), Value::Object(changes)) => {
            for (key, change) in changes {
                match target.remove(&key) {
                    Some(current) => {
                        target.insert(key, deep_merge(current, change));
                    }
                    None if change.is_null() => {}
                    None => {
                        target.insert(key, change);
                    }
                }
            }
            Value::Object(target)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Shallow,
    Deep,
}

/// Transform that merges one or more objects over the configuration.
#[derive(Debug, Clone)]
pub struct Merge {
    objects: Vec<Map<String, Value>>,
    strategy: Strategy,
}

impl Merge {
    fn new(objects: impl IntoIterator<Item = Value>, strategy: Strategy) -> ConfabResult<Self> {
        let objects = objects
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(map) => Ok(map),
                other => Err(ConfabError::Argument(format!(
                    "merge object #{index} must be an object, got {}",
                    value_kind(&other)
                ))),
            })
            .collect::<ConfabResult<Vec<_>>>()?;

        if objects.is_empty() {
            return Err(ConfabError::Argument(
                "at least one object is required to merge".to_string(),
            ));
        }
        Ok(Self { objects, strategy })
    }
}

impl Transform for Merge {
    fn apply(&self, mut config: Configuration) -> ConfabResult<Configuration> {
        for object in &self.objects {
            for (key, value) in object {
                let value = match self.strategy {
                    Strategy::Shallow => value.clone(),
                    Strategy::Deep => match config.get(key) {
                        Some(existing) => deep_merge(existing.clone(), value.clone()),
                        None if value.is_null() => continue,
                        None => value.clone(),
                    },
                };
                config.insert(key.as_str(), value)?;
            }
        }
        Ok(config)
    }

    fn name(&self) -> &str {
        match self.strategy {
            Strategy::Shallow => "assign",
            Strategy::Deep => "merge",
        }
    }
}

/// Shallow-merge `objects` into the configuration, replacing existing keys.
///
/// Fails with [`ConfabError::Argument`] if no object is given or any value
/// is not a JSON object.
pub fn assign(objects: impl IntoIterator<Item = Value>) -> ConfabResult<Merge> {
    Merge::new(objects, Strategy::Shallow)
}

/// Deep-merge `objects` into the configuration. Nested objects merge per
/// key and arrays and scalars replace. A `null` is a no-op at any depth: it
/// keeps an existing value and does not create a missing key. Use [`assign`]
/// to store an explicit `null`.
pub fn merge(objects: impl IntoIterator<Item = Value>) -> ConfabResult<Merge> {
    Merge::new(objects, Strategy::Deep)
}
