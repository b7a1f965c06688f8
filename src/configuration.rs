//! The configuration value threaded through a pipeline.
//!
//! A [`Configuration`] is a string-keyed mapping of JSON values. It starts out
//! mutable and can be frozen by the `freeze` transform, after which every
//! mutating method fails with [`ConfabError::Frozen`]. Reads are unaffected.

use crate::error::{ConfabError, ConfabResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Configuration mapping handed from transform to transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    entries: Map<String, Value>,
    frozen: bool,
}

impl Configuration {
    /// Create an empty, mutable configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing mapping.
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self {
            entries,
            frozen: false,
        }
    }

    /// Build a configuration from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> ConfabResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ConfabError::Argument(format!(
                "expected an object, got {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Strict presence check: a key holding `null` or `false` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Mark the configuration read-only. Irreversible.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Insert or replace a key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> ConfabResult<Option<Value>> {
        let key = key.into();
        if self.frozen {
            return Err(ConfabError::frozen(key));
        }
        Ok(self.entries.insert(key, value))
    }

    /// Insert only if the key is absent. Returns whether the value was stored.
    pub fn insert_if_absent(&mut self, key: &str, value: Value) -> ConfabResult<bool> {
        if self.entries.contains_key(key) {
            return Ok(false);
        }
        self.insert(key, value)?;
        Ok(true)
    }

    pub fn remove(&mut self, key: &str) -> ConfabResult<Option<Value>> {
        if self.frozen {
            return Err(ConfabError::frozen(key));
        }
        Ok(self.entries.remove(key))
    }

    /// Mutable access to a single value.
    pub fn get_mut(&mut self, key: &str) -> ConfabResult<Option<&mut Value>> {
        if self.frozen {
            return Err(ConfabError::frozen(key));
        }
        Ok(self.entries.get_mut(key))
    }

    /// Insert every entry, later entries overriding existing keys.
    pub fn extend<I>(&mut self, entries: I) -> ConfabResult<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (key, value) in entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> ConfabResult<()> {
        if self.frozen {
            return Err(ConfabError::frozen("*"));
        }
        self.entries.clear();
        Ok(())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    /// Deserialize the configuration into a typed struct.
    pub fn try_deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.entries.clone()))
    }
}

impl From<Map<String, Value>> for Configuration {
    fn from(entries: Map<String, Value>) -> Self {
        Self::from_map(entries)
    }
}

impl Serialize for Configuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Configuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_map)
    }
}

/// JavaScript-style truthiness: `null`, `false`, zero, NaN and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frozen_rejects_writes_but_allows_reads() {
        let mut config = Configuration::from_value(json!({"a": 4})).unwrap();
        config.freeze();

        assert!(matches!(
            config.insert("a", json!(14)),
            Err(ConfabError::Frozen { ref key }) if key == "a"
        ));
        assert!(config.remove("a").is_err());
        assert!(config.get_mut("a").is_err());
        assert!(config.clear().is_err());
        assert!(config.insert("b", json!(1)).is_err());

        assert_eq!(config.get("a"), Some(&json!(4)));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_falsy_values() {
        let mut config = Configuration::from_value(json!({"zero": 0, "off": false})).unwrap();
        assert!(!config.insert_if_absent("zero", json!(5)).unwrap());
        assert!(!config.insert_if_absent("off", json!(true)).unwrap());
        assert!(config.insert_if_absent("new", json!("x")).unwrap());
        assert_eq!(config.get("zero"), Some(&json!(0)));
        assert_eq!(config.get("off"), Some(&json!(false)));
        assert_eq!(config.get("new"), Some(&json!("x")));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Configuration::from_value(json!([1, 2])).is_err());
        assert!(Configuration::from_value(json!("text")).is_err());
        assert!(Configuration::from_value(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_try_deserialize() {
        #[derive(Deserialize)]
        struct Server {
            role: String,
            port: u16,
        }

        let config = Configuration::from_value(json!({"role": "api", "port": 3200})).unwrap();
        let server: Server = config.try_deserialize().unwrap();
        assert_eq!(server.role, "api");
        assert_eq!(server.port, 3200);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let mut config = Configuration::from_value(json!({"b": 1, "a": 2})).unwrap();
        config.freeze();
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
