//! Fill missing keys with default values.

use crate::configuration::{Configuration, value_kind};
use crate::error::{ConfabError, ConfabResult};
use crate::transform::Transform;
use serde_json::{Map, Value};
use tracing::warn;

/// Sets each default whose key is absent from the configuration.
///
/// Absence is strict: a key holding `0`, `""`, `false` or `null` is present
/// and keeps its value.
#[derive(Debug, Clone)]
pub struct Defaults {
    values: Map<String, Value>,
    warn: bool,
}

impl Defaults {
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            values,
            warn: false,
        }
    }

    /// Log a warning for every default that gets applied.
    pub fn warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }
}

impl Transform for Defaults {
    fn apply(&self, mut config: Configuration) -> ConfabResult<Configuration> {
        for (key, value) in &self.values {
            if config.insert_if_absent(key, value.clone())? && self.warn {
                warn!("Using default value for config: {key}");
            }
        }
        Ok(config)
    }

    fn name(&self) -> &str {
        "defaults"
    }
}

/// Build a defaults transform from a JSON object.
pub fn defaults(values: Value) -> ConfabResult<Defaults> {
    match values {
        Value::Object(map) => Ok(Defaults::new(map)),
        other => Err(ConfabError::Argument(format!(
            "defaults must be an object, got {}",
            value_kind(&other)
        ))),
    }
}
