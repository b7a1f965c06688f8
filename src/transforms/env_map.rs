//! Environment-variable mapping transform.

use crate::configuration::Configuration;
use crate::environment::{ProcessEnv, SharedEnvironment};
use crate::error::{ConfabError, ConfabResult};
use crate::transform::Transform;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Options for [`load_environment_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvOptions {
    /// Decode values that are JSON scalars (`true`, `42`, `null`, `"text"`).
    /// Anything else is kept as the raw string.
    pub coerce: bool,
}

/// Copies set environment variables into configuration keys.
#[derive(Clone)]
pub struct EnvMapper {
    /// (variable name, configuration key) pairs in insertion order.
    map: Vec<(String, String)>,
    options: EnvOptions,
    env: SharedEnvironment,
}

impl EnvMapper {
    /// Fails with [`ConfabError::MissingMap`] if `map` is empty.
    pub fn new<I, K, V>(map: I, options: EnvOptions) -> ConfabResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Vec<(String, String)> = map
            .into_iter()
            .map(|(var, key)| (var.into(), key.into()))
            .collect();
        if map.is_empty() {
            return Err(ConfabError::MissingMap);
        }
        Ok(Self {
            map,
            options,
            env: Arc::new(ProcessEnv),
        })
    }

    /// Read variables from `env` instead of the process environment.
    pub fn with_environment(mut self, env: SharedEnvironment) -> Self {
        self.env = env;
        self
    }

    pub fn options(&self) -> EnvOptions {
        self.options
    }
}

impl Transform for EnvMapper {
    fn apply(&self, mut config: Configuration) -> ConfabResult<Configuration> {
        for (var, key) in &self.map {
            let Some(raw) = self.env.var(var) else {
                continue;
            };
            let value = if self.options.coerce {
                translate(&raw)
            } else {
                Value::String(raw)
            };
            config.insert(key.as_str(), value)?;
        }
        Ok(config)
    }

    fn name(&self) -> &str {
        "load_environment"
    }
}

impl std::fmt::Debug for EnvMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvMapper")
            .field("map", &self.map)
            .field("options", &self.options)
            .finish()
    }
}

/// Decode a JSON scalar, falling back to the raw string.
fn translate(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        Ok(_) => Value::String(raw.to_string()),
        Err(e) => {
            debug!(error = %e, "translate error; keeping raw string");
            Value::String(raw.to_string())
        }
    }
}

/// Map environment variables (when set) to configuration keys, copying the
/// raw string values. Unset variables are skipped.
///
/// An empty map is treated as no map at all and fails with
/// [`ConfabError::MissingMap`].
pub fn load_environment<I, K, V>(map: I) -> ConfabResult<EnvMapper>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    EnvMapper::new(map, EnvOptions::default())
}

/// Like [`load_environment`], with explicit options.
pub fn load_environment_with<I, K, V>(map: I, options: EnvOptions) -> ConfabResult<EnvMapper>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    EnvMapper::new(map, options)
}

/// Deprecated alias of [`load_environment`].
#[deprecated(note = "use load_environment instead")]
pub fn map_environment<I, K, V>(map: I) -> ConfabResult<EnvMapper>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    warn!("map_environment is deprecated; please use load_environment instead");
    load_environment(map)
}
