//! Build subcommand for confab CLI
//!
//! Assembles a pipeline from command-line flags, runs it and renders the
//! result. Transforms run in a fixed order: files, discovery, environment,
//! explicit values, defaults, validation, freeze.

use super::parse_pair;
use crate::accessor::Config;
use crate::configuration::Configuration;
use crate::error::ConfabResult;
use crate::pipeline::Pipeline;
use crate::transforms::{
    EnvOptions, assign, defaults, freeze, load_env_config_file, load_environment_with,
    load_json, load_yaml, required,
};
use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Output format for the built configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Arguments for the build subcommand
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Candidate JSON file; repeat to build a fallback list (first existing wins)
    #[arg(long, value_name = "PATH")]
    pub json: Vec<PathBuf>,

    /// Candidate YAML file; repeat to build a fallback list (first existing wins)
    #[arg(long, value_name = "PATH")]
    pub yaml: Vec<PathBuf>,

    /// Discover a config file by hostname, APP_ENV and APP_INSTANCE
    #[arg(long)]
    pub discover: bool,

    /// Map an environment variable to a key (VAR=key); repeatable
    #[arg(long, value_name = "VAR=KEY", value_parser = parse_pair)]
    pub env: Vec<(String, String)>,

    /// Decode environment values that are JSON scalars (true, 42, null)
    #[arg(long)]
    pub coerce: bool,

    /// Set a key, overriding anything loaded (key=value; value may be JSON)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub set: Vec<(String, String)>,

    /// Fill a key only if it is absent (key=value; value may be JSON)
    #[arg(long = "default", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub defaults: Vec<(String, String)>,

    /// Log a warning for each default that gets used
    #[arg(long)]
    pub warn_defaults: bool,

    /// Fail unless the key is present and truthy; repeatable
    #[arg(long, value_name = "KEY")]
    pub require: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print only the value at this path (e.g. server.hosts[0])
    #[arg(long, value_name = "PATH")]
    pub get: Option<String>,
}

impl BuildArgs {
    /// Translate the flags into a pipeline.
    pub fn pipeline(&self) -> ConfabResult<Pipeline> {
        let mut pipeline = Pipeline::new();

        if !self.json.is_empty() {
            pipeline.push(load_json(self.json.clone()));
        }
        if !self.yaml.is_empty() {
            pipeline.push(load_yaml(self.yaml.clone()));
        }
        if self.discover {
            pipeline.push(load_env_config_file());
        }
        if !self.env.is_empty() {
            let options = EnvOptions {
                coerce: self.coerce,
            };
            pipeline.push(load_environment_with(self.env.clone(), options)?);
        }
        if !self.set.is_empty() {
            pipeline.push(assign([Value::Object(to_object(&self.set))])?);
        }
        if !self.defaults.is_empty() {
            let d = defaults(Value::Object(to_object(&self.defaults)))?;
            pipeline.push(d.warn(self.warn_defaults));
        }
        if !self.require.is_empty() {
            pipeline.push(required(self.require.clone()));
        }
        pipeline.push(freeze());

        Ok(pipeline)
    }

    /// Run the pipeline and render the output.
    pub fn execute(&self) -> Result<String> {
        let config = self.pipeline()?.run()?;
        render(config, self.format, self.get.as_deref())
    }
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn decode_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn to_object(pairs: &[(String, String)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Render the whole configuration, or one value when `path` is given.
pub fn render(config: Configuration, format: OutputFormat, path: Option<&str>) -> Result<String> {
    let value = match path {
        Some(path) => {
            let accessor = Config::from(config);
            match accessor.get(path) {
                Some(value) => value.clone(),
                None => bail!("no value at path '{path}'"),
            }
        }
        None => config.into_value(),
    };

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
        OutputFormat::Yaml => render_yaml(&value),
    }
}

#[cfg(feature = "yaml")]
fn render_yaml(value: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

#[cfg(not(feature = "yaml"))]
fn render_yaml(_value: &Value) -> Result<String> {
    bail!("yaml output requires the `yaml` feature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfabError;
    use serde_json::json;
    use tempfile::TempDir;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value("3200"), json!(3200));
        assert_eq!(decode_value("true"), json!(true));
        assert_eq!(decode_value(r#"{"a": 1}"#), json!({"a": 1}));
        assert_eq!(decode_value("api"), json!("api"));
    }

    #[test]
    fn test_pipeline_order_and_freeze() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, r#"{"role": "file", "port": 1}"#).unwrap();

        let args = BuildArgs {
            json: vec![temp.path().join("missing.json"), file],
            set: vec![pair("role", "cli")],
            defaults: vec![pair("port", "3200"), pair("host", "localhost")],
            require: vec!["role".to_string()],
            ..Default::default()
        };
        let pipeline = args.pipeline().unwrap();
        assert_eq!(pipeline.len(), 5);

        let config = pipeline.run().unwrap();
        assert!(config.is_frozen());
        assert_eq!(config.get("role"), Some(&json!("cli")));
        assert_eq!(config.get("port"), Some(&json!(1)));
        assert_eq!(config.get("host"), Some(&json!("localhost")));
    }

    #[test]
    fn test_required_failure_surfaces() {
        let args = BuildArgs {
            require: vec!["secret".to_string()],
            ..Default::default()
        };
        let err = args.pipeline().unwrap().run().unwrap_err();
        assert!(matches!(err, ConfabError::Validation { .. }));
        assert!(args.execute().is_err());
    }

    #[test]
    fn test_render_json_and_path() {
        let config = Configuration::from_value(json!({"server": {"hosts": ["a", "b"]}})).unwrap();

        let all = render(config.clone(), OutputFormat::Json, None).unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&all).unwrap(),
            json!({"server": {"hosts": ["a", "b"]}})
        );

        let one = render(config.clone(), OutputFormat::Json, Some("server.hosts[1]")).unwrap();
        assert_eq!(one, r#""b""#);

        assert!(render(config, OutputFormat::Json, Some("server.port")).is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_render_yaml() {
        let config = Configuration::from_value(json!({"role": "api"})).unwrap();
        let out = render(config, OutputFormat::Yaml, None).unwrap();
        assert_eq!(out.trim(), "role: api");
    }
}
