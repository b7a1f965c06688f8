//! Config-file discovery by host, environment and instance naming convention.
//!
//! Given a base directory, a hostname, an app environment and an optional
//! instance id, candidate base names are tried from most to least specific:
//!
//! 1. `{host}-{env}-{instance}`
//! 2. `{host}-{instance}`
//! 3. `{host}-{env}`
//! 4. `{host}`
//! 5. `{env}-{instance}`
//! 6. `{env}`
//! 7. `default`
//!
//! Entries 1-2 need both host and instance, 3-4 need a host, 5 needs an
//! instance. Each base name yields `name.json`, `name.yaml` and `name.yml`.
//! If any JSON candidate exists the search runs over the JSON list, otherwise
//! over the YAML list.

use crate::environment::{Environment, ProcessEnv};
use crate::fs::{FileSystem, OsFileSystem, SharedFileSystem};
use crate::transforms::load::{FileLoader, Format};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Environment variable names consulted by [`load_env_config_file`].
#[derive(Debug, Clone)]
pub struct EnvFileOptions {
    /// Base directory override. Defaults to `./config`.
    pub config_dir_var: String,
    /// Application instance id.
    pub instance_var: String,
    /// Application environment name. Defaults to `development`.
    pub env_var: String,
    /// Hostname overrides, checked in order before the OS hostname.
    pub hostname_vars: Vec<String>,
}

impl Default for EnvFileOptions {
    fn default() -> Self {
        Self {
            config_dir_var: "APP_CONFIG_DIR".to_string(),
            instance_var: "APP_INSTANCE".to_string(),
            env_var: "APP_ENV".to_string(),
            hostname_vars: vec!["HOST".to_string(), "HOSTNAME".to_string()],
        }
    }
}

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_APP_ENV: &str = "development";

/// Values resolved from the environment when the transform is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryContext {
    pub base_dir: PathBuf,
    pub instance: Option<String>,
    pub app_env: String,
    pub hostname: Option<String>,
}

impl DiscoveryContext {
    /// Resolve the context. Empty variables count as unset.
    pub fn resolve(env: &dyn Environment, options: &EnvFileOptions) -> Self {
        let base_dir = env
            .non_empty_var(&options.config_dir_var)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".").join(DEFAULT_CONFIG_DIR));
        let instance = env.non_empty_var(&options.instance_var);
        let app_env = env
            .non_empty_var(&options.env_var)
            .unwrap_or_else(|| DEFAULT_APP_ENV.to_string());
        let hostname = options
            .hostname_vars
            .iter()
            .find_map(|name| env.non_empty_var(name))
            .or_else(|| env.hostname());

        Self {
            base_dir,
            instance,
            app_env,
            hostname,
        }
    }

    /// Candidate base names, most specific first.
    pub fn base_names(&self) -> Vec<String> {
        let env = self.app_env.as_str();
        let mut names = Vec::with_capacity(7);

        if let (Some(host), Some(instance)) = (&self.hostname, &self.instance) {
            names.push(format!("{host}-{env}-{instance}"));
            names.push(format!("{host}-{instance}"));
        }
        if let Some(host) = &self.hostname {
            names.push(format!("{host}-{env}"));
            names.push(host.clone());
        }
        if let Some(instance) = &self.instance {
            names.push(format!("{env}-{instance}"));
        }
        names.push(env.to_string());
        names.push("default".to_string());
        names
    }

    pub fn json_candidates(&self) -> Vec<PathBuf> {
        self.base_names()
            .iter()
            .map(|name| self.base_dir.join(format!("{name}.json")))
            .collect()
    }

    pub fn yaml_candidates(&self) -> Vec<PathBuf> {
        self.base_names()
            .iter()
            .flat_map(|name| {
                [
                    self.base_dir.join(format!("{name}.yaml")),
                    self.base_dir.join(format!("{name}.yml")),
                ]
            })
            .collect()
    }
}

/// Build the discovery transform from the process environment and the real
/// filesystem.
///
/// The environment is read and JSON-vs-YAML is decided here, once; the
/// returned loader then behaves like [`load_json`](super::load_json) or
/// [`load_yaml`](super::load_yaml) over the candidate list.
pub fn load_env_config_file() -> FileLoader {
    load_env_config_file_with(&ProcessEnv, Arc::new(OsFileSystem), &EnvFileOptions::default())
}

/// [`load_env_config_file`] with injected environment, filesystem and
/// variable names.
pub fn load_env_config_file_with(
    env: &dyn Environment,
    fs: SharedFileSystem,
    options: &EnvFileOptions,
) -> FileLoader {
    let context = DiscoveryContext::resolve(env, options);
    debug!(
        base_dir = %context.base_dir.display(),
        app_env = %context.app_env,
        hostname = ?context.hostname,
        instance = ?context.instance,
        "discovering config files"
    );

    let json = context.json_candidates();
    if has_any(&*fs, &json) {
        FileLoader::new(json, Format::Json).with_filesystem(fs)
    } else {
        FileLoader::new(context.yaml_candidates(), Format::Yaml).with_filesystem(fs)
    }
}

fn has_any(fs: &dyn FileSystem, paths: &[PathBuf]) -> bool {
    paths.iter().any(|path| fs.exists(path))
}
