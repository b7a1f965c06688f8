//! Process environment access.
//!
//! Transforms that consult environment variables or the hostname take an
//! [`Environment`] so tests can supply a fixed snapshot instead of touching
//! the real process environment.

use std::collections::HashMap;
use std::env::VarError;
use std::sync::Arc;
use tracing::debug;

/// Read-only view of environment variables and the host name.
pub trait Environment {
    /// Value of `name`, or `None` if unset.
    fn var(&self, name: &str) -> Option<String>;

    /// Host name as reported by the operating system.
    fn hostname(&self) -> Option<String>;

    /// Value of `name` if set to a non-empty string.
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.is_empty())
    }
}

/// Shared handle used by transforms that keep an environment around.
pub type SharedEnvironment = Arc<dyn Environment + Send + Sync>;

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        decode_var(name, std::env::var(name))
    }

    fn hostname(&self) -> Option<String> {
        os_hostname()
    }
}

/// A set variable that is not valid unicode is kept, with invalid sequences
/// replaced by U+FFFD.
fn decode_var(name: &str, value: Result<String, VarError>) -> Option<String> {
    match value {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            debug!(var = name, "environment variable is not valid unicode; decoding lossily");
            Some(raw.to_string_lossy().into_owned())
        }
    }
}

#[cfg(unix)]
fn os_hostname() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
}

#[cfg(not(unix))]
fn os_hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok().filter(|name| !name.is_empty())
}

/// Fixed in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
    hostname: Option<String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            hostname: None,
        }
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn hostname(&self) -> Option<String> {
        self.hostname.clone()
    }
}
