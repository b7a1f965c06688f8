//! Standard transforms.
//!
//! Each factory returns a value implementing [`Transform`](crate::Transform)
//! that holds its parameters as plain data:
//!
//! - [`load_json`], [`load_yaml`] - first existing candidate file, filling
//!   keys not already set
//! - [`load_env_config_file`] - file discovery by host/env/instance naming
//! - [`load_environment`] - copy set environment variables into keys
//! - [`assign`], [`merge`] - shallow and deep merges that override keys
//! - [`defaults`] - fill absent keys
//! - [`required`] - fail on missing or falsy fields
//! - [`freeze`] - make the result read-only

mod defaults;
mod env_file;
mod env_map;
mod freeze;
mod load;
mod merge;
mod required;

pub use defaults::{Defaults, defaults};
pub use env_file::{
    DEFAULT_APP_ENV, DEFAULT_CONFIG_DIR, DiscoveryContext, EnvFileOptions, load_env_config_file,
    load_env_config_file_with,
};
#[allow(deprecated)]
pub use env_map::map_environment;
pub use env_map::{EnvMapper, EnvOptions, load_environment, load_environment_with};
pub use freeze::{Freeze, freeze};
pub use load::{Candidates, FileLoader, Format, load_json, load_yaml, yaml_available};
pub use merge::{Merge, assign, deep_merge, merge};
pub use required::{Required, required};
