//! Discover subcommand for confab CLI
//!
//! Prints what `build --discover` would search: the resolved context, the
//! candidate list for the chosen format and which file would be loaded.

use crate::environment::{Environment, ProcessEnv};
use crate::fs::{OsFileSystem, SharedFileSystem};
use crate::transforms::{DiscoveryContext, EnvFileOptions, load_env_config_file_with};
use clap::Args;
use std::fmt::Write;
use std::sync::Arc;

/// Arguments for the discover subcommand
#[derive(Args, Debug, Default)]
pub struct DiscoverArgs {
    /// Print only the file that would be loaded
    #[arg(long)]
    pub selected_only: bool,
}

impl DiscoverArgs {
    pub fn execute(&self) -> String {
        report(&ProcessEnv, Arc::new(OsFileSystem), self.selected_only)
    }
}

/// Describe the discovery search. Existing candidates are marked with `*`.
pub fn report(env: &dyn Environment, fs: SharedFileSystem, selected_only: bool) -> String {
    let options = EnvFileOptions::default();
    let context = DiscoveryContext::resolve(env, &options);
    let loader = load_env_config_file_with(env, fs.clone(), &options);
    let selected = loader.resolve().map(|p| p.display().to_string());

    if selected_only {
        return selected.unwrap_or_default();
    }

    let mut out = String::new();
    let _ = writeln!(out, "base_dir: {}", context.base_dir.display());
    let _ = writeln!(out, "app_env:  {}", context.app_env);
    let _ = writeln!(out, "hostname: {}", context.hostname.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "instance: {}", context.instance.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "format:   {}", loader.format());
    let _ = writeln!(out);
    for path in loader.candidates() {
        let mark = if fs.exists(path) { '*' } else { ' ' };
        let _ = writeln!(out, "{mark} {}", path.display());
    }
    let _ = writeln!(out);
    match selected {
        Some(path) => {
            let _ = writeln!(out, "selected: {path}");
        }
        None => {
            let _ = writeln!(out, "selected: none");
        }
    }
    out
}
