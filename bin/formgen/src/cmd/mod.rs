//! Subcommand implementations.

pub mod build;
pub mod check;
pub mod fill;
pub mod list;
pub mod render;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use formgen_core::Config;

/// Load the configuration file, falling back to defaults when it is absent.
///
/// `FORMGEN__*` environment variables override file values.
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        tracing::info!(path = %config_path.display(), "no configuration file, using defaults");
    }
    Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))
}
