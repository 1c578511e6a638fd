//! Render command - prints one template as formatted HTML

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use formgen_generator::{Renderer, TemplateParams};

use super::load_config;

/// Render a single template to a string.
pub fn render(config_path: &Path, name: &str, url: Option<&str>) -> Result<String> {
    let config = load_config(config_path)?;
    let registry = formgen_templates::registry();
    let unit = registry.lookup(name)?;

    let mut params = TemplateParams::from_config(&config);
    if let Some(url) = url {
        params = params.with_url(url);
    }

    Renderer::from_config(&config)
        .render(unit, &params)
        .wrap_err_with(|| format!("Failed to render template '{name}'"))
}

/// Run the render command.
pub fn run(config_path: &Path, name: &str, url: Option<&str>) -> Result<()> {
    tracing::info!(name, ?url, "Rendering template");
    print!("{}", render(config_path, name, url)?);
    Ok(())
}
