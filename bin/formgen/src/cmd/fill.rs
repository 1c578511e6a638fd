//! Fill command - renders a template and substitutes its placeholders

use std::{fs, path::Path};

use color_eyre::eyre::{Result, WrapErr, eyre};
use formgen_generator::{PlaceholderContext, placeholder};

use super::render::render;

/// Parse a `key=value` pair.
pub fn parse_var(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| eyre!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(eyre!("empty variable name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Render `name` and fill its placeholders from `vars`.
pub fn fill(config_path: &Path, name: &str, vars: &[(String, String)]) -> Result<String> {
    let html = render(config_path, name, None)?;
    let context: PlaceholderContext = vars.iter().cloned().collect();
    placeholder::fill(&html, &context)
        .wrap_err_with(|| format!("Failed to fill template '{name}'"))
}

/// Run the fill command.
pub fn run(
    config_path: &Path,
    name: &str,
    vars: &[(String, String)],
    output: Option<&Path>,
) -> Result<()> {
    tracing::info!(name, vars = vars.len(), ?output, "Filling template");
    let filled = fill(config_path, name, vars)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, filled)
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            println!("  ✓ Wrote {}", path.display());
        }
        None => print!("{filled}"),
    }

    Ok(())
}
