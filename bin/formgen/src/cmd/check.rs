//! Check command - validate configuration, assets and templates

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use formgen_core::Config;
use formgen_generator::{Renderer, TemplateParams, placeholder};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration, the asset directory and that every template
/// renders and formats.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and templates");

    let result = validate(config_path);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn validate(config_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    if !config_path.exists() {
        result.add_warning(format!(
            "Configuration file {} not found, using defaults",
            config_path.display()
        ));
    }
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            return result;
        }
    };

    println!("\nChecking configuration values...");
    check_config_values(&config, &mut result);

    println!("\nChecking assets...");
    check_assets(&config, &mut result);

    println!("\nChecking templates...");
    check_templates(&config, &mut result);

    result
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    let url = &config.templates.url;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        result.add_warning("templates.url should start with http:// or https://");
    }
    if url.ends_with('/') {
        result.add_warning("templates.url should not have a trailing slash");
    }

    let output = config.output_dir();
    if output.exists() && !output.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            output.display()
        ));
    }

    println!("  ✓ Configuration values checked");
}

/// Check that the asset directory exists and contains fonts.
fn check_assets(config: &Config, result: &mut ValidationResult) {
    let Some(dir) = config.assets_dir() else {
        println!("  ✓ Asset copy disabled");
        return;
    };

    if !dir.is_dir() {
        result.add_warning(format!("Asset directory missing: {}", dir.display()));
        println!("  ⚠ {} missing", dir.display());
        return;
    }

    let fonts = walkdir::WalkDir::new(&dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "ttf" | "otf" | "woff" | "woff2"))
        })
        .count();

    if fonts == 0 {
        result.add_warning(format!("No font files found in {}", dir.display()));
        println!("  ⚠ no fonts in {}", dir.display());
    } else {
        println!("  ✓ {fonts} font file(s) in {}", dir.display());
    }
}

/// Render and format every registered template.
fn check_templates(config: &Config, result: &mut ValidationResult) {
    let registry = formgen_templates::registry();
    let renderer = Renderer::from_config(config);
    let params = TemplateParams::from_config(config);
    let mut failed = 0;

    for (key, unit) in registry.iter() {
        if let Err(e) = unit.validate() {
            result.add_error(format!("{key}: {e}"));
            failed += 1;
            continue;
        }

        match renderer.render(unit, &params) {
            Ok(html) => {
                let tokens = placeholder::placeholders(&html);
                if tokens.is_empty() {
                    println!("  ✓ {key} -> {}", unit.file_name());
                } else {
                    println!(
                        "  ✓ {key} -> {} (placeholders: {})",
                        unit.file_name(),
                        tokens.join(", ")
                    );
                }
            }
            Err(e) => {
                result.add_error(format!("{key}: {e}"));
                failed += 1;
            }
        }
    }

    if failed == 0 {
        println!("  ✓ All {} templates render", registry.len());
    } else {
        println!("  ✗ {failed}/{} templates failed", registry.len());
    }
}
