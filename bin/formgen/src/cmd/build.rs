//! Build command - renders every template into the output directory

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr, bail};
use formgen_core::Config;
use formgen_generator::{BuildReport, Builder};

use super::load_config;

/// Command-line overrides for a build.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    /// Output directory.
    pub output: Option<PathBuf>,
    /// Asset (font) source directory.
    pub assets: Option<PathBuf>,
    /// URL baked into the templates.
    pub url: Option<String>,
    /// Keep existing files in the output directory.
    pub no_clean: bool,
}

impl BuildArgs {
    /// Apply the overrides to a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref output) = self.output {
            config.build.output_dir = output.to_string_lossy().to_string();
        }
        if let Some(ref assets) = self.assets {
            config.build.assets_dir = Some(assets.to_string_lossy().to_string());
        }
        if let Some(ref url) = self.url {
            tracing::info!(url = url.as_str(), "Overriding template URL from CLI");
            config.templates.url = url.clone();
        }
        if self.no_clean {
            config.build.clean = false;
        }
    }
}

/// Run the build command.
pub fn run(config_path: &Path, args: &BuildArgs) -> Result<BuildReport> {
    let start = Instant::now();
    tracing::info!(?config_path, ?args, "Starting build");

    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    config.validate().wrap_err("Invalid configuration")?;

    tracing::debug!(?config, "Loaded configuration");

    let output = config.output_dir();
    let builder = Builder::new(config, formgen_templates::registry());
    let report = builder.build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Documents:  {}", report.written());
    println!("  Assets:     {}", report.assets_copied());
    if !report.shadowed.is_empty() {
        println!("  Shadowed:   {}", report.shadowed.len());
    }
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output.display());
    println!();

    if !report.is_success() {
        println!("  Failures:");
        for failure in report.failures() {
            println!("  ✗ {failure}");
        }
        println!();
        bail!("Build finished with {} failure(s)", report.failures().len());
    }

    println!("  Build completed successfully!");
    println!();
    tracing::info!(?duration, "Build completed successfully");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let args = BuildArgs {
            output: Some(PathBuf::from("dist")),
            assets: Some(PathBuf::from("static/fonts")),
            url: Some("https://forms.test".to_string()),
            no_clean: true,
        };
        args.apply(&mut config);

        assert_eq!(config.build.output_dir, "dist");
        assert_eq!(config.build.assets_dir.as_deref(), Some("static/fonts"));
        assert_eq!(config.templates.url, "https://forms.test");
        assert!(!config.build.clean);
    }

    #[test]
    fn test_apply_keeps_config_without_overrides() {
        let mut config = Config::default();
        BuildArgs::default().apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_run_writes_documents() {
        let dir = TempDir::new().unwrap();
        let fonts = dir.path().join("fonts");
        fs::create_dir_all(&fonts).unwrap();
        fs::write(fonts.join("Inter-Regular.ttf"), b"ttf").unwrap();

        let args = BuildArgs {
            output: Some(dir.path().join("out")),
            assets: Some(fonts),
            ..BuildArgs::default()
        };
        let report = run(&dir.path().join("missing.toml"), &args).unwrap();

        assert_eq!(report.written(), 2);
        assert!(dir.path().join("out/pdf.html").is_file());
        assert!(dir.path().join("out/table.html").is_file());
        assert!(dir.path().join("out/fonts/Inter-Regular.ttf").is_file());
    }

    #[test]
    fn test_run_fails_on_missing_assets() {
        let dir = TempDir::new().unwrap();
        let args = BuildArgs {
            output: Some(dir.path().join("out")),
            assets: Some(dir.path().join("nope")),
            ..BuildArgs::default()
        };

        assert!(run(&dir.path().join("missing.toml"), &args).is_err());
        assert!(dir.path().join("out/pdf.html").is_file());
    }
}
