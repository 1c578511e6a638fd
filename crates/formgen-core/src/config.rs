//! Generator configuration management.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for formgen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Parameters shared by every template.
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Markup formatting settings.
    #[serde(default)]
    pub format: FormatConfig,
}

/// Build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Source directory of static assets (fonts). `None` disables the copy.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: Option<String>,

    /// Destination of the asset copy, relative to `output_dir`.
    #[serde(default = "default_assets_dest")]
    pub assets_dest: String,

    /// Whether to wipe the output directory before building.
    #[serde(default = "default_true")]
    pub clean: bool,
}

/// Template parameter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// URL baked into every template (buttons, verification links).
    #[serde(default = "default_url")]
    pub url: String,

    /// Document language attribute.
    #[serde(default = "default_lang")]
    pub lang: String,
}

/// Formatter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Ask the markup renderer for indented output before formatting.
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Spaces per indentation level.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// How whitespace between elements is treated.
    #[serde(default)]
    pub whitespace: WhitespaceSensitivity,
}

/// Whitespace handling of the HTML formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespaceSensitivity {
    /// Respect the CSS `display` of each element: inline content stays on
    /// one line, block elements get their own lines.
    #[default]
    Css,

    /// Treat every element as a block.
    Ignore,
}

// Default value functions
fn default_output_dir() -> String {
    "__generated__".to_string()
}

fn default_assets_dir() -> Option<String> {
    Some("assets/fonts".to_string())
}

fn default_assets_dest() -> String {
    "fonts".to_string()
}

fn default_url() -> String {
    "https://example.com".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_indent_width() -> usize {
    2
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            assets_dir: default_assets_dir(),
            assets_dest: default_assets_dest(),
            clean: true,
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            lang: default_lang(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent_width: default_indent_width(),
            whitespace: WhitespaceSensitivity::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration if the file exists, falling back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration using the config crate, with `FORMGEN__*`
    /// environment overrides (e.g. `FORMGEN__BUILD__OUTPUT_DIR`).
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("FORMGEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.build.output_dir.trim().is_empty() {
            return Err(CoreError::config("build.output_dir cannot be empty"));
        }

        if self.build.assets_dest.trim().is_empty() {
            return Err(CoreError::config("build.assets_dest cannot be empty"));
        }

        // Must stay inside output_dir.
        let dest = Path::new(&self.build.assets_dest);
        if dest.is_absolute()
            || dest
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(CoreError::config(format!(
                "build.assets_dest must be a relative path inside output_dir, got {:?}",
                self.build.assets_dest
            )));
        }

        if !(1..=8).contains(&self.format.indent_width) {
            return Err(CoreError::config(format!(
                "format.indent_width must be between 1 and 8, got {}",
                self.format.indent_width
            )));
        }

        if self.templates.url.is_empty() {
            return Err(CoreError::config("templates.url cannot be empty"));
        }

        if self.templates.url.ends_with('/') {
            tracing::warn!("templates.url should not have a trailing slash");
        }

        Ok(())
    }

    /// Output directory as a path.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.build.output_dir)
    }

    /// Asset source directory, if the copy is enabled.
    #[must_use]
    pub fn assets_dir(&self) -> Option<PathBuf> {
        self.build.assets_dir.as_ref().map(PathBuf::from)
    }

    /// Destination of the asset copy inside the output directory.
    #[must_use]
    pub fn assets_dest(&self) -> PathBuf {
        self.output_dir().join(&self.build.assets_dest)
    }
}
