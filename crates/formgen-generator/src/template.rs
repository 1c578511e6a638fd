//! Template units and the template registry.
//!
//! A template unit pairs an output name with a view function that builds a
//! markup tree from fixed [`TemplateParams`]. The registry is populated once
//! at startup and keeps registration order, which is also the build order.

use std::path::{Path, PathBuf};

use formgen_core::{Config, Node};
use thiserror::Error;

/// Template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Template name cannot be used as a file name.
    #[error("invalid template name: {0:?}")]
    InvalidName(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// View function of a template unit.
pub type ViewFn = fn(&TemplateParams) -> Node;

/// Fixed parameters every template is instantiated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParams {
    /// URL used by buttons and links.
    pub url: String,

    /// Document language.
    pub lang: String,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            url: "https://example.com".to_string(),
            lang: "en".to_string(),
        }
    }
}

impl TemplateParams {
    /// Build parameters from the `[templates]` configuration section.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.templates.url.clone(),
            lang: config.templates.lang.clone(),
        }
    }

    /// Override the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// A named, statically defined template.
#[derive(Debug, Clone)]
pub struct TemplateUnit {
    name: String,
    view: ViewFn,
}

impl TemplateUnit {
    /// Create a template unit.
    #[must_use]
    pub fn new(name: impl Into<String>, view: ViewFn) -> Self {
        Self {
            name: name.into(),
            view,
        }
    }

    /// Output name of the template.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the markup tree.
    #[must_use]
    pub fn view(&self, params: &TemplateParams) -> Node {
        (self.view)(params)
    }

    /// File name of the generated document.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.html", self.name)
    }

    /// Path of the generated document inside `output_dir`.
    #[must_use]
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.file_name())
    }

    /// Check that the name is a plain file stem.
    pub fn validate(&self) -> Result<()> {
        let valid = !self.name.is_empty()
            && self.name != "."
            && self.name != ".."
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if valid {
            Ok(())
        } else {
            Err(TemplateError::InvalidName(self.name.clone()))
        }
    }
}

/// Ordered registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<(String, TemplateUnit)>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `key`.
    ///
    /// Registering an existing key replaces the unit but keeps its position.
    pub fn register(&mut self, key: impl Into<String>, unit: TemplateUnit) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = unit,
            None => self.entries.push((key, unit)),
        }
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, unit: TemplateUnit) -> Self {
        self.register(key, unit);
        self
    }

    /// Get a template by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TemplateUnit> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, unit)| unit)
    }

    /// Get a template by key or fail with [`TemplateError::NotFound`].
    pub fn lookup(&self, key: &str) -> Result<&TemplateUnit> {
        self.get(key)
            .ok_or_else(|| TemplateError::NotFound(key.to_string()))
    }

    /// Iterate over `(key, unit)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateUnit)> {
        self.entries.iter().map(|(k, unit)| (k.as_str(), unit))
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of registered templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
