//! Rendering pipeline.
//!
//! [`Renderer`] turns a template unit into formatted HTML in two passes: the
//! markup renderer serialises the tree, then the formatter pretty-prints the
//! result. Both passes are injected so the build can run against fakes.

use formgen_core::{Config, Node};
use thiserror::Error;
use tracing::trace;

use crate::{
    format::{FormatError, FormatOptions, HtmlFormatter, MarkupFormatter},
    render::{HtmlRenderer, MarkupRenderer, RenderError, RenderOptions},
    template::{TemplateParams, TemplateUnit},
};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Tree serialisation failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The formatter rejected the rendered markup.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Template unit to formatted HTML.
#[derive(Debug)]
pub struct Renderer {
    markup: Box<dyn MarkupRenderer>,
    formatter: Box<dyn MarkupFormatter>,
    options: RenderOptions,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer with the default HTML renderer and formatter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            markup: Box::new(HtmlRenderer::new()),
            formatter: Box::new(HtmlFormatter::default()),
            options: RenderOptions::default(),
        }
    }

    /// Create a renderer configured from the `[format]` section.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            markup: Box::new(HtmlRenderer::new()),
            formatter: Box::new(HtmlFormatter::new(FormatOptions::from(&config.format))),
            options: RenderOptions {
                pretty: config.format.pretty,
            },
        }
    }

    /// Replace the markup renderer.
    #[must_use]
    pub fn with_markup_renderer(mut self, markup: impl MarkupRenderer + 'static) -> Self {
        self.markup = Box::new(markup);
        self
    }

    /// Replace the formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl MarkupFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Set the options passed to the markup renderer.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render a template unit.
    pub fn render(&self, unit: &TemplateUnit, params: &TemplateParams) -> Result<String> {
        trace!(template = unit.name(), "rendering template");
        self.render_tree(&unit.view(params))
    }

    /// Render and format a markup tree.
    pub fn render_tree(&self, tree: &Node) -> Result<String> {
        let raw = self.markup.render(tree, &self.options)?;
        Ok(self.formatter.format(&raw)?)
    }
}
