//! Markup tree serialisation.
//!
//! [`MarkupRenderer`] is the seam between templates and HTML text. The
//! default [`HtmlRenderer`] writes email-client friendly XHTML-style markup:
//! a transitional doctype, escaped text, inline styles and self-closed void
//! elements.

use std::fmt;

use formgen_core::{Element, Node};
use thiserror::Error;

/// Doctype written before a root `<html>` element.
pub const XHTML_TRANSITIONAL_DOCTYPE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#;

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tag name that cannot be written.
    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    /// Attribute name that cannot be written.
    #[error("invalid attribute name {name:?} on <{tag}>")]
    InvalidAttribute { tag: String, name: String },

    /// Void element with children.
    #[error("void element <{0}> cannot have children")]
    VoidWithChildren(String),

    /// Comment text containing `--`.
    #[error("comment cannot contain \"--\": {0:?}")]
    InvalidComment(String),
}

/// Result type for rendering.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Options passed to a markup renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Break and indent element-only content.
    pub pretty: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Turns a markup tree into an HTML string.
pub trait MarkupRenderer: fmt::Debug + Send + Sync {
    /// Render `tree` to markup.
    fn render(&self, tree: &Node, options: &RenderOptions) -> Result<String>;
}

/// Default HTML renderer.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    doctype: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            doctype: XHTML_TRANSITIONAL_DOCTYPE.to_string(),
        }
    }
}

impl HtmlRenderer {
    /// Create a renderer with the XHTML transitional doctype.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different doctype line.
    #[must_use]
    pub fn with_doctype(mut self, doctype: impl Into<String>) -> Self {
        self.doctype = doctype.into();
        self
    }

    fn write_node(
        &self,
        out: &mut String,
        node: &Node,
        depth: usize,
        options: &RenderOptions,
    ) -> Result<()> {
        match node {
            Node::Element(el) => self.write_element(out, el, depth, options),
            Node::Text(text) => {
                out.push_str(&escape_text(text));
                Ok(())
            }
            Node::Raw(markup) => {
                out.push_str(markup);
                Ok(())
            }
            Node::Comment(text) => {
                if text.contains("--") {
                    return Err(RenderError::InvalidComment(text.clone()));
                }
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
                Ok(())
            }
        }
    }

    fn write_element(
        &self,
        out: &mut String,
        el: &Element,
        depth: usize,
        options: &RenderOptions,
    ) -> Result<()> {
        if !is_valid_name(el.tag()) {
            return Err(RenderError::InvalidTag(el.tag().to_string()));
        }

        out.push('<');
        out.push_str(el.tag());

        for (name, value) in el.attrs() {
            if !is_valid_name(name) || name == "style" {
                return Err(RenderError::InvalidAttribute {
                    tag: el.tag().to_string(),
                    name: name.clone(),
                });
            }
            push_attr(out, name, value);
        }

        if !el.inline_style().is_empty() {
            push_attr(out, "style", &el.inline_style().to_css());
        }

        if el.is_void() {
            if !el.child_nodes().is_empty() {
                return Err(RenderError::VoidWithChildren(el.tag().to_string()));
            }
            out.push_str(" />");
            return Ok(());
        }

        out.push('>');

        // Only element-only content is broken onto new lines; adding
        // whitespace next to text would change what is displayed.
        let break_lines = options.pretty
            && !el.child_nodes().is_empty()
            && el
                .child_nodes()
                .iter()
                .all(|c| matches!(c, Node::Element(_) | Node::Comment(_)));

        for child in el.child_nodes() {
            if break_lines {
                push_newline(out, depth + 1);
            }
            self.write_node(out, child, depth + 1, options)?;
        }

        if break_lines {
            push_newline(out, depth);
        }

        out.push_str("</");
        out.push_str(el.tag());
        out.push('>');
        Ok(())
    }
}

impl MarkupRenderer for HtmlRenderer {
    fn render(&self, tree: &Node, options: &RenderOptions) -> Result<String> {
        let mut out = String::new();

        let is_document = tree.as_element().is_some_and(|el| el.tag() == "html");
        if is_document && !self.doctype.is_empty() {
            out.push_str(&self.doctype);
            if options.pretty {
                out.push('\n');
            }
        }

        self.write_node(&mut out, tree, 0, options)?;

        if options.pretty {
            out.push('\n');
        }
        Ok(out)
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

fn push_newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Tag and attribute names: ASCII letter followed by letters, digits, `-`,
/// `_` or `:`.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

/// Escape text content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
