//! formgen Generator Library
//!
//! Turns declarative document templates into formatted HTML files.
//!
//! # Modules
//!
//! - [`template`] - Template units and the static template registry
//! - [`render`] - Markup tree to HTML serialisation
//! - [`format`] - HTML-aware pretty printer
//! - [`html`] - Rendering pipeline combining the two
//! - [`placeholder`] - `{{token}}` substitution for generated documents
//! - [`assets`] - Static asset (font) copying
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod format;
pub mod html;
pub mod placeholder;
pub mod render;
pub mod template;

pub use assets::{AssetManifest, AssetProcessor};
pub use build::{AssetOutcome, BuildReport, Builder, ShadowedEntry, WriteOutcome};
pub use format::{FormatOptions, HtmlFormatter, MarkupFormatter};
pub use html::Renderer;
pub use placeholder::PlaceholderContext;
pub use render::{HtmlRenderer, MarkupRenderer, RenderOptions};
pub use template::{TemplateParams, TemplateRegistry, TemplateUnit};
