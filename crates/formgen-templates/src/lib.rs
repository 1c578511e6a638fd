//! formgen Templates
//!
//! Document components and the built-in templates.
//!
//! # Components
//!
//! - [`components`] - `html`, `head`, `section`, `button`, `data_table`, ...
//!
//! # Templates
//!
//! - [`pdf`] - A4 consent form with `{{token}}` placeholders
//! - [`table`] - A4 table layout with a call-to-action button
//!
//! # Example
//!
//! ```no_run
//! use formgen_generator::{Renderer, TemplateParams};
//!
//! let registry = formgen_templates::registry();
//! let unit = registry.get("table").unwrap();
//! let html = Renderer::new().render(unit, &TemplateParams::default()).unwrap();
//! println!("{html}");
//! ```

pub mod components;
pub mod pdf;
pub mod table;

use formgen_generator::TemplateRegistry;

/// Registry of the built-in templates, in build order.
#[must_use]
pub fn registry() -> TemplateRegistry {
    TemplateRegistry::new()
        .with(pdf::NAME, pdf::unit())
        .with(table::NAME, table::unit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contents() {
        let registry = registry();
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["pdf", "table"]);
        for (key, unit) in registry.iter() {
            assert_eq!(key, unit.name());
            assert!(unit.validate().is_ok());
        }
    }
}
