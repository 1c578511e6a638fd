//! Simple tabular layout with a single call-to-action button.

use formgen_core::{Element, Node, Style};
use formgen_generator::{TemplateParams, TemplateUnit};

use crate::components::{a4_page, body, button, data_table, head, heading, html, section, text};

/// Registry key and output file stem.
pub const NAME: &str = "table";

const TITLE: &str = "Summary";

const HEADERS: &[&str] = &["Item", "Quantity", "Status"];

const ROWS: &[&[&str]] = &[
    &["Consent forms", "12", "Signed"],
    &["Identity checks", "12", "Verified"],
    &["Follow-up calls", "3", "Pending"],
];

/// Template unit for the registry.
#[must_use]
pub fn unit() -> TemplateUnit {
    TemplateUnit::new(NAME, view)
}

/// Build the table page.
pub fn view(params: &TemplateParams) -> Node {
    let page = a4_page().with("padding", "2cm");

    html(&params.lang)
        .child(head(TITLE, ""))
        .child(
            body(&Style::new().with("margin", "0").with("font-family", "sans-serif")).child(
                section(&page)
                    .child(heading(2, TITLE))
                    .child(text("Current status of the submitted documents."))
                    .child(data_table(HEADERS, ROWS))
                    .child(
                        Element::new("div")
                            .style(&Style::new().with("margin-top", "24px"))
                            .child(button(&params.url, "Click")),
                    ),
            ),
        )
        .into()
}
