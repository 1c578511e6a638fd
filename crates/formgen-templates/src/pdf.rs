//! Informed consent form laid out on an A4 page.
//!
//! Personal details are left as `{{token}}` placeholders for a later
//! substitution step (see [`formgen_generator::placeholder::fill`]).

use formgen_core::{Element, Node, Style};
use formgen_generator::{TemplateParams, TemplateUnit};

use crate::components::{
    a4_page, body, field_row, font_face, head, heading, hr, html, link, section, table, text,
};

/// Registry key and output file stem.
pub const NAME: &str = "pdf";

/// Placeholder tokens, in document order. Each appears exactly once.
pub const PLACEHOLDERS: &[&str] = &[
    "name",
    "nik",
    "gender",
    "email",
    "address",
    "date",
    "name_signed",
];

const TITLE: &str = "Informed Consent Form";

const FIELDS: &[(&str, &str)] = &[
    ("Full name", "name"),
    ("National ID (NIK)", "nik"),
    ("Gender", "gender"),
    ("Email", "email"),
    ("Address", "address"),
];

const STATEMENTS: &[&str] = &[
    "I confirm that the purpose, procedures and possible risks of the activity described in this form have been explained to me and that I had the opportunity to ask questions.",
    "I understand that my participation is voluntary and that I may withdraw at any time without giving a reason.",
    "I agree that the personal data above is processed only for the purpose stated in this form.",
];

/// Template unit for the registry.
#[must_use]
pub fn unit() -> TemplateUnit {
    TemplateUnit::new(NAME, view)
}

fn token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

fn stylesheet() -> String {
    let mut css = font_face("Inter", "Inter-Regular.ttf", 400);
    css.push_str(&font_face("Inter", "Inter-Bold.ttf", 700));
    css.push_str("@page {\n  size: A4;\n  margin: 0;\n}\n");
    css
}

/// Build the consent form.
pub fn view(params: &TemplateParams) -> Node {
    let page = a4_page()
        .with("padding", "2cm")
        .with("background-color", "#ffffff");

    let fields = table()
        .style(&Style::new().with("margin", "16px 0"))
        .child(
            Element::new("tbody").children(
                FIELDS
                    .iter()
                    .map(|(label, key)| field_row(label, &token(key))),
            ),
        );

    let signature = Element::new("div")
        .style(&Style::new().with("margin-top", "48px").with("text-align", "right"))
        .child(text(&format!("Signed on {}", token("date"))))
        .child(
            Element::new("div")
                .style(&Style::new().with("height", "80px"))
                .child(Node::comment(" signature ")),
        )
        .child(text(&format!("({})", token("name_signed"))));

    let footer = Element::new("div")
        .style(
            &Style::new()
                .with("font-size", "12px")
                .with("color", "#6b7280"),
        )
        .child(hr())
        .child(
            Element::new("p")
                .text("This document can be verified at ")
                .child(link(&params.url, &params.url)),
        );

    html(&params.lang)
        .child(head(TITLE, &stylesheet()))
        .child(
            body(
                &Style::new()
                    .with("margin", "0")
                    .with("font-family", "'Inter', sans-serif")
                    .with("color", "#111827"),
            )
            .child(
                section(&page)
                    .child(heading(1, TITLE))
                    .child(text("The undersigned:"))
                    .child(fields)
                    .children(STATEMENTS.iter().map(|s| text(s)))
                    .child(signature)
                    .child(footer),
            ),
        )
        .into()
}
