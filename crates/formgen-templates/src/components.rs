//! Document components.
//!
//! Small building blocks in the style of email component libraries. Each
//! returns an [`Element`] that callers extend with `.child(..)`, `.style(..)`
//! and `.attr(..)`.

use formgen_core::{Element, Node, Style};

/// Directory, relative to the generated documents, that holds the fonts.
pub const FONT_DIR: &str = "fonts";

/// `<html>` root.
#[must_use]
pub fn html(lang: &str) -> Element {
    Element::new("html").attr("lang", lang).attr("dir", "ltr")
}

/// `<head>` with content type, viewport, title and an optional stylesheet.
#[must_use]
pub fn head(title: &str, css: &str) -> Element {
    let head = Element::new("head")
        .child(
            Element::new("meta")
                .attr("content", "text/html; charset=UTF-8")
                .attr("http-equiv", "Content-Type"),
        )
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(Element::new("title").text(title));

    if css.trim().is_empty() {
        head
    } else {
        head.child(Element::new("style").child(Node::raw(css)))
    }
}

/// `<body>` with the given style.
#[must_use]
pub fn body(style: &Style) -> Element {
    Element::new("body").style(style)
}

/// `<section>` with the given style.
#[must_use]
pub fn section(style: &Style) -> Element {
    Element::new("section").style(style)
}

/// A4 page box.
#[must_use]
pub fn a4_page() -> Style {
    Style::new()
        .with("width", "21cm")
        .with("height", "29.7cm")
        .with("box-sizing", "border-box")
}

/// `<h1>`..`<h6>`; out-of-range levels are clamped.
#[must_use]
pub fn heading(level: u8, text: &str) -> Element {
    let level = level.clamp(1, 6);
    Element::new(format!("h{level}"))
        .style(&Style::new().with("margin", "0 0 12px"))
        .text(text)
}

/// Paragraph with the default body text style.
#[must_use]
pub fn text(content: &str) -> Element {
    Element::new("p")
        .style(
            &Style::new()
                .with("font-size", "14px")
                .with("line-height", "24px")
                .with("margin", "16px 0"),
        )
        .text(content)
}

/// Call-to-action link styled as a button.
#[must_use]
pub fn button(href: &str, label: &str) -> Element {
    Element::new("a")
        .attr("href", href)
        .attr("target", "_blank")
        .style(
            &Style::new()
                .with("line-height", "100%")
                .with("text-decoration", "none")
                .with("display", "inline-block")
                .with("max-width", "100%")
                .with("padding", "12px 20px")
                .with("background-color", "#1f2937")
                .with("color", "#ffffff")
                .with("border-radius", "4px"),
        )
        .text(label)
}

/// Plain hyperlink.
#[must_use]
pub fn link(href: &str, label: &str) -> Element {
    Element::new("a")
        .attr("href", href)
        .attr("target", "_blank")
        .style(&Style::new().with("color", "#2563eb"))
        .text(label)
}

/// Horizontal rule.
#[must_use]
pub fn hr() -> Element {
    Element::new("hr").style(
        &Style::new()
            .with("width", "100%")
            .with("border", "none")
            .with("border-top", "1px solid #eaeaea"),
    )
}

/// Full-width layout table with collapsed borders.
#[must_use]
pub fn table() -> Element {
    Element::new("table")
        .attr("width", "100%")
        .attr("cellpadding", "0")
        .attr("cellspacing", "0")
        .attr("role", "presentation")
        .style(&Style::new().with("border-collapse", "collapse"))
}

/// Label/value row of a form table.
#[must_use]
pub fn field_row(label: &str, value: &str) -> Element {
    let cell = Style::new()
        .with("padding", "6px 8px")
        .with("border-bottom", "1px solid #eaeaea")
        .with("font-size", "14px");

    Element::new("tr")
        .child(
            Element::new("th")
                .attr("align", "left")
                .style(&cell)
                .style(&Style::new().with("width", "30%").with("font-weight", "600"))
                .text(label),
        )
        .child(Element::new("td").style(&cell).text(value))
}

/// Table with a header row and data rows.
#[must_use]
pub fn data_table(headers: &[&str], rows: &[&[&str]]) -> Element {
    let cell = Style::new()
        .with("padding", "8px")
        .with("border", "1px solid #d1d5db")
        .with("font-size", "14px");
    let header_cell = cell.clone().with("background-color", "#f3f4f6");

    let head = Element::new("thead").child(Element::new("tr").children(
        headers.iter().map(|h| {
            Element::new("th")
                .attr("align", "left")
                .style(&header_cell)
                .text(*h)
        }),
    ));

    let body = Element::new("tbody").children(rows.iter().map(|row| {
        Element::new("tr").children(
            row.iter()
                .map(|value| Element::new("td").style(&cell).text(*value)),
        )
    }));

    table().child(head).child(body)
}

/// `@font-face` rule for a font shipped in [`FONT_DIR`].
#[must_use]
pub fn font_face(family: &str, file: &str, weight: u16) -> String {
    let format = match file.rsplit('.').next() {
        Some("woff2") => "woff2",
        Some("woff") => "woff",
        Some("otf") => "opentype",
        _ => "truetype",
    };

    format!(
        "@font-face {{\n  font-family: '{family}';\n  src: url('{FONT_DIR}/{file}') format('{format}');\n  font-weight: {weight};\n  font-style: normal;\n}}\n"
    )
}
