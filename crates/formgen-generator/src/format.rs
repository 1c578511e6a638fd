//! HTML-aware pretty printer.
//!
//! [`HtmlFormatter`] re-parses rendered markup with `quick-xml` and prints it
//! with one block element per line. With [`WhitespaceSensitivity::Css`],
//! inline elements (`a`, `span`, `strong`, ...) and the text around them stay
//! on a single line so no whitespace that CSS would display is added or
//! removed; only collapsible runs are normalised to one space.
//!
//! Formatting is idempotent: formatting already formatted output returns it
//! unchanged.

use std::fmt;

use formgen_core::{WhitespaceSensitivity, config::FormatConfig, markup::is_void_element};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use thiserror::Error;

/// Elements laid out inline by default.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "button", "cite", "code", "data", "dfn", "em", "font",
    "i", "img", "input", "kbd", "label", "mark", "q", "s", "samp", "select", "small", "span",
    "strong", "sub", "sup", "time", "u", "var", "wbr",
];

/// Elements whose text is re-indented line by line.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose content is kept byte for byte.
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Formatting errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The markup could not be tokenised.
    #[error("syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    /// A closing tag without a matching opening tag.
    #[error("unexpected closing tag </{name}> at byte {position}")]
    UnexpectedClose { name: String, position: u64 },

    /// A closing tag that does not match the innermost open element.
    #[error("expected </{expected}> but found </{found}> at byte {position}")]
    MismatchedClose {
        expected: String,
        found: String,
        position: u64,
    },

    /// Elements still open at the end of input.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// Non UTF-8 content.
    #[error("invalid UTF-8 in markup")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type for formatting.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Formatter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,

    /// Whitespace handling.
    pub whitespace: WhitespaceSensitivity,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            whitespace: WhitespaceSensitivity::Css,
        }
    }
}

impl From<&FormatConfig> for FormatOptions {
    fn from(config: &FormatConfig) -> Self {
        Self {
            indent_width: config.indent_width,
            whitespace: config.whitespace,
        }
    }
}

/// Reformats a markup string.
pub trait MarkupFormatter: fmt::Debug + Send + Sync {
    /// Format `markup`, failing on malformed input.
    fn format(&self, markup: &str) -> Result<String>;
}

/// Default HTML formatter.
#[derive(Debug, Clone, Default)]
pub struct HtmlFormatter {
    options: FormatOptions,
}

impl HtmlFormatter {
    /// Create a formatter with the given options.
    #[must_use]
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Formatter options.
    #[must_use]
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }
}

impl MarkupFormatter for HtmlFormatter {
    fn format(&self, markup: &str) -> Result<String> {
        let nodes = parse(markup)?;
        let mut printer = Printer {
            options: &self.options,
            out: String::with_capacity(markup.len() + markup.len() / 4),
        };
        printer.print_nodes(&nodes, 0);
        Ok(printer.out)
    }
}

/// Parsed markup node.
#[derive(Debug)]
enum Tok {
    Element(Tag),
    Text(String),
    Comment(String),
    Doctype(String),
    /// CDATA sections, declarations and processing instructions.
    Verbatim(String),
}

#[derive(Debug)]
struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Tok>,
    self_closing: bool,
}

fn parse(markup: &str) -> Result<Vec<Tok>> {
    let mut reader = Reader::from_str(markup);
    // End names are checked below so that unclosed HTML void elements
    // (`<br>`) are accepted.
    reader.config_mut().check_end_names = false;

    let mut root: Vec<Tok> = Vec::new();
    let mut stack: Vec<Tag> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| FormatError::Syntax {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                let mut tag = tag_from(&e, reader.buffer_position() as u64)?;
                if is_void_element(&tag.name) {
                    tag.self_closing = true;
                    push(&mut stack, &mut root, Tok::Element(tag));
                } else {
                    stack.push(tag);
                }
            }
            Event::Empty(e) => {
                let mut tag = tag_from(&e, reader.buffer_position() as u64)?;
                tag.self_closing = true;
                push(&mut stack, &mut root, Tok::Element(tag));
            }
            Event::End(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_ascii_lowercase();
                if is_void_element(&name) {
                    continue;
                }
                let position = reader.buffer_position() as u64;
                let Some(tag) = stack.pop() else {
                    return Err(FormatError::UnexpectedClose { name, position });
                };
                if tag.name != name {
                    return Err(FormatError::MismatchedClose {
                        expected: tag.name,
                        found: name,
                        position,
                    });
                }
                push(&mut stack, &mut root, Tok::Element(tag));
            }
            Event::Text(e) => {
                let bytes: &[u8] = &e;
                let text = std::str::from_utf8(bytes)?.to_string();
                push(&mut stack, &mut root, Tok::Text(text));
            }
            Event::CData(e) => {
                let bytes: &[u8] = &e;
                let text = format!("<![CDATA[{}]]>", std::str::from_utf8(bytes)?);
                push(&mut stack, &mut root, Tok::Verbatim(text));
            }
            Event::Comment(e) => {
                let bytes: &[u8] = &e;
                let text = std::str::from_utf8(bytes)?.to_string();
                push(&mut stack, &mut root, Tok::Comment(text));
            }
            Event::DocType(e) => {
                let bytes: &[u8] = &e;
                let text = std::str::from_utf8(bytes)?.trim().to_string();
                push(&mut stack, &mut root, Tok::Doctype(text));
            }
            Event::Decl(e) => {
                let bytes: &[u8] = &e;
                let text = format!("<?{}?>", std::str::from_utf8(bytes)?);
                push(&mut stack, &mut root, Tok::Verbatim(text));
            }
            Event::PI(e) => {
                let bytes: &[u8] = &e;
                let text = format!("<?{}?>", std::str::from_utf8(bytes)?);
                push(&mut stack, &mut root, Tok::Verbatim(text));
            }
            Event::Eof => break,
        }
    }

    if let Some(tag) = stack.pop() {
        return Err(FormatError::Unclosed(tag.name));
    }

    Ok(root)
}

fn tag_from(start: &BytesStart<'_>, position: u64) -> Result<Tag> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_ascii_lowercase();

    let mut attrs = Vec::new();
    // HTML rules: unquoted values and valueless attributes (`disabled`).
    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| FormatError::Syntax {
            position,
            message: e.to_string(),
        })?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        // Values stay escaped; only quotes need re-escaping for `"`.
        let value = std::str::from_utf8(&attr.value)?.replace('"', "&quot;");
        attrs.push((key, value));
    }

    Ok(Tag {
        name,
        attrs,
        children: Vec::new(),
        self_closing: false,
    })
}

fn push(stack: &mut [Tag], root: &mut Vec<Tok>, tok: Tok) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(tok),
        None => root.push(tok),
    }
}

/// Node printed on lines of its own.
enum Block<'a> {
    Element(&'a Tag),
    Line(String),
}

struct Printer<'a> {
    options: &'a FormatOptions,
    out: String,
}

impl Printer<'_> {
    fn print_nodes(&mut self, nodes: &[Tok], depth: usize) {
        let mut run: Vec<&Tok> = Vec::new();

        for node in nodes {
            let block = match node {
                Tok::Element(_) if self.is_inline(node) => None,
                Tok::Text(_) => None,
                Tok::Element(tag) => Some(Block::Element(tag)),
                Tok::Comment(text) => Some(Block::Line(format!("<!--{text}-->"))),
                Tok::Doctype(text) => Some(Block::Line(format!("<!DOCTYPE {text}>"))),
                Tok::Verbatim(text) => Some(Block::Line(text.clone())),
            };

            match block {
                None => run.push(node),
                Some(block) => {
                    self.flush_run(&mut run, depth);
                    match block {
                        Block::Element(tag) => self.print_element(tag, depth),
                        Block::Line(line) => self.line(depth, &line),
                    }
                }
            }
        }

        self.flush_run(&mut run, depth);
    }

    fn flush_run(&mut self, run: &mut Vec<&Tok>, depth: usize) {
        if run.is_empty() {
            return;
        }
        let mut line = String::new();
        for node in run.drain(..) {
            self.write_inline(&mut line, node);
        }
        let line = line.trim_matches(is_html_space);
        if !line.is_empty() {
            self.line(depth, line);
        }
    }

    fn print_element(&mut self, tag: &Tag, depth: usize) {
        if tag.self_closing {
            self.line(depth, &self_closing_tag(tag));
            return;
        }

        let name = tag.name.as_str();

        if PREFORMATTED_ELEMENTS.contains(&name) {
            let mut line = open_tag(tag);
            for child in &tag.children {
                write_verbatim(&mut line, child);
            }
            line.push_str(&close_tag(tag));
            self.line(depth, &line);
            return;
        }

        if RAW_TEXT_ELEMENTS.contains(&name) {
            let mut body = String::new();
            for child in &tag.children {
                write_verbatim(&mut body, child);
            }
            let lines: Vec<&str> = body
                .lines()
                .map(|l| l.trim_matches(is_html_space))
                .filter(|l| !l.is_empty())
                .collect();

            if lines.is_empty() {
                self.line(depth, &format!("{}{}", open_tag(tag), close_tag(tag)));
            } else {
                self.line(depth, &open_tag(tag));
                for l in lines {
                    self.line(depth + 1, l);
                }
                self.line(depth, &close_tag(tag));
            }
            return;
        }

        if tag.children.iter().all(|c| self.is_inline(c)) {
            let mut line = open_tag(tag);
            let mut inner = String::new();
            for child in &tag.children {
                self.write_inline(&mut inner, child);
            }
            line.push_str(inner.trim_matches(is_html_space));
            line.push_str(&close_tag(tag));
            self.line(depth, &line);
            return;
        }

        self.line(depth, &open_tag(tag));
        self.print_nodes(&tag.children, depth + 1);
        self.line(depth, &close_tag(tag));
    }

    fn write_inline(&self, out: &mut String, node: &Tok) {
        match node {
            Tok::Text(text) => push_collapsed(out, text),
            Tok::Element(tag) if tag.self_closing => out.push_str(&self_closing_tag(tag)),
            Tok::Element(tag) => {
                out.push_str(&open_tag(tag));
                for child in &tag.children {
                    self.write_inline(out, child);
                }
                out.push_str(&close_tag(tag));
            }
            other => write_verbatim(out, other),
        }
    }

    fn is_inline(&self, node: &Tok) -> bool {
        match node {
            Tok::Text(_) => true,
            Tok::Element(tag) => {
                self.options.whitespace == WhitespaceSensitivity::Css
                    && INLINE_ELEMENTS.contains(&tag.name.as_str())
                    && tag.children.iter().all(|c| self.is_inline(c))
            }
            Tok::Comment(_) | Tok::Doctype(_) | Tok::Verbatim(_) => false,
        }
    }

    fn line(&mut self, depth: usize, content: &str) {
        for _ in 0..depth * self.options.indent_width {
            self.out.push(' ');
        }
        self.out.push_str(content);
        self.out.push('\n');
    }
}

fn open_tag(tag: &Tag) -> String {
    let mut s = format!("<{}", tag.name);
    push_attrs(&mut s, tag);
    s.push('>');
    s
}

fn self_closing_tag(tag: &Tag) -> String {
    let mut s = format!("<{}", tag.name);
    push_attrs(&mut s, tag);
    s.push_str(" />");
    s
}

fn close_tag(tag: &Tag) -> String {
    format!("</{}>", tag.name)
}

/// Empty values are printed bare, so `disabled=""` and `disabled` agree.
fn push_attrs(s: &mut String, tag: &Tag) {
    for (key, value) in &tag.attrs {
        s.push(' ');
        s.push_str(key);
        if !value.is_empty() {
            s.push_str("=\"");
            s.push_str(value);
            s.push('"');
        }
    }
}

fn write_verbatim(out: &mut String, node: &Tok) {
    match node {
        Tok::Text(text) | Tok::Verbatim(text) => out.push_str(text),
        Tok::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Tok::Doctype(text) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(text);
            out.push('>');
        }
        Tok::Element(tag) if tag.self_closing => out.push_str(&self_closing_tag(tag)),
        Tok::Element(tag) => {
            out.push_str(&open_tag(tag));
            for child in &tag.children {
                write_verbatim(out, child);
            }
            out.push_str(&close_tag(tag));
        }
    }
}

/// Append `text` with every run of HTML whitespace replaced by one space.
fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = out.ends_with(' ');
    for c in text.chars() {
        if is_html_space(c) {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(markup: &str) -> String {
        HtmlFormatter::default().format(markup).unwrap()
    }

    #[test]
    fn test_format_nested_blocks() {
        let out = format("<html><body><section><p>Hello</p></section></body></html>");
        assert_eq!(
            out,
            "<html>\n  <body>\n    <section>\n      <p>Hello</p>\n    </section>\n  </body>\n</html>\n"
        );
    }

    #[test]
    fn test_format_keeps_inline_run_on_one_line() {
        let out = format("<p>\n  Signed   by\n  <strong>{{name}}</strong>\n  on <span>{{date}}</span>\n</p>");
        assert_eq!(
            out,
            "<p>Signed by <strong>{{name}}</strong> on <span>{{date}}</span></p>\n"
        );
    }

    #[test]
    fn test_format_mixed_content() {
        let out = format("<td>Name<div>block</div>tail <b>x</b></td>");
        assert_eq!(
            out,
            "<td>\n  Name\n  <div>block</div>\n  tail <b>x</b>\n</td>\n"
        );
    }

    #[test]
    fn test_format_doctype_and_void_elements() {
        let out = format(
            r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><br/></head></html>"#,
        );
        assert_eq!(
            out,
            "<!DOCTYPE html>\n<html lang=\"en\">\n  <head>\n    <meta charset=\"UTF-8\" />\n    <br />\n  </head>\n</html>\n"
        );
    }

    #[test]
    fn test_format_style_reindented() {
        let out = format("<head><style>\n    body {\n        margin: 0;\n    }\n\n</style></head>");
        assert_eq!(
            out,
            "<head>\n  <style>\n    body {\n    margin: 0;\n    }\n  </style>\n</head>\n"
        );
    }

    #[test]
    fn test_format_pre_verbatim() {
        let out = format("<div><pre>  a\n   b</pre></div>");
        assert_eq!(out, "<div>\n  <pre>  a\n   b</pre>\n</div>\n");
    }

    #[test]
    fn test_format_is_idempotent() {
        let input = r#"<!DOCTYPE html><html><head><title>T</title><style>a { color: red; }</style></head><body><table><tr><td>Name</td><td>{{name}}</td></tr></table><p>See <a href="https://example.com?a=1&amp;b=2">here</a>.</p><!-- end --></body></html>"#;
        let once = format(input);
        let twice = format(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_ignore_whitespace_mode() {
        let formatter = HtmlFormatter::new(FormatOptions {
            indent_width: 4,
            whitespace: WhitespaceSensitivity::Ignore,
        });
        let out = formatter.format("<p>Hi <b>there</b></p>").unwrap();
        assert_eq!(out, "<p>\n    Hi\n    <b>there</b>\n</p>\n");
        assert_eq!(formatter.format(&out).unwrap(), out);
    }

    #[test]
    fn test_format_rejects_mismatched_close() {
        let err = HtmlFormatter::default()
            .format("<div><p>text</div></p>")
            .unwrap_err();
        assert!(matches!(err, FormatError::MismatchedClose { ref expected, ref found, .. } if expected == "p" && found == "div"));
    }

    #[test]
    fn test_format_rejects_unclosed() {
        let err = HtmlFormatter::default()
            .format("<section><p>text</p>")
            .unwrap_err();
        assert!(matches!(
            err,
            FormatError::Unclosed(_) | FormatError::Syntax { .. }
        ));
    }

    #[test]
    fn test_format_rejects_stray_close() {
        let err = HtmlFormatter::default().format("</div>").unwrap_err();
        assert!(matches!(
            err,
            FormatError::UnexpectedClose { .. } | FormatError::Syntax { .. }
        ));
    }

    #[test]
    fn test_format_preserves_escaped_attributes() {
        let out = format(r#"<a href="?x=1&amp;y=2" title='say "hi"'>go</a>"#);
        assert_eq!(out, "<a href=\"?x=1&amp;y=2\" title=\"say &quot;hi&quot;\">go</a>\n");
    }

    #[test]
    fn test_format_valueless_attributes() {
        let out = format("<div><p><input disabled></p><select multiple name=pick></select></div>");
        assert_eq!(
            out,
            "<div>\n  <p><input disabled /></p>\n  <select multiple name=\"pick\"></select>\n</div>\n"
        );
        assert_eq!(format(&out), out);
    }

    #[test]
    fn test_format_options_from_config() {
        let config = FormatConfig {
            pretty: true,
            indent_width: 3,
            whitespace: WhitespaceSensitivity::Ignore,
        };
        let options = FormatOptions::from(&config);
        assert_eq!(options.indent_width, 3);
        assert_eq!(options.whitespace, WhitespaceSensitivity::Ignore);
    }
}
