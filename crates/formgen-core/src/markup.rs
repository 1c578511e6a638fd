//! Declarative markup tree.
//!
//! Templates describe documents as a tree of [`Node`]s built with the
//! [`Element`] builder. The tree is turned into HTML by a markup renderer in
//! `formgen-generator`.

/// HTML elements that never have children and are written self-closed.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Check whether a tag name is an HTML void element.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// A node of the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes, inline style and children.
    Element(Element),

    /// Text content, escaped when rendered.
    Text(String),

    /// Markup written verbatim (stylesheets, conditional comments).
    Raw(String),

    /// An HTML comment.
    Comment(String),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a raw node that is written without escaping.
    pub fn raw(markup: impl Into<String>) -> Self {
        Self::Raw(markup.into())
    }

    /// Create a comment node.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    /// Get the element if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Count elements with the given tag in this subtree, including self.
    #[must_use]
    pub fn count_elements(&self, tag: &str) -> usize {
        match self {
            Self::Element(el) => {
                usize::from(el.tag == tag)
                    + el.children.iter().map(|c| c.count_elements(tag)).sum::<usize>()
            }
            _ => 0,
        }
    }

    /// Concatenated text of this subtree, ignoring raw and comment nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Self::Raw(_) | Self::Comment(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Style,
    children: Vec<Node>,
}

impl Element {
    /// Create an element with the given tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            style: Style::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value for the same name.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Merge inline style declarations into the element.
    #[must_use]
    pub fn style(mut self, style: &Style) -> Self {
        self.style.extend(style);
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several child nodes.
    #[must_use]
    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Inline style.
    #[must_use]
    pub fn inline_style(&self) -> &Style {
        &self.style
    }

    /// Child nodes.
    #[must_use]
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Whether this is an HTML void element.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }
}

/// Ordered inline CSS declarations.
///
/// Rendered as `prop:value;prop:value`, the way component libraries
/// serialise style objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    /// Create an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a declaration, replacing an earlier value for the same property.
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Set a declaration in place.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// Merge another style into this one; the other style wins on conflicts.
    pub fn extend(&mut self, other: &Style) {
        for (property, value) in &other.declarations {
            self.set(property.clone(), value.clone());
        }
    }

    /// Look up a declaration.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no declarations are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialise to an inline `style` attribute value.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}:{v}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_to_css() {
        let style = Style::new()
            .with("width", "21cm")
            .with("height", "29.7cm")
            .with("background", "red");
        assert_eq!(style.to_css(), "width:21cm;height:29.7cm;background:red");
    }

    #[test]
    fn test_style_override_keeps_position() {
        let mut style = Style::new().with("color", "red").with("margin", "0");
        style.set("color", "blue");
        assert_eq!(style.to_css(), "color:blue;margin:0");
        assert_eq!(style.get("color"), Some("blue"));
    }

    #[test]
    fn test_style_extend() {
        let mut base = Style::new().with("padding", "0").with("color", "#000");
        base.extend(&Style::new().with("color", "#fff").with("margin", "auto"));
        assert_eq!(base.to_css(), "padding:0;color:#fff;margin:auto");
    }

    #[test]
    fn test_element_builder() {
        let el = Element::new("a")
            .attr("href", "https://example.com")
            .attr("target", "_blank")
            .attr("href", "https://example.org")
            .style(&Style::new().with("display", "inline-block"))
            .text("Click");

        assert_eq!(el.tag(), "a");
        assert_eq!(el.get_attr("href"), Some("https://example.org"));
        assert_eq!(el.attrs().len(), 2);
        assert_eq!(el.inline_style().get("display"), Some("inline-block"));
        assert_eq!(el.child_nodes(), &[Node::text("Click")]);
    }

    #[test]
    fn test_void_elements() {
        assert!(Element::new("meta").is_void());
        assert!(is_void_element("br"));
        assert!(!Element::new("section").is_void());
    }

    #[test]
    fn test_count_and_text_content() {
        let tree: Node = Element::new("table")
            .child(Element::new("tr").child(Element::new("td").text("a")))
            .child(Element::new("tr").child(Element::new("td").text("b")))
            .child(Node::raw("<!-- ignored -->"))
            .into();

        assert_eq!(tree.count_elements("tr"), 2);
        assert_eq!(tree.count_elements("table"), 1);
        assert_eq!(tree.text_content(), "ab");
    }
}
