//! Minimal HTML node tree produced by component render capabilities.

use std::fmt;

/// Elements serialized without children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Escaped text content.
    Text(String),
    /// A flat sequence of sibling nodes without a wrapper.
    Group(Vec<Node>),
}

/// An HTML element under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: String,
    /// Attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// Starts an element builder.
    pub fn element(tag: impl Into<String>) -> Element {
        Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Groups nodes without a wrapper element.
    pub fn group(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self::Group(nodes.into_iter().collect())
    }

    /// The node rendered for a component identifier nobody registered.
    pub fn unknown_component() -> Self {
        Node::element("div")
            .class("gms-unknown-component")
            .text("Unknown Component")
            .into()
    }

    /// The node rendered in place of a component whose render function panicked.
    pub fn component_error() -> Self {
        Node::element("div")
            .class("gms-component-error")
            .text("Component Error")
            .into()
    }

    /// Serializes the tree to an HTML string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => escape_into(text, out),
            Self::Group(nodes) => {
                for node in nodes {
                    node.write_html(out);
                }
            }
            Self::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

impl Element {
    /// Adds an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a `class` attribute.
    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Appends a child node.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Appends several child nodes.
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Appends a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    /// Returns the value of the first attribute with this name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn escape_into(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_element() {
        let node: Node = Node::element("div")
            .class("card")
            .child(Node::element("h2").text("Title"))
            .into();
        assert_eq!(
            node.render(),
            "<div class=\"card\"><h2>Title</h2></div>"
        );
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let node: Node = Node::element("p")
            .attr("title", "a \"quoted\" <value>")
            .text("5 < 6 & 7 > 3")
            .into();
        assert_eq!(
            node.render(),
            "<p title=\"a &quot;quoted&quot; &lt;value&gt;\">5 &lt; 6 &amp; 7 &gt; 3</p>"
        );
    }

    #[test]
    fn test_void_element_has_no_closing_tag() {
        let node: Node = Node::element("input").attr("name", "email").into();
        assert_eq!(node.render(), "<input name=\"email\">");
    }

    #[test]
    fn test_group_renders_siblings() {
        let node = Node::group(vec![Node::text("a"), Node::text("b")]);
        assert_eq!(node.to_string(), "ab");
    }

    #[test]
    fn test_unknown_component_is_stable() {
        assert_eq!(Node::unknown_component(), Node::unknown_component());
        assert_eq!(
            Node::unknown_component().render(),
            "<div class=\"gms-unknown-component\">Unknown Component</div>"
        );
    }
}
