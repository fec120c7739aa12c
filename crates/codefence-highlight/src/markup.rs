//! Markup tree produced by engines and rewritten by hooks.
//!
//! The tree is deliberately small: elements with an ordered property bag and
//! children, and text leaves. Serialization escapes text and attribute values
//! and keeps property insertion order, so output is stable across runs.

use indexmap::IndexMap;

/// Element properties in insertion order.
pub type Properties = IndexMap<String, String>;

/// A node of the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&html_escape(text)),
            Node::Element(element) => element.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with a tag name, properties and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub properties: Properties,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Visit this element and every descendant element, depth-first.
    pub fn visit_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.visit_mut(f);
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.properties {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// The top of a highlighted tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Root {
    pub children: Vec<Node>,
}

impl Root {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Visit every element of the tree, depth-first.
    pub fn visit_elements_mut<F: FnMut(&mut Element)>(&mut self, mut f: F) {
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.visit_mut(&mut f);
            }
        }
    }

    /// Serialize the tree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }
}

/// Escape HTML special characters.
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_keeps_property_order() {
        let root = Root::new(vec![
            Element::new("pre")
                .with_property("class", "a")
                .with_property("style", "color:red")
                .with_property("tabindex", "0")
                .with_child(Element::new("code").with_child(Node::text("x")))
                .into(),
        ]);
        assert_eq!(
            root.to_html(),
            r#"<pre class="a" style="color:red" tabindex="0"><code>x</code></pre>"#
        );
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let root = Root::new(vec![
            Element::new("span")
                .with_property("title", "\"q\" & <t>")
                .with_child(Node::text("a < b && c > 'd'"))
                .into(),
        ]);
        assert_eq!(
            root.to_html(),
            "<span title=\"&quot;q&quot; &amp; &lt;t&gt;\">a &lt; b &amp;&amp; c &gt; &#39;d&#39;</span>"
        );
    }

    #[test]
    fn test_visit_is_depth_first() {
        let mut root = Root::new(vec![
            Element::new("a")
                .with_child(Element::new("b").with_child(Element::new("c")))
                .with_child(Node::text("skip"))
                .with_child(Element::new("d"))
                .into(),
        ]);
        let mut seen = Vec::new();
        root.visit_elements_mut(|element| seen.push(element.tag.clone()));
        assert_eq!(seen, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_text_content() {
        let node: Node = Element::new("code")
            .with_child(Element::new("span").with_child(Node::text("fn")))
            .with_child(Node::text(" main"))
            .into();
        assert_eq!(node.text_content(), "fn main");
    }
}
