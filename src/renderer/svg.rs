//! SVG document tree and serialization
//!
//! Drawing calls accumulate typed nodes; numbers stay `f64` until the whole
//! document is serialized in one pass by [`SvgBuilder::build`].

use crate::board::coords::{fmt_num, Point};

use super::SvgConfig;

/// Attribute value, formatted at serialization time
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Num(f64),
    Text(String),
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Num(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// How an empty element is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfClose {
    /// `<circle ... />`
    Spaced,
    /// `<circle .../>`
    Tight,
}

/// A leaf element such as `<circle>` or `<text>`
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: &'static str,
    pub attrs: Vec<(&'static str, AttrValue)>,
    /// Text content; elements without content are self-closing
    pub content: Option<String>,
    pub close: SelfClose,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: vec![],
            content: None,
            close: SelfClose::Spaced,
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<AttrValue>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    pub fn at(self, x_key: &'static str, y_key: &'static str, p: Point) -> Self {
        self.attr(x_key, p.x).attr(y_key, p.y)
    }

    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.content = Some(text.into());
        self
    }

    pub fn tight(mut self) -> Self {
        self.close = SelfClose::Tight;
        self
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            match value {
                AttrValue::Num(n) => out.push_str(&fmt_num(*n)),
                AttrValue::Text(t) => out.push_str(&escape_xml(t)),
            }
            out.push('"');
        }
        match (&self.content, self.close) {
            (Some(text), _) => {
                out.push('>');
                out.push_str(&escape_xml(text));
                out.push_str("</");
                out.push_str(self.name);
                out.push('>');
            }
            (None, SelfClose::Spaced) => out.push_str(" />"),
            (None, SelfClose::Tight) => out.push_str("/>"),
        }
    }
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Group { class: String, children: Vec<SvgNode> },
    Element(Element),
}

impl SvgNode {
    /// Number of elements named `name` in this subtree
    pub fn count(&self, name: &str) -> usize {
        match self {
            SvgNode::Group { children, .. } => children.iter().map(|c| c.count(name)).sum(),
            SvgNode::Element(e) => usize::from(e.name == name),
        }
    }
}

/// Visible region of the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Build SVG documents incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    roots: Vec<SvgNode>,
    open: Vec<(String, Vec<SvgNode>)>,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            roots: vec![],
            open: vec![],
        }
    }

    /// Open a group; following elements are added to it until `end_group`
    pub fn start_group(&mut self, class: &str) {
        self.open.push((class.to_string(), vec![]));
    }

    /// Close the innermost open group
    pub fn end_group(&mut self) {
        if let Some((class, children)) = self.open.pop() {
            self.push(SvgNode::Group { class, children });
        }
    }

    pub fn add(&mut self, element: Element) {
        self.push(SvgNode::Element(element));
    }

    fn push(&mut self, node: SvgNode) {
        match self.open.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Top-level nodes added so far
    pub fn nodes(&self) -> &[SvgNode] {
        &self.roots
    }

    /// Build the final SVG string, closing any groups left open
    pub fn build(mut self, viewbox: ViewBox) -> String {
        while !self.open.is_empty() {
            self.end_group();
        }

        let nl = if self.config.pretty_print { "\n" } else { "" };
        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" height="100%" viewBox="{} {} {} {}">"#,
            fmt_num(viewbox.x),
            fmt_num(viewbox.y),
            fmt_num(viewbox.width),
            fmt_num(viewbox.height)
        ));
        svg.push_str(nl);

        for node in &self.roots {
            self.write_node(node, 1, &mut svg);
        }

        svg.push_str("</svg>");
        svg
    }

    fn write_node(&self, node: &SvgNode, depth: usize, out: &mut String) {
        let (indent, nl) = if self.config.pretty_print {
            ("  ".repeat(depth), "\n")
        } else {
            (String::new(), "")
        };
        match node {
            SvgNode::Group { class, children } => {
                out.push_str(&format!(r#"{}<g class="{}">{}"#, indent, escape_xml(class), nl));
                for child in children {
                    self.write_node(child, depth + 1, out);
                }
                out.push_str(&format!("{}</g>{}", indent, nl));
            }
            SvgNode::Element(element) => {
                out.push_str(&indent);
                element.write(out);
                out.push_str(nl);
            }
        }
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compact() -> SvgConfig {
        SvgConfig::default()
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_element_close_styles() {
        let mut out = String::new();
        Element::new("circle")
            .at("cx", "cy", Point::new(1.5, 2.0))
            .attr("r", 3.0)
            .write(&mut out);
        assert_eq!(out, r#"<circle cx="1.5" cy="2" r="3" />"#);

        out.clear();
        Element::new("circle")
            .attr("r", 10.0)
            .attr("style", "fill:white")
            .tight()
            .write(&mut out);
        assert_eq!(out, r#"<circle r="10" style="fill:white"/>"#);
    }

    #[test]
    fn test_element_with_content() {
        let mut out = String::new();
        Element::new("text").attr("x", 4.0).content("a&b").write(&mut out);
        assert_eq!(out, r#"<text x="4">a&amp;b</text>"#);
    }

    #[test]
    fn test_compact_document() {
        let mut builder = SvgBuilder::new(compact());
        builder.start_group("layer");
        builder.add(Element::new("rect").attr("x", 0.0));
        builder.end_group();
        let svg = builder.build(ViewBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" height="100%" viewBox="0 0 10 10"><g class="layer"><rect x="0" /></g></svg>"#
        );
    }

    #[test]
    fn test_empty_group() {
        let mut builder = SvgBuilder::new(compact());
        builder.start_group("empty");
        builder.end_group();
        let svg = builder.build(ViewBox::new(0.0, 0.0, 1.0, 1.0));
        assert!(svg.contains(r#"<g class="empty"></g>"#));
    }

    #[test]
    fn test_pretty_document() {
        let mut builder = SvgBuilder::new(
            SvgConfig::new()
                .with_pretty_print(true)
                .with_standalone(true),
        );
        builder.start_group("layer");
        builder.add(Element::new("rect"));
        let svg = builder.build(ViewBox::new(0.0, 0.0, 1.0, 1.0));
        let lines: Vec<&str> = svg.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert_eq!(lines[2], r#"  <g class="layer">"#);
        assert_eq!(lines[3], "    <rect />");
        assert_eq!(lines[4], "  </g>");
        assert_eq!(lines[5], "</svg>");
    }

    #[test]
    fn test_node_count() {
        let mut builder = SvgBuilder::new(compact());
        builder.start_group("outer");
        builder.add(Element::new("text"));
        builder.start_group("inner");
        builder.add(Element::new("text"));
        builder.add(Element::new("circle"));
        builder.end_group();
        builder.end_group();
        let root = &builder.nodes()[0];
        assert_eq!(root.count("text"), 2);
        assert_eq!(root.count("circle"), 1);
    }
}
