//! Generic ordered XML tree with a deterministic pretty-printer.
//!
//! Parsing goes through `quick_xml`'s event reader. Rendering never reuses the
//! source layout: elements whose content is only markup are re-indented, while
//! elements holding text are written inline exactly as parsed.

use crate::error::{ReleaseError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Declaration written at the top of every rendered document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

impl Node {
    fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }

    fn is_character_data(&self) -> bool {
        match self {
            Node::Text(text) => !text.trim().is_empty(),
            Node::CData(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Concatenated text and CDATA content of this element's direct children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) | Node::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// First element named `name` in document order, this element included
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) => element.find_mut(name),
            _ => None,
        })
    }

    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.elements().find_map(|element| element.find(name))
    }

    /// Insert `child` before every other element child.
    ///
    /// Leading comments stay ahead of it only if they precede the first element.
    pub fn prepend_element(&mut self, child: Element) {
        let index = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(_)))
            .unwrap_or(self.children.len());
        self.children.insert(index, Node::Element(child));
    }
}

/// How empty elements are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyElementStyle {
    /// `<tag attr="x" />`
    Spaced,
    /// `<tag attr="x"/>`
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub indent: String,
    pub empty_elements: EmptyElementStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            indent: "  ".to_string(),
            empty_elements: EmptyElementStyle::Spaced,
        }
    }
}

/// A parsed document: root element plus whatever surrounds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub doctype: Option<String>,
    /// Comments and processing instructions before the root
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Comments and processing instructions after the root
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut doctype = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;
        let mut open: Vec<Element> = Vec::new();

        loop {
            let node = match reader.read_event()? {
                Event::Eof => break,
                Event::Decl(_) => continue,
                Event::DocType(text) => {
                    doctype = Some(String::from_utf8_lossy(&text).trim().to_string());
                    continue;
                }
                Event::Start(start) => {
                    open.push(Element::from_start(&start)?);
                    continue;
                }
                Event::End(_) => match open.pop() {
                    Some(element) => Node::Element(element),
                    None => return Err(ReleaseError::structural("unbalanced closing tag")),
                },
                Event::Empty(start) => Node::Element(Element::from_start(&start)?),
                Event::Text(text) => Node::Text(text.unescape()?.into_owned()),
                Event::CData(data) => {
                    Node::CData(String::from_utf8_lossy(&data.into_inner()).into_owned())
                }
                Event::Comment(text) => {
                    Node::Comment(String::from_utf8_lossy(&text.into_inner()).into_owned())
                }
                Event::PI(pi) => {
                    Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned())
                }
            };

            if let Some(parent) = open.last_mut() {
                parent.children.push(node);
                continue;
            }

            match node {
                Node::Element(element) if root.is_none() => root = Some(element),
                Node::Element(element) => {
                    return Err(ReleaseError::structural(format!(
                        "second root element <{}>",
                        element.name
                    )))
                }
                Node::Text(text) if text.trim().is_empty() => {}
                Node::Text(_) | Node::CData(_) => {
                    return Err(ReleaseError::structural("text outside the root element"))
                }
                other if root.is_none() => prolog.push(other),
                other => epilog.push(other),
            }
        }

        if let Some(element) = open.last() {
            return Err(ReleaseError::structural(format!(
                "unclosed element <{}>",
                element.name
            )));
        }

        let root = root.ok_or_else(|| ReleaseError::structural("document has no root element"))?;
        Ok(Document {
            doctype,
            prolog,
            root,
            epilog,
        })
    }

    /// Render with the fixed declaration and a trailing newline.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        out.push_str(XML_DECLARATION);
        out.push('\n');
        if let Some(doctype) = &self.doctype {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push_str(">\n");
        }
        for node in &self.prolog {
            render_node(node, 0, options, &mut out);
            out.push('\n');
        }
        render_element(&self.root, 0, options, &mut out);
        out.push('\n');
        for node in &self.epilog {
            render_node(node, 0, options, &mut out);
            out.push('\n');
        }
        out
    }
}

fn push_indent(depth: usize, options: &RenderOptions, out: &mut String) {
    for _ in 0..depth {
        out.push_str(&options.indent);
    }
}

/// Writes the start tag, or the whole element when `empty`. Returns whether
/// content and an end tag must follow.
fn render_start_tag(
    element: &Element,
    empty: bool,
    options: &RenderOptions,
    out: &mut String,
) -> bool {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    if empty {
        out.push_str(match options.empty_elements {
            EmptyElementStyle::Spaced => " />",
            EmptyElementStyle::Compact => "/>",
        });
        return false;
    }
    out.push('>');
    true
}

fn render_end_tag(element: &Element, out: &mut String) {
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn render_element(element: &Element, depth: usize, options: &RenderOptions, out: &mut String) {
    if element.children.iter().any(Node::is_character_data) {
        render_element_inline(element, options, out);
        return;
    }

    let children: Vec<&Node> = element
        .children
        .iter()
        .filter(|node| !node.is_blank_text())
        .collect();
    if !render_start_tag(element, children.is_empty(), options, out) {
        return;
    }
    for child in children {
        out.push('\n');
        push_indent(depth + 1, options, out);
        render_node(child, depth + 1, options, out);
    }
    out.push('\n');
    push_indent(depth, options, out);
    render_end_tag(element, out);
}

fn render_node(node: &Node, depth: usize, options: &RenderOptions, out: &mut String) {
    match node {
        Node::Element(element) => render_element(element, depth, options, out),
        other => render_inline(other, options, out),
    }
}

/// Mixed content is written without any added whitespace.
fn render_inline(node: &Node, options: &RenderOptions, out: &mut String) {
    match node {
        Node::Element(element) => render_element_inline(element, options, out),
        Node::Text(text) => out.push_str(&quick_xml::escape::partial_escape(text.as_str())),
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(pi) => {
            out.push_str("<?");
            out.push_str(pi);
            out.push_str("?>");
        }
    }
}

fn render_element_inline(element: &Element, options: &RenderOptions, out: &mut String) {
    if render_start_tag(element, element.children.is_empty(), options, out) {
        for child in &element.children {
            render_inline(child, options, out);
        }
        render_end_tag(element, out);
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            other => escaped.push(other),
        }
    }
    escaped
}
