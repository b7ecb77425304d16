//! Owned HTML tree: parsing with `html5ever` and serialization.
//!
//! The tree is a transient value built for a single sanitize call. Parsing
//! follows the HTML5 tree-construction rules, so attribute values and text
//! are stored decoded and escaped again on output.

use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::RenderError;
use crate::utils::html::{escape_attr, escape_text, is_void_element};

/// Deeper nesting than this is refused rather than recursed into.
pub const MAX_DEPTH: usize = 512;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Attributes in source order, values entity-decoded.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse an HTML fragment, in `<body>` context, into its top-level nodes.
///
/// Comments, doctypes and processing instructions are dropped.
pub fn parse(html: &str) -> Result<Vec<Node>, RenderError> {
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(html);

    // Fragment parsing puts everything under a synthetic <html> root.
    let root = dom
        .document
        .children
        .borrow()
        .first()
        .cloned()
        .ok_or_else(|| RenderError::MalformedInput("fragment has no root element".into()))?;

    let mut nodes = Vec::new();
    for child in root.children.borrow().iter() {
        convert(child, 0, &mut nodes)?;
    }
    Ok(nodes)
}

fn convert(handle: &Handle, depth: usize, out: &mut Vec<Node>) -> Result<(), RenderError> {
    if depth > MAX_DEPTH {
        return Err(RenderError::NestingTooDeep { max: MAX_DEPTH });
    }

    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let tag: &str = &name.local;
            let mut element = Element::new(tag.to_ascii_lowercase());
            element.attrs = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    (name, attr.value.to_string())
                })
                .collect();

            for child in handle.children.borrow().iter() {
                convert(child, depth + 1, &mut element.children)?;
            }
            out.push(Node::Element(element));
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if !text.is_empty() {
                out.push(Node::Text(text.to_string()));
            }
        }
        NodeData::Document
        | NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => {}
    }
    Ok(())
}

// ============================================================================
// Serialization
// ============================================================================

/// Serialize nodes back to HTML.
///
/// Void elements are written as `<tag ... />` with no closing tag.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }

            if is_void_element(&el.tag) {
                out.push_str(" />");
                return;
            }

            out.push('>');
            // The parser drops one newline right after these start tags.
            if matches!(el.tag.as_str(), "pre" | "textarea" | "listing")
                && matches!(el.children.first(), Some(Node::Text(t)) if t.starts_with('\n'))
            {
                out.push('\n');
            }
            for child in &el.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}
