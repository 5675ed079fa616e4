//! The element tree the renderer walks.
//!
//! The tree is owned and immutable once built.  It is normally produced by
//! [`parse`](crate::parse) from an `html5ever` parse, but can equally be put
//! together by hand with the builder methods on [`Element`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tree_builder::TreeBuilderOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tendril::TendrilSink;

use crate::Result;

/// An attribute value.  `class` is kept as its whitespace separated tokens;
/// everything else is a single string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// A plain attribute value.
    Single(String),
    /// A set of tokens (e.g. the classes of an element).
    Tokens(Vec<String>),
}

impl AttrValue {
    fn for_attribute(name: &str, value: &str) -> AttrValue {
        if name == "class" {
            AttrValue::Tokens(value.split_whitespace().map(String::from).collect())
        } else {
            AttrValue::Single(value.into())
        }
    }

    /// The value as text; tokens are joined with single spaces.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            AttrValue::Single(s) => Cow::Borrowed(s),
            AttrValue::Tokens(v) => Cow::Owned(v.join(" ")),
        }
    }

    /// True if the value is, or contains as a token, `token`.
    pub fn contains_token(&self, token: &str) -> bool {
        match self {
            AttrValue::Single(s) => s == token,
            AttrValue::Tokens(v) => v.iter().any(|t| t == token),
        }
    }
}

/// A node in the tree: either text or an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A run of text.
    Text(String),
    /// A tagged element.
    Element(Element),
}

impl Node {
    /// Convenience constructor for a text node.
    pub fn text(s: impl Into<String>) -> Node {
        Node::Text(s.into())
    }

    /// Return the element, if this is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// True for text nodes containing only whitespace.
    pub fn is_blank_text(&self) -> bool {
        match self {
            Node::Text(t) => t.chars().all(char::is_whitespace),
            Node::Element(_) => false,
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Node {
        Node::Element(e)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Node {
        Node::Text(s.into())
    }
}

/// Selects which direct child `Element::find_child` returns.
#[derive(Clone, Copy, Debug)]
pub enum Filter<'a> {
    /// Any element with the right tag.
    Any,
    /// Elements whose `class` contains this token.
    Class(&'a str),
    /// Elements with this `id`.
    Id(&'a str),
}

/// A tagged node with attributes and children.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, AttrValue>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Element {
        Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Element {
        self.attrs
            .insert(name.into(), AttrValue::for_attribute(name, value));
        self
    }

    /// Builder: append a child node.
    pub fn child(mut self, node: impl Into<Node>) -> Element {
        self.children.push(node.into());
        self
    }

    /// The (lower case) tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The child nodes in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Look up an attribute.
    pub fn get_attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    fn matches(&self, tag: &str, filter: Filter) -> bool {
        if self.tag != tag {
            return false;
        }
        match filter {
            Filter::Any => true,
            Filter::Class(c) => self.get_attr("class").map_or(false, |v| v.contains_token(c)),
            Filter::Id(id) => self.get_attr("id").map_or(false, |v| v.as_text() == id),
        }
    }

    /// The first direct child element with this tag matching `filter`.
    pub fn find_child(&self, tag: &str, filter: Filter) -> Option<&Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find(|e| e.matches(tag, filter))
    }

    /// The first descendant element (in document order) with this tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.descendants().find(|e| e.tag == tag)
    }

    /// All descendant elements with this tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        self.descendants().filter(|e| e.tag == tag).collect()
    }

    /// Iterate over descendant elements in pre-order.
    fn descendants(&self) -> impl Iterator<Item = &Element> {
        let mut stack: Vec<&Element> = self.child_elements_rev().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.child_elements_rev());
            Some(next)
        })
    }

    fn child_elements_rev(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().rev().filter_map(Node::as_element)
    }

    /// All the text in this subtree, concatenated.
    pub fn text(&self) -> String {
        let mut result = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(t) => result.push_str(t),
                Node::Element(e) => stack.extend(e.children.iter().rev()),
            }
        }
        result
    }
}

// Deep trees would overflow the stack with the derived recursive drop.
impl Drop for Element {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(node) = stack.pop() {
            if let Node::Element(mut element) = node {
                stack.append(&mut element.children);
            }
        }
    }
}

/// A parsed HTML document.
#[derive(Clone, Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    /// The `<body>` element, if there is one.
    pub fn body(&self) -> Option<&Element> {
        self.root.find("body")
    }
}

/// Parse HTML from `input` into a [`Document`].
pub fn parse(mut input: impl io::Read) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut input)?;
    Ok(Document {
        root: convert(&dom.document),
    })
}

/// Convert an rcdom tree into our own.  Comments, doctypes and processing
/// instructions are dropped.
///
/// This works with an explicit stack so that very deep documents don't
/// exhaust the call stack here; the renderer applies its own depth limit.
fn convert(document: &Handle) -> Element {
    struct Pending {
        element: Element,
        to_process: std::vec::IntoIter<Handle>,
    }

    let start = |element: Element, handle: &Handle| Pending {
        element,
        to_process: handle.children.borrow().clone().into_iter(),
    };

    let mut stack = vec![start(Element::new("#document"), document)];
    loop {
        let Some(top) = stack.last_mut() else {
            // The loop always returns before the stack empties.
            return Element::new("#document");
        };
        if let Some(handle) = top.to_process.next() {
            match handle.data {
                NodeData::Element {
                    ref name,
                    ref attrs,
                    ..
                } => {
                    let mut element = Element::new(&*name.local);
                    for attr in attrs.borrow().iter() {
                        element = element.attr(&attr.name.local, &attr.value);
                    }
                    stack.push(start(element, &handle));
                }
                NodeData::Text { ref contents } => {
                    top.element
                        .children
                        .push(Node::Text(contents.borrow().to_string()));
                }
                _ => {
                    html_trace!("convert: skipping non-content node");
                }
            }
        } else {
            let Some(done) = stack.pop() else { continue };
            match stack.last_mut() {
                Some(parent) => parent.element.children.push(Node::Element(done.element)),
                None => return done.element,
            }
        }
    }
}
