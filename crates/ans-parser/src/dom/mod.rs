//! Owned HTML document tree.
//!
//! Markup is parsed by html5ever, which handles character references,
//! implied and stray tags the way browsers do. Embed parsers have to drop the
//! `<script>` tags that follow their markup while the converter is still
//! walking the document, so the parsed tree is copied into an arena where
//! every node can be detached. Detaching is the only mutation, and it is
//! scoped to the [`Document`] built for a single conversion.

mod build;
mod serialize;

use std::cell::Cell;
use std::fmt;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
}

/// Dispatch key of a node: its tag name for elements, its kind otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Tag(String),
    Text,
    Comment,
}

impl NodeKey {
    /// Key for an element with the given tag name (case-insensitive).
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::Tag(name.to_ascii_lowercase())
    }
}

impl From<&str> for NodeKey {
    fn from(name: &str) -> Self {
        Self::tag(name)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => write!(f, "<{name}>"),
            Self::Text => f.write_str("#text"),
            Self::Comment => f.write_str("#comment"),
        }
    }
}

/// A single `name="value"` pair. Valueless attributes carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug)]
enum NodeData {
    Document,
    Element { name: String, attrs: Vec<Attribute> },
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed HTML document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    detached: Vec<Cell<bool>>,
}

impl Document {
    const ROOT: NodeId = NodeId(0);

    /// Parse markup into a document. Never fails: malformed regions are
    /// recovered on a best-effort basis.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        build::build(html)
    }

    fn empty() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
            detached: vec![Cell::new(false)],
        }
    }

    fn push(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.detached.push(Cell::new(false));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append text under `parent`, merging with a preceding text sibling.
    fn push_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeData::Text(existing) = &mut self.nodes[last.0].data {
                existing.push_str(text);
                return;
            }
        }
        self.push(parent, NodeData::Text(text.to_string()));
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: Self::ROOT,
        }
    }

    /// The `<body>` element. Every parsed document has one; an empty
    /// document falls back to the root.
    #[must_use]
    pub fn body(&self) -> NodeRef<'_> {
        self.root()
            .children()
            .find(|node| node.is_tag("html"))
            .and_then(|html| html.children().find(|node| node.is_tag("body")))
            .unwrap_or_else(|| self.root())
    }

    /// First element named `tag` in document order.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<NodeRef<'_>> {
        self.root().find(tag)
    }
}

/// A borrowed handle to one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.doc, other.doc)
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node().data {
            NodeData::Document => f.write_str("Document"),
            NodeData::Element { name, .. } => write!(f, "Element(<{name}>)"),
            NodeData::Text(text) => write!(f, "Text({text:?})"),
            NodeData::Comment(text) => write!(f, "Comment({text:?})"),
        }
    }
}

impl<'a> NodeRef<'a> {
    fn node(self) -> &'a Node {
        &self.doc.nodes[self.id.0]
    }

    fn at(self, id: NodeId) -> Self {
        Self { doc: self.doc, id }
    }

    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self.node().data {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }

    #[must_use]
    pub fn is_element(self) -> bool {
        self.kind() == NodeKind::Element
    }

    /// Lower-cased tag name, for elements only.
    #[must_use]
    pub fn name(self) -> Option<&'a str> {
        match &self.node().data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_tag(self, tag: &str) -> bool {
        self.name() == Some(tag)
    }

    /// Dispatch key; `None` for the document node.
    #[must_use]
    pub fn key(self) -> Option<NodeKey> {
        match &self.node().data {
            NodeData::Document => None,
            NodeData::Element { name, .. } => Some(NodeKey::Tag(name.clone())),
            NodeData::Text(_) => Some(NodeKey::Text),
            NodeData::Comment(_) => Some(NodeKey::Comment),
        }
    }

    /// Attributes in source order. Empty for non-elements.
    #[must_use]
    pub fn attrs(self) -> &'a [Attribute] {
        match &self.node().data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    #[must_use]
    pub fn attr(self, name: &str) -> Option<&'a str> {
        self.attrs()
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(self) -> impl Iterator<Item = &'a str> {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    #[must_use]
    pub fn has_class(self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// The string payload of a text or comment node.
    #[must_use]
    pub fn string(self) -> Option<&'a str> {
        match &self.node().data {
            NodeData::Text(text) | NodeData::Comment(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn parent(self) -> Option<Self> {
        self.node().parent.map(|id| self.at(id))
    }

    /// Attached children in document order.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> {
        let doc = self.doc;
        self.node()
            .children
            .iter()
            .filter(move |id| !doc.detached[id.0].get())
            .map(move |&id| NodeRef { doc, id })
    }

    #[must_use]
    pub fn first_child(self) -> Option<Self> {
        self.children().next()
    }

    /// The next attached sibling. Re-reads the tree on every call, so nodes
    /// detached after `self` was reached are skipped.
    #[must_use]
    pub fn next_sibling(self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = &parent.node().children;
        let position = siblings.iter().position(|&id| id == self.id)?;
        siblings[position + 1..]
            .iter()
            .find(|id| !self.doc.detached[id.0].get())
            .map(|&id| self.at(id))
    }

    /// Attached descendants in pre-order, excluding `self`.
    #[must_use]
    pub fn descendants(self) -> Descendants<'a> {
        let mut stack: Vec<_> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// First descendant element named `tag`.
    #[must_use]
    pub fn find(self, tag: &str) -> Option<Self> {
        self.descendants().find(|node| node.is_tag(tag))
    }

    /// Every descendant element whose name is in `tags`.
    #[must_use]
    pub fn find_all(self, tags: &[&str]) -> Vec<Self> {
        self.descendants()
            .filter(|node| node.name().is_some_and(|name| tags.contains(&name)))
            .collect()
    }

    /// Concatenated text content, excluding comments and script/style bodies.
    #[must_use]
    pub fn text(self) -> String {
        if let NodeData::Text(text) = &self.node().data {
            return text.clone();
        }
        let mut out = String::new();
        for node in self.descendants() {
            if let NodeData::Text(text) = &node.node().data {
                if !node.parent().is_some_and(serialize::is_raw_text_element) {
                    out.push_str(text);
                }
            }
        }
        out
    }

    /// Remove this node (and its subtree) from the document.
    pub fn detach(self) {
        self.doc.detached[self.id.0].set(true);
    }

    /// Whether this node or one of its ancestors has been detached.
    #[must_use]
    pub fn is_detached(self) -> bool {
        let mut current = Some(self);
        while let Some(node) = current {
            if self.doc.detached[node.id.0].get() {
                return true;
            }
            current = node.parent();
        }
        false
    }
}

/// Pre-order iterator over attached descendants.
pub struct Descendants<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(node.children());
        self.stack[start..].reverse();
        Some(node)
    }
}
