//! Arena-backed document tree
//!
//! A minimal DOM stand-in: element and text nodes stored in a flat arena and
//! addressed by `NodeId`. Sibling/child structure lives in per-node links, so
//! mutation is O(1) pointer surgery and ids never dangle: a detached node
//! simply keeps its slot until the document is dropped.
//!
//! # Features
//! - O(1) `append_child` / `insert_before` / `detach`
//! - Preorder (document order) traversal, the order a reader encounters text
//! - Attribute access for element nodes
//! - `text_content` subtree concatenation

use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// Index of a node inside a `Document` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

/// Payload of a node: an element with tag + attributes, or a text run.
#[derive(Debug, Clone)]
pub enum NodePayload {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    payload: NodePayload,
}

// ==================== MAIN IMPLEMENTATION ====================

/// An owned document tree.
///
/// The arena owns every node it ever allocated. Detaching removes a node from
/// the tree structure but keeps it addressable, which is what lets replacement
/// records and insertion anchors hold plain `NodeId`s.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create a document with a single root element.
    pub fn new(root_tag: &str) -> Self {
        let mut doc = Self { nodes: Vec::new(), root: NodeId(0) };
        doc.root = doc.alloc(NodePayload::Element(ElementData {
            tag: root_tag.to_string(),
            attrs: Vec::new(),
        }));
        doc
    }

    fn alloc(&mut self, payload: NodePayload) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: None,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
            payload,
        });
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total nodes ever allocated, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodePayload::Element(ElementData {
            tag: tag.to_string(),
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodePayload::Text(text.to_string()))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].last_child
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].payload, NodePayload::Text(_))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].payload, NodePayload::Element(_))
    }

    /// Text of a text node, `None` for elements.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].payload {
            NodePayload::Text(text) => Some(text),
            NodePayload::Element(_) => None,
        }
    }

    /// Tag name of an element node, `None` for text.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].payload {
            NodePayload::Element(data) => Some(&data.tag),
            NodePayload::Text(_) => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].payload {
            NodePayload::Element(data) => data
                .attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodePayload::Text(_) => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].payload {
            NodePayload::Element(data) => &data.attrs,
            NodePayload::Text(_) => &[],
        }
    }

    /// Set (or overwrite) an attribute. No-op on text nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodePayload::Element(data) = &mut self.nodes[id.0].payload {
            match data.attrs.iter_mut().find(|(key, _)| key == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => data.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Unlink a node from its parent and siblings. No-op when already detached.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.0];
            (node.parent, node.prev, node.next)
        };
        let Some(parent) = parent else { return };

        match prev {
            Some(prev) => self.nodes[prev.0].next = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0].prev = prev,
            None => self.nodes[parent.0].last_child = prev,
        }

        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent.0].last_child;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].prev = last;
        match last {
            Some(last) => self.nodes[last.0].next = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    /// Insert `new` immediately before `reference`, detaching `new` first.
    /// No-op when `reference` is itself detached.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) {
        let Some(parent) = self.nodes[reference.0].parent else { return };
        self.detach(new);
        let prev = self.nodes[reference.0].prev;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[new.0].prev = prev;
        self.nodes[new.0].next = Some(reference);
        self.nodes[reference.0].prev = Some(new);
        match prev {
            Some(prev) => self.nodes[prev.0].next = Some(new),
            None => self.nodes[parent.0].first_child = Some(new),
        }
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// All descendants of `root` in preorder (document order), excluding
    /// `root` itself.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants { doc: self, root, next: self.first_child(root) }
    }

    /// Text-node descendants of `root` in document order.
    pub fn text_nodes(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(root).filter(move |&id| self.is_text(id))
    }

    fn next_in_subtree(&self, id: NodeId, root: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(id) {
            return Some(child);
        }
        let mut current = id;
        loop {
            if current == root {
                return None;
            }
            if let Some(sibling) = self.next_sibling(current) {
                return Some(sibling);
            }
            current = self.parent(current)?;
        }
    }

    /// Concatenated text of the subtree rooted at `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.text(id) {
            out.push_str(text);
        }
        for descendant in self.descendants(id) {
            if let Some(text) = self.text(descendant) {
                out.push_str(text);
            }
        }
        out
    }

    /// Child ids of `id`, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.first_child(id);
        while let Some(child) = cursor {
            out.push(child);
            cursor = self.next_sibling(child);
        }
        out
    }
}

/// Preorder iterator over a subtree, excluding the subtree root.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_in_subtree(current, self.root);
        Some(current)
    }
}

// ==================== TESTS ====================
