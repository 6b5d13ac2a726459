//! Document hydration and rendering
//!
//! `NodeDefinition` is the serde-facing shape of a document tree: a JSON
//! string is a text node, an object with `tag`/`attrs`/`children` is an
//! element. The JS host serializes the relevant subtree once, the engine
//! works on the arena form, and `render_html` emits a deterministic
//! HTML-style view for output and inspection.

use serde::{Deserialize, Serialize};

use super::arena::{Document, NodeId};

// ==================== TYPE DEFINITIONS ====================

/// One node of a document tree, as hydrated from or exported to JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeDefinition {
    Text(String),
    Element {
        tag: String,
        #[serde(default)]
        attrs: Vec<(String, String)>,
        #[serde(default)]
        children: Vec<NodeDefinition>,
    },
}

// ==================== HYDRATION ====================

impl Document {
    /// Build a document from a definition tree. The root must be an element.
    pub fn from_definition(definition: &NodeDefinition) -> Result<Self, String> {
        match definition {
            NodeDefinition::Text(_) => Err("document root must be an element".to_string()),
            NodeDefinition::Element { tag, attrs, children } => {
                let mut doc = Document::new(tag);
                let root = doc.root();
                for (name, value) in attrs {
                    doc.set_attribute(root, name, value);
                }
                for child in children {
                    build_node(&mut doc, root, child);
                }
                Ok(doc)
            }
        }
    }

    /// Export the subtree at `id` back to a definition tree.
    pub fn to_definition(&self, id: NodeId) -> NodeDefinition {
        match self.text(id) {
            Some(text) => NodeDefinition::Text(text.to_string()),
            None => NodeDefinition::Element {
                tag: self.tag(id).unwrap_or_default().to_string(),
                attrs: self.attributes(id).to_vec(),
                children: self
                    .children(id)
                    .into_iter()
                    .map(|child| self.to_definition(child))
                    .collect(),
            },
        }
    }

    /// Render the subtree at `id` as an HTML-style string.
    pub fn render_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, out: &mut String) {
        match self.text(id) {
            Some(text) => out.push_str(&escape_text(text)),
            None => {
                let tag = self.tag(id).unwrap_or_default();
                out.push('<');
                out.push_str(tag);
                for (name, value) in self.attributes(id) {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                for child in self.children(id) {
                    self.render_into(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn build_node(doc: &mut Document, parent: NodeId, definition: &NodeDefinition) {
    match definition {
        NodeDefinition::Text(text) => {
            let id = doc.create_text(text);
            doc.append_child(parent, id);
        }
        NodeDefinition::Element { tag, attrs, children } => {
            let id = doc.create_element(tag);
            for (name, value) in attrs {
                doc.set_attribute(id, name, value);
            }
            doc.append_child(parent, id);
            for child in children {
                build_node(doc, id, child);
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// ==================== TESTS ====================
