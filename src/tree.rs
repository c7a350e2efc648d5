//! Arena-based input tree.
//!
//! The input to the conversion engine is a loosely-structured element tree:
//! a root, elements with a tag and attributes, and text leaves. The tree is
//! stored as an arena: every node lives in one `Vec` and is addressed by a
//! `NodeId` handle, with per-node child lists holding handles rather than
//! owned subtrees. The pre-traversal rewrite passes (lifting, link/heading
//! inversion) splice and split ancestor child lists heavily, and with an
//! arena those rewrites are plain index-array edits; "this node was already
//! relocated" becomes a `HashSet<NodeId>` membership check.
//!
//! Producers (see [`crate::html`]) build a `Tree` and hand it to
//! [`crate::convert`], which takes ownership so the rewrite passes can
//! mutate it freely before traversal starts.

/// Handle to a node stored in a [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The payload of a single input node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// The document root; exactly one per tree, always [`Tree::ROOT`]
    Root,
    /// An element with a tag name and attributes
    Element(ElementData),
    /// A text leaf
    Text(String),
}

/// Tag name and attributes of an element node.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    data: NodeData,
    children: Vec<NodeId>,
}

/// An input document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Handle of the root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree containing only an empty root.
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node {
                data: NodeData::Root,
                children: Vec::new(),
            }],
        }
    }

    /// Allocate a detached element node.
    pub fn new_element(
        &mut self,
        tag: impl Into<String>,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.into(),
            attrs,
        }))
    }

    /// Allocate a detached text node.
    pub fn new_text(&mut self, value: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(value.into()))
    }

    /// Allocate and append an element node under `parent` in one step.
    pub fn element_in(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        let id = self.new_element(tag, attrs);
        self.append_child(parent, id);
        id
    }

    /// Allocate and append a text node under `parent` in one step.
    pub fn text_in(&mut self, parent: NodeId, value: impl Into<String>) -> NodeId {
        let id = self.new_text(value);
        self.append_child(parent, id);
        id
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            children: Vec::new(),
        });
        id
    }

    /// Append an existing node to `parent`'s child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0].data
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn children_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        &mut self.nodes[id.0].children
    }

    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        self.nodes[id.0].children = children;
    }

    /// Element view of a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Tag name of a node, if it is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Attribute value of an element node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Index of `child` within `parent`'s child list.
    pub fn position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Allocate a copy of `id`'s payload (same tag and attributes) with the
    /// given child list. Used by the rewrite passes when an ancestor is
    /// split in two around an insertion point.
    pub fn clone_with_children(&mut self, id: NodeId, children: Vec<NodeId>) -> NodeId {
        let data = self.nodes[id.0].data.clone();
        let new = self.push(data);
        self.nodes[new.0].children = children;
        new
    }

    /// Concatenate every text value in the subtree rooted at `id`.
    pub fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Text(value) => out.push_str(value),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
