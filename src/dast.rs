//! The output document tree.
//!
//! `DastNode` is a closed tagged union over the target schema's node types.
//! Each variant carries exactly the attributes its type allows (see
//! [`crate::schema::allowed_attributes`]); the legality of child nesting is
//! enforced by the handlers during conversion, not by this type. The tree
//! serializes with serde into the documented wire shape, e.g.
//! `{"type": "span", "value": "hi", "marks": ["strong"]}`.

use serde::Serialize;

use crate::schema::{Mark, NodeType};

/// A node of the strictly-typed output tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DastNode {
    Root {
        children: Vec<DastNode>,
    },
    Paragraph {
        children: Vec<DastNode>,
    },
    Heading {
        level: u8,
        children: Vec<DastNode>,
    },
    List {
        style: ListStyle,
        children: Vec<DastNode>,
    },
    ListItem {
        children: Vec<DastNode>,
    },
    Blockquote {
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
        children: Vec<DastNode>,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        highlight: Option<Vec<usize>>,
        code: String,
    },
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<Vec<MetaEntry>>,
        children: Vec<DastNode>,
    },
    Span {
        #[serde(skip_serializing_if = "Option::is_none")]
        marks: Option<Vec<Mark>>,
        value: String,
    },
    Block {
        item: String,
    },
    InlineItem {
        item: String,
    },
    ThematicBreak,
}

/// Rendering style of a list node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Bulleted,
    Numbered,
}

/// One `{id, value}` metadata entry on a link node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaEntry {
    pub id: String,
    pub value: String,
}

impl DastNode {
    /// Schema type of this node.
    pub fn node_type(&self) -> NodeType {
        match self {
            DastNode::Root { .. } => NodeType::Root,
            DastNode::Paragraph { .. } => NodeType::Paragraph,
            DastNode::Heading { .. } => NodeType::Heading,
            DastNode::List { .. } => NodeType::List,
            DastNode::ListItem { .. } => NodeType::ListItem,
            DastNode::Blockquote { .. } => NodeType::Blockquote,
            DastNode::Code { .. } => NodeType::Code,
            DastNode::Link { .. } => NodeType::Link,
            DastNode::Span { .. } => NodeType::Span,
            DastNode::Block { .. } => NodeType::Block,
            DastNode::InlineItem { .. } => NodeType::InlineItem,
            DastNode::ThematicBreak => NodeType::ThematicBreak,
        }
    }

    /// Whether this node is inline ("phrasing") content.
    pub fn is_inline(&self) -> bool {
        crate::schema::is_inline(self.node_type())
    }

    /// Children of this node, for types that have any.
    pub fn children(&self) -> Option<&[DastNode]> {
        match self {
            DastNode::Root { children }
            | DastNode::Paragraph { children }
            | DastNode::Heading { children, .. }
            | DastNode::List { children, .. }
            | DastNode::ListItem { children }
            | DastNode::Blockquote { children, .. }
            | DastNode::Link { children, .. } => Some(children),
            _ => None,
        }
    }

    /// A span with the given value and no marks.
    pub fn span(value: impl Into<String>) -> DastNode {
        DastNode::Span {
            marks: None,
            value: value.into(),
        }
    }

    /// A span with the given value and marks (`None` when the list is empty).
    pub fn span_with_marks(value: impl Into<String>, marks: Vec<Mark>) -> DastNode {
        DastNode::Span {
            marks: if marks.is_empty() { None } else { Some(marks) },
            value: value.into(),
        }
    }
}

/// The validated document wrapper the engine ultimately produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredText {
    pub schema: &'static str,
    pub document: DastNode,
}

impl StructuredText {
    /// Wrap a finished root node.
    pub fn new(document: DastNode) -> Self {
        StructuredText {
            schema: "dast",
            document,
        }
    }
}
