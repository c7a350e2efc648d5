//! The target schema's constraint table.
//!
//! Every output node type has a fixed, enumerable set of legal child types
//! and legal attributes. Every structural handler consults this table to
//! decide whether to emit its node or demote it to its content, and the
//! test suite's validity checker replays the same table over finished
//! documents.

use serde::Serialize;

/// The closed set of output node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Paragraph,
    Heading,
    List,
    ListItem,
    Blockquote,
    Code,
    Link,
    Span,
    Block,
    InlineItem,
    ThematicBreak,
}

/// Inline formatting marks accumulated while descending into formatting
/// elements and materialized on terminal spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Strong,
    Emphasis,
    Underline,
    Code,
    Strikethrough,
    Highlight,
}

impl Mark {
    /// Every supported mark, in canonical order.
    pub const ALL: &'static [Mark] = &[
        Mark::Strong,
        Mark::Emphasis,
        Mark::Underline,
        Mark::Code,
        Mark::Strikethrough,
        Mark::Highlight,
    ];
}

/// Legal-children policy of an output node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildPolicy {
    /// Only the listed node types are legal children
    Kinds(&'static [NodeType]),
    /// Any inline content node (see [`INLINE_NODE_TYPES`])
    InlineNodes,
    /// Raw text only; the node carries its content in an attribute
    TextOnly,
    /// A void node: no children at all
    NoChildren,
}

/// Node types that render as part of an inline run ("phrasing" content).
pub const INLINE_NODE_TYPES: &[NodeType] = &[NodeType::Span, NodeType::Link, NodeType::InlineItem];

/// Block node types that can be toggled through `allowed_blocks`.
/// Paragraphs and spans are always enabled; list items ride along with lists.
pub const TOGGLEABLE_BLOCK_TYPES: &[NodeType] = &[
    NodeType::Heading,
    NodeType::List,
    NodeType::Blockquote,
    NodeType::Code,
    NodeType::Link,
    NodeType::Block,
    NodeType::ThematicBreak,
];

/// Legal child types for each output node type.
pub fn allowed_children(node_type: NodeType) -> ChildPolicy {
    match node_type {
        NodeType::Root => ChildPolicy::Kinds(&[
            NodeType::Paragraph,
            NodeType::Heading,
            NodeType::List,
            NodeType::Blockquote,
            NodeType::Code,
            NodeType::Block,
            NodeType::ThematicBreak,
        ]),
        NodeType::Paragraph | NodeType::Heading => ChildPolicy::InlineNodes,
        NodeType::List => ChildPolicy::Kinds(&[NodeType::ListItem]),
        NodeType::ListItem => ChildPolicy::Kinds(&[NodeType::Paragraph, NodeType::List]),
        NodeType::Blockquote => ChildPolicy::Kinds(&[NodeType::Paragraph]),
        NodeType::Code => ChildPolicy::TextOnly,
        NodeType::Link => ChildPolicy::Kinds(&[NodeType::Span]),
        NodeType::Span | NodeType::Block | NodeType::InlineItem | NodeType::ThematicBreak => {
            ChildPolicy::NoChildren
        }
    }
}

/// Legal attribute keys for each output node type.
pub fn allowed_attributes(node_type: NodeType) -> &'static [&'static str] {
    match node_type {
        NodeType::Root | NodeType::Paragraph | NodeType::ListItem | NodeType::ThematicBreak => &[],
        NodeType::Heading => &["level"],
        NodeType::List => &["style"],
        NodeType::Blockquote => &["attribution"],
        NodeType::Code => &["code", "language", "highlight"],
        NodeType::Link => &["url", "meta"],
        NodeType::Span => &["value", "marks"],
        NodeType::Block | NodeType::InlineItem => &["item"],
    }
}

/// Whether `node_type` is inline ("phrasing") content.
pub fn is_inline(node_type: NodeType) -> bool {
    INLINE_NODE_TYPES.contains(&node_type)
}

/// Whether `child` is a legal direct child of `parent` per the table.
pub fn legal_child(parent: NodeType, child: NodeType) -> bool {
    match allowed_children(parent) {
        ChildPolicy::Kinds(kinds) => kinds.contains(&child),
        ChildPolicy::InlineNodes => is_inline(child),
        ChildPolicy::TextOnly | ChildPolicy::NoChildren => false,
    }
}

/// Whether `child` can legally end up under `parent` once the wrapper has
/// run: either it is directly legal, or it is inline and `parent` accepts
/// paragraphs, in which case the wrapper will fold it into a synthetic
/// paragraph (root, list items, blockquotes).
pub fn legal_after_wrapping(parent: NodeType, child: NodeType) -> bool {
    if legal_child(parent, child) {
        return true;
    }
    is_inline(child) && legal_child(parent, NodeType::Paragraph)
}
