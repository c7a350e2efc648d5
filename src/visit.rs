//! Dispatcher and children visitor.
//!
//! `Visitor` owns the per-run machinery: it looks up the applicable handler
//! for a node (caller override first, then the built-in default selected by
//! an exhaustive match over [`TagKind`], then the generic fallback that
//! recurses transparently) and iterates child lists. Handlers may be
//! asynchronous (a caller handler might upload an asset before it can
//! produce a block reference), so every handler result is uniformly a boxed
//! future, and synchronous built-ins just wrap trivially-resolved ones.
//!
//! Sibling results are awaited strictly in index order before being
//! flattened, so output order always matches input order no matter when the
//! individual futures complete. Order preservation is a hard contract of
//! the engine.

use std::future::Future;
use std::pin::Pin;

use crate::context::{Context, Shared};
use crate::dast::DastNode;
use crate::error::ConvertError;
use crate::handlers;
use crate::options::Options;
use crate::schema::{Mark, NodeType};
use crate::tree::{NodeData, NodeId, Tree};

/// What a handler produced for one input node.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// The node resolved to nothing and is dropped
    Skip,
    /// One output node
    Node(DastNode),
    /// Fan-out: several output nodes spliced into the parent's sequence
    Nodes(Vec<DastNode>),
}

impl Handled {
    /// Flatten into a (possibly empty) sequence.
    pub fn into_vec(self) -> Vec<DastNode> {
        match self {
            Handled::Skip => Vec::new(),
            Handled::Node(node) => vec![node],
            Handled::Nodes(nodes) => nodes,
        }
    }
}

/// The uniform (boxed) future type every handler resolves to.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Handled, ConvertError>> + 'a>>;

/// A handler as a plain function: built-in defaults have this shape, and
/// caller overrides may too (closures are accepted through
/// [`Options::with_handler`]).
pub type NodeHandler = for<'a> fn(&'a Visitor<'a>, NodeId, Context) -> HandlerFuture<'a>;

/// A boxed caller override.
pub type OverrideHandler =
    Box<dyn for<'a> Fn(&'a Visitor<'a>, NodeId, Context) -> HandlerFuture<'a>>;

/// The closed union of element kinds the dispatcher knows about.
///
/// Unrecognized tags map to `Other` and fall through to the generic
/// handler, which treats the element as transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Paragraph,
    Heading,
    UnorderedList,
    OrderedList,
    ListItem,
    Blockquote,
    Preformatted,
    Anchor,
    Base,
    HorizontalRule,
    LineBreak,
    Strong,
    Emphasis,
    Underline,
    InlineCode,
    Strikethrough,
    Highlight,
    Noop,
    Other,
}

impl TagKind {
    /// Classify a (lowercase) tag name.
    pub fn from_tag(tag: &str) -> TagKind {
        match tag {
            "p" => TagKind::Paragraph,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => TagKind::Heading,
            "ul" => TagKind::UnorderedList,
            "ol" => TagKind::OrderedList,
            "li" => TagKind::ListItem,
            "blockquote" => TagKind::Blockquote,
            "pre" => TagKind::Preformatted,
            "a" => TagKind::Anchor,
            "base" => TagKind::Base,
            "hr" => TagKind::HorizontalRule,
            "br" => TagKind::LineBreak,
            "strong" | "b" => TagKind::Strong,
            "em" | "i" => TagKind::Emphasis,
            "u" | "ins" => TagKind::Underline,
            "code" => TagKind::InlineCode,
            "strike" | "s" | "del" => TagKind::Strikethrough,
            "mark" => TagKind::Highlight,
            "script" | "style" | "noscript" | "template" | "title" | "meta" | "link"
            | "iframe" | "object" | "embed" => TagKind::Noop,
            _ => TagKind::Other,
        }
    }
}

/// Per-run traversal state: the working tree, the configuration, and the
/// shared slot. Handlers receive a reference to this plus their own
/// [`Context`] value.
pub struct Visitor<'t> {
    tree: &'t Tree,
    options: &'t Options,
    shared: Shared,
}

impl<'t> Visitor<'t> {
    pub fn new(tree: &'t Tree, options: &'t Options) -> Self {
        let shared = Shared::new();
        if let Some(base) = &options.base_url {
            shared.set_base_url(base.clone());
        }
        Visitor {
            tree,
            options,
            shared,
        }
    }

    pub fn tree(&self) -> &Tree {
        self.tree
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    pub fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Whether a block type is enabled by caller configuration.
    pub fn block_enabled(&self, node_type: NodeType) -> bool {
        self.options.allowed_blocks.contains(&node_type)
    }

    /// Whether a mark is enabled by caller configuration.
    pub fn mark_enabled(&self, mark: Mark) -> bool {
        self.options.allowed_marks.contains(&mark)
    }

    /// The built-in handler for an element kind. Caller overrides use this
    /// as the explicit "call the default" accessor.
    pub fn default_handler(&self, kind: TagKind) -> NodeHandler {
        handlers::default_for(kind)
    }

    /// Select and invoke the applicable handler for one node.
    ///
    /// Text nodes go to the span handler and the root to the root handler;
    /// elements consult the caller's override registry first, then the
    /// built-in defaults by kind.
    pub fn dispatch<'a>(&'a self, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
        match self.tree.data(node) {
            NodeData::Text(_) => handlers::text(self, node, ctx),
            NodeData::Root => handlers::root(self, node, ctx),
            NodeData::Element(el) => {
                if let Some(handler) = self.options.handlers.get(el.tag.as_str()) {
                    handler(self, node, ctx)
                } else {
                    let default = handlers::default_for(TagKind::from_tag(&el.tag));
                    default(self, node, ctx)
                }
            }
        }
    }

    /// Dispatch every child of `parent` and concatenate the results.
    ///
    /// Results are awaited sequentially in index order; late completion of
    /// an earlier sibling can therefore never reorder output.
    pub async fn visit_children(
        &self,
        parent: NodeId,
        ctx: &Context,
    ) -> Result<Vec<DastNode>, ConvertError> {
        let mut out = Vec::new();
        for &child in self.tree.children(parent) {
            out.extend(self.dispatch(child, ctx.clone()).await?.into_vec());
        }
        Ok(out)
    }
}
