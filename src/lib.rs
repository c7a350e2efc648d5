//! Schema-constrained rich-text conversion
//!
//!     This crate converts an arbitrary, loosely-structured input tree (an
//!     HTML-derived element tree, or any producer yielding the same shape)
//!     into a strictly schema-constrained output document, where every node
//!     type has a fixed set of legal child types, legal attributes and legal
//!     inline marks.
//!
//!     TLDR: the engine never produces an invalid tree. When the input nests
//!     elements in ways the target schema forbids (headings inside list
//!     items, block images inside paragraphs, anchors wrapping headings)
//!     the tree is actively repaired: nodes are demoted to their content,
//!     stray inline runs are wrapped in synthetic paragraphs, embedded block
//!     references are lifted out with their ancestors split around them, and
//!     links containing headings are inverted. Content survives even when
//!     structure cannot.
//!
//! Architecture
//!
//!     The work splits into a small constraint table that every decision
//!     consults, a dispatcher/visitor core, per-type handlers, and three
//!     rewrite passes:
//!
//!     .
//!     ├── error.rs        # ConvertError
//!     ├── tree.rs         # arena-based input tree (NodeId handles)
//!     ├── schema.rs       # the constraint table: legal children/attributes
//!     ├── dast.rs         # output tree + StructuredText wrapper
//!     ├── context.rs      # per-dispatch Context, shared base-URL slot
//!     ├── options.rs      # caller configuration
//!     ├── visit.rs        # dispatcher + children visitor
//!     ├── handlers.rs     # built-in per-type handlers
//!     ├── wrap.rs         # inline runs → synthetic paragraphs
//!     ├── lift.rs         # embedded block relocation / ancestor splitting
//!     ├── invert.rs       # link/heading inversion
//!     └── html.rs         # html5ever producer: HTML string → input tree
//!
//!     Handlers may be asynchronous (a caller handler typically uploads an
//!     asset before it can emit a block reference), so every handler result
//!     is uniformly a boxed future; sibling results are awaited in index
//!     order so output order always matches input order. The lifting and
//!     inversion passes are synchronous whole-tree rewrites run before
//!     traversal starts.
//!
//! Usage
//!
//!     let doc = strictext::convert_html("<h1>Title</h1><p>Body</p>", Options::new()).await?;
//!
//!     Callers can restrict the enabled block types and marks, seed a base
//!     URL for relative links, register per-tag handler overrides (with
//!     access to the built-in defaults for super-calls), and run their own
//!     tree preprocessing composed with the built-in lifting pass.

pub mod context;
pub mod dast;
pub mod error;
pub mod handlers;
pub mod html;
pub mod invert;
pub mod lift;
pub mod options;
pub mod schema;
pub mod tree;
pub mod visit;
pub mod wrap;

pub use context::{Context, Shared};
pub use dast::{DastNode, ListStyle, MetaEntry, StructuredText};
pub use error::ConvertError;
pub use options::Options;
pub use schema::{Mark, NodeType};
pub use tree::{ElementData, NodeData, NodeId, Tree};
pub use visit::{Handled, HandlerFuture, NodeHandler, TagKind, Visitor};

/// Convert an input tree into a structured-text document.
///
/// Runs the caller's preprocess pass (if any), then the built-in
/// link/heading inversion, then the depth-first traversal. Returns `None`
/// when the document produces no content at all.
pub async fn convert(
    mut tree: Tree,
    mut options: Options,
) -> Result<Option<StructuredText>, ConvertError> {
    if let Some(mut preprocess) = options.preprocess.take() {
        preprocess(&mut tree);
    }
    invert::invert_links_with_headings(&mut tree);

    let visitor = Visitor::new(&tree, &options);
    let handled = visitor.dispatch(Tree::ROOT, Context::root()).await?;
    match handled {
        Handled::Node(document) => Ok(Some(StructuredText::new(document))),
        _ => Ok(None),
    }
}

/// Parse an HTML string and convert it in one step.
pub async fn convert_html(
    html_source: &str,
    options: Options,
) -> Result<Option<StructuredText>, ConvertError> {
    convert(html::parse_html(html_source)?, options).await
}
