//! Conversion configuration.

use std::collections::{HashMap, HashSet};

use url::Url;

use crate::schema::{Mark, NodeType};
use crate::tree::Tree;
use crate::visit::{HandlerFuture, NodeHandler, OverrideHandler};

/// Caller-supplied whole-tree mutation run before traversal, composable
/// with the built-in lifting pass (see [`crate::lift`]).
pub type Preprocess = Box<dyn FnMut(&mut Tree)>;

/// Configuration for one conversion run.
///
/// The defaults enable every block type and every mark. Handlers registered
/// under a tag name are consulted before the built-in defaults and can call
/// back into them through [`crate::Visitor::default_handler`].
pub struct Options {
    /// Block types eligible for promotion; excluded types are silently
    /// demoted to their content.
    pub allowed_blocks: HashSet<NodeType>,
    /// Marks that may reach spans; others are dropped at the formatting
    /// element.
    pub allowed_marks: HashSet<Mark>,
    /// Caller overrides, keyed by input tag name.
    pub handlers: HashMap<String, OverrideHandler>,
    /// Class-name prefix used to detect a code block's language.
    pub code_prefix: String,
    /// Seed base URL for relative link resolution. A `<base href>` in the
    /// input only takes effect when no seed is given.
    pub base_url: Option<Url>,
    /// Whole-tree mutation run before the built-in pre-passes.
    pub preprocess: Option<Preprocess>,
}

impl Options {
    pub fn new() -> Self {
        Options {
            allowed_blocks: crate::schema::TOGGLEABLE_BLOCK_TYPES.iter().copied().collect(),
            allowed_marks: Mark::ALL.iter().copied().collect(),
            handlers: HashMap::new(),
            code_prefix: "language-".to_string(),
            base_url: None,
            preprocess: None,
        }
    }

    /// Restrict the enabled block types.
    pub fn with_allowed_blocks(mut self, blocks: impl IntoIterator<Item = NodeType>) -> Self {
        self.allowed_blocks = blocks.into_iter().collect();
        self
    }

    /// Restrict the enabled marks.
    pub fn with_allowed_marks(mut self, marks: impl IntoIterator<Item = Mark>) -> Self {
        self.allowed_marks = marks.into_iter().collect();
        self
    }

    /// Register a handler override for a tag.
    pub fn with_handler<F>(mut self, tag: impl Into<String>, handler: F) -> Self
    where
        F: for<'a> Fn(&'a crate::Visitor<'a>, crate::NodeId, crate::Context) -> HandlerFuture<'a>
            + 'static,
    {
        self.handlers.insert(tag.into(), Box::new(handler));
        self
    }

    /// Register a plain-function handler override for a tag.
    pub fn with_handler_fn(mut self, tag: impl Into<String>, handler: NodeHandler) -> Self {
        self.handlers.insert(tag.into(), Box::new(handler));
        self
    }

    /// Set the class-name prefix used for code-language detection.
    pub fn with_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_prefix = prefix.into();
        self
    }

    /// Seed the base URL used to resolve relative links.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Run a caller tree-mutation pass before traversal.
    pub fn with_preprocess(mut self, preprocess: impl FnMut(&mut Tree) + 'static) -> Self {
        self.preprocess = Some(Box::new(preprocess));
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
