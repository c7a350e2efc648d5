//! The context value threaded through every dispatch, plus the one
//! process-wide shared slot.
//!
//! A `Context` is a value, not shared state: each recursive call derives a
//! fresh one from its parent's, overriding only what changes (the logical
//! parent type when a structural node introduces a boundary, the mark set
//! when a formatting element is entered). Nothing ever aliases a context
//! back up the call chain.
//!
//! `Shared` is the deliberate exception: a single write-once slot for the
//! base URL discovered by the `<base>` handler (or seeded by the caller),
//! read by every link handler afterwards. Traversal is depth-first and
//! deterministic, so first-write-wins is well defined.

use std::cell::OnceCell;

use url::Url;

use crate::schema::{Mark, NodeType};

/// Immutable-per-call dispatch context.
#[derive(Debug, Clone)]
pub struct Context {
    /// The target-schema type the output of this dispatch will nest under.
    pub parent_node_type: NodeType,
    /// Inline marks accumulated on the way down, in entry order, deduplicated.
    pub marks: Vec<Mark>,
}

impl Context {
    /// Context for dispatching the document root.
    pub fn root() -> Self {
        Context {
            parent_node_type: NodeType::Root,
            marks: Vec::new(),
        }
    }

    /// Derive a context with a narrowed logical parent type.
    pub fn with_parent(&self, parent_node_type: NodeType) -> Self {
        Context {
            parent_node_type,
            marks: self.marks.clone(),
        }
    }

    /// Derive a context with one more accumulated mark.
    pub fn with_mark(&self, mark: Mark) -> Self {
        let mut marks = self.marks.clone();
        if !marks.contains(&mark) {
            marks.push(mark);
        }
        Context {
            parent_node_type: self.parent_node_type,
            marks,
        }
    }
}

/// Process-wide state shared across one conversion run.
#[derive(Debug, Default)]
pub struct Shared {
    base_url: OnceCell<Url>,
}

impl Shared {
    pub fn new() -> Self {
        Shared::default()
    }

    /// Record the base URL. The first write wins; later writes are ignored.
    pub fn set_base_url(&self, url: Url) {
        let _ = self.base_url.set(url);
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.get()
    }

    /// Resolve an href against the base URL. Absolute URLs pass through
    /// untouched; relative ones join the base when one is known, and fall
    /// back to the raw href otherwise.
    pub fn resolve(&self, href: &str) -> String {
        match Url::parse(href) {
            Ok(_) => href.to_string(),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .get()
                .and_then(|base| base.join(href).ok())
                .map(|joined| joined.to_string())
                .unwrap_or_else(|| href.to_string()),
            Err(_) => href.to_string(),
        }
    }
}
