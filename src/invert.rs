//! Link/heading inversion.
//!
//! The target schema forbids block content inside inline link nodes, but
//! input documents happily wrap headings in anchors:
//!
//! ```text
//! a[h1["x"], "y"]  →  a[ h1[a["x"]], a["y"] ]
//! ```
//!
//! Each direct-child heading is kept as the outer node, now wrapping a
//! clone of the anchor around the heading's former children. Runs of
//! intervening non-heading siblings are gathered under their own anchor
//! clone so no content is lost. The original anchor keeps its place but
//! now contains structural nodes, so the anchor handler treats it as
//! transparent and the promoted headings settle their own legality.
//!
//! Detection is deliberately shallow: only headings that are *direct*
//! children of the anchor are inverted. Deeper detection would change the
//! output for existing content, so the limitation is kept as-is.
//!
//! Runs synchronously over the whole tree before traversal begins.

use crate::tree::{NodeId, Tree};

/// Rewrite every anchor that directly wraps one or more headings.
pub fn invert_links_with_headings(tree: &mut Tree) {
    let mut anchors = Vec::new();
    collect_anchors(tree, Tree::ROOT, &mut anchors);

    for anchor in anchors {
        if tree
            .children(anchor)
            .iter()
            .any(|&child| is_heading(tree, child))
        {
            invert_anchor(tree, anchor);
        }
    }
}

fn collect_anchors(tree: &Tree, id: NodeId, out: &mut Vec<NodeId>) {
    for &child in tree.children(id) {
        if tree.tag(child) == Some("a") {
            out.push(child);
        }
        collect_anchors(tree, child, out);
    }
}

fn is_heading(tree: &Tree, id: NodeId) -> bool {
    matches!(
        tree.tag(id),
        Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    )
}

fn invert_anchor(tree: &mut Tree, anchor: NodeId) {
    let old_children = std::mem::take(tree.children_mut(anchor));
    let mut rebuilt = Vec::with_capacity(old_children.len());
    let mut run: Vec<NodeId> = Vec::new();

    for child in old_children {
        if is_heading(tree, child) {
            flush_run(tree, anchor, &mut run, &mut rebuilt);
            // The heading becomes the outer node; its former children move
            // into a fresh clone of the anchor nested inside it.
            let former = std::mem::take(tree.children_mut(child));
            let inner = tree.clone_with_children(anchor, former);
            tree.children_mut(child).push(inner);
            rebuilt.push(child);
        } else {
            run.push(child);
        }
    }
    flush_run(tree, anchor, &mut run, &mut rebuilt);
    tree.set_children(anchor, rebuilt);
}

fn flush_run(tree: &mut Tree, anchor: NodeId, run: &mut Vec<NodeId>, out: &mut Vec<NodeId>) {
    if !run.is_empty() {
        let clone = tree.clone_with_children(anchor, std::mem::take(run));
        out.push(clone);
    }
}
