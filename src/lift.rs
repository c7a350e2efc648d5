//! Block-node relocation with ancestor splitting.
//!
//! An embedded block-level reference (an image destined to become an asset
//! block, say) often sits several levels below its lowest legal insertion
//! point: inside a paragraph, inside a list item, inside a list. Dropping
//! it loses content and keeping it in place produces an illegal tree, so
//! this pass relocates it to the top-level container and faithfully
//! duplicates the structure around the split:
//!
//! ```text
//! root[ul[li[p[a], img, p[b]]]]  →  root[ul[li[p[a]]], img, ul[li[p[b]]]]
//! ```
//!
//! At each ancestor level the child list is split at the relocation point;
//! the "after" portion is re-attached under a fresh clone of the ancestor
//! (same tag and attributes) inserted right after the relocated node's new
//! position, and an ancestor left empty by the split is removed outright.
//! Relocated handles are tracked in a set so a node is processed at most
//! once; a node already at the top level is a no-op, which also makes the
//! pass idempotent.
//!
//! This runs synchronously before traversal, usually through
//! [`crate::Options::with_preprocess`].

use std::collections::HashSet;

use crate::tree::{ElementData, NodeId, Tree};

/// Relocate every element matching `target` to the top-level container.
pub fn lift<F>(tree: &mut Tree, target: F)
where
    F: Fn(&ElementData) -> bool,
{
    let mut relocated: HashSet<NodeId> = HashSet::new();
    // Every relocation strictly reduces the number of deeply-nested
    // matches, so restarting the search from the root terminates.
    while let Some(found) = find_liftable(tree, &target, &relocated) {
        relocate(tree, found, &mut relocated);
    }
}

/// Relocate embedded `img` elements, the common case for asset references.
pub fn lift_images(tree: &mut Tree) {
    lift(tree, |el| el.tag == "img");
}

struct Liftable {
    /// Ancestors of the target, root first; the last entry is its parent.
    ancestors: Vec<NodeId>,
    target: NodeId,
    /// Index of the target within its parent's child list.
    index: usize,
}

fn find_liftable<F>(tree: &Tree, target: &F, relocated: &HashSet<NodeId>) -> Option<Liftable>
where
    F: Fn(&ElementData) -> bool,
{
    let mut chain = vec![Tree::ROOT];
    walk(tree, Tree::ROOT, &mut chain, target, relocated)
}

fn walk<F>(
    tree: &Tree,
    id: NodeId,
    chain: &mut Vec<NodeId>,
    target: &F,
    relocated: &HashSet<NodeId>,
) -> Option<Liftable>
where
    F: Fn(&ElementData) -> bool,
{
    for (index, &child) in tree.children(id).iter().enumerate() {
        let matches = tree
            .element(child)
            .is_some_and(|el| target(el) && !relocated.contains(&child));
        if matches {
            // Directly under the top-level container already: nothing to do.
            if chain.len() > 1 {
                return Some(Liftable {
                    ancestors: chain.clone(),
                    target: child,
                    index,
                });
            }
            continue;
        }
        chain.push(child);
        let found = walk(tree, child, chain, target, relocated);
        chain.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}

fn relocate(tree: &mut Tree, found: Liftable, relocated: &mut HashSet<NodeId>) {
    let Liftable {
        ancestors,
        target,
        index,
    } = found;

    // Detach the target and take the siblings that followed it.
    let Some(&parent) = ancestors.last() else {
        return;
    };
    tree.children_mut(parent).remove(index);
    let mut after: Vec<NodeId> = tree.children_mut(parent).split_off(index);

    // Walk the chain upward. At each level the saved "after" portion moves
    // into a clone of the split ancestor, and the next level's "after"
    // portion is everything following the ancestor (clone included).
    for level in (1..ancestors.len()).rev() {
        let current = ancestors[level];
        let upper = ancestors[level - 1];
        let Some(pos) = tree.position(upper, current) else {
            return;
        };

        if level == 1 {
            // `upper` is the top-level container: insert the relocated
            // node right after its topmost ancestor, then the final clone.
            tree.children_mut(upper).insert(pos + 1, target);
            relocated.insert(target);
            if !after.is_empty() {
                let clone = tree.clone_with_children(current, std::mem::take(&mut after));
                tree.children_mut(upper).insert(pos + 2, clone);
            }
            if tree.children(current).is_empty() {
                tree.children_mut(upper).remove(pos);
            }
        } else {
            if !after.is_empty() {
                let clone = tree.clone_with_children(current, std::mem::take(&mut after));
                tree.children_mut(upper).insert(pos + 1, clone);
            }
            let cut_at = if tree.children(current).is_empty() {
                tree.children_mut(upper).remove(pos);
                pos
            } else {
                pos + 1
            };
            after = tree.children_mut(upper).split_off(cut_at);
        }
    }
}
