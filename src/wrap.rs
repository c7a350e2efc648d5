//! Paragraph-wrapping of stray inline runs.
//!
//! Block-only positions (the root, list items, blockquotes) reject bare
//! inline content, but input documents put text and links there all the
//! time. Instead of dropping that content, every maximal run of consecutive
//! inline nodes in a sibling sequence is folded into one synthetic
//! paragraph; block nodes pass through untouched and order is preserved.
//! Whitespace-only spans are wrapped like any other content; silently
//! dropping them could leave an empty document at the boundary.

use crate::dast::DastNode;

/// Replace every maximal run of inline nodes with a synthetic paragraph.
///
/// Applying this to an already-wrapped sequence is a no-op: paragraphs are
/// block nodes and pass straight through.
pub fn wrap_inline_runs(nodes: Vec<DastNode>) -> Vec<DastNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run: Vec<DastNode> = Vec::new();

    for node in nodes {
        if node.is_inline() {
            run.push(node);
        } else {
            flush_paragraph(&mut run, &mut out);
            out.push(node);
        }
    }
    flush_paragraph(&mut run, &mut out);
    out
}

fn flush_paragraph(run: &mut Vec<DastNode>, out: &mut Vec<DastNode>) {
    if !run.is_empty() {
        out.push(DastNode::Paragraph {
            children: std::mem::take(run),
        });
    }
}

/// Normalize a list's prospective children to list items.
///
/// List items pass through. Runs of inline content become one list item
/// holding one synthetic paragraph. A stray paragraph or nested list gets a
/// list item of its own; those are the only block types a list item
/// accepts, so any other stray block (a caller override emitting one under
/// a list parent, say) is demoted to its inline content and joins the
/// surrounding run instead. Lists only ever accept list items, so this is
/// the list handler's counterpart of [`wrap_inline_runs`].
pub fn wrap_list_items(nodes: Vec<DastNode>) -> Vec<DastNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run: Vec<DastNode> = Vec::new();

    for node in nodes {
        match node {
            DastNode::ListItem { .. } => {
                flush_list_item(&mut run, &mut out);
                out.push(node);
            }
            DastNode::Paragraph { .. } | DastNode::List { .. } => {
                flush_list_item(&mut run, &mut out);
                out.push(DastNode::ListItem {
                    children: vec![node],
                });
            }
            inline if inline.is_inline() => run.push(inline),
            stray => demote_to_run(stray, &mut run),
        }
    }
    flush_list_item(&mut run, &mut out);
    out
}

/// Demote a node to its inline content, appending it to `run`. Nodes with
/// no inline content (thematic breaks, block references) disappear.
fn demote_to_run(node: DastNode, run: &mut Vec<DastNode>) {
    match node {
        DastNode::Span { .. } | DastNode::Link { .. } | DastNode::InlineItem { .. } => {
            run.push(node);
        }
        DastNode::Code { code, .. } => run.push(DastNode::span(code)),
        DastNode::Block { .. } | DastNode::ThematicBreak => {}
        DastNode::Root { children }
        | DastNode::Paragraph { children }
        | DastNode::Heading { children, .. }
        | DastNode::List { children, .. }
        | DastNode::ListItem { children }
        | DastNode::Blockquote { children, .. } => {
            for child in children {
                demote_to_run(child, run);
            }
        }
    }
}

fn flush_list_item(run: &mut Vec<DastNode>, out: &mut Vec<DastNode>) {
    if !run.is_empty() {
        out.push(DastNode::ListItem {
            children: vec![DastNode::Paragraph {
                children: std::mem::take(run),
            }],
        });
    }
}
