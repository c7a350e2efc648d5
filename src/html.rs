//! HTML producer: parses an HTML string into the engine's input tree.
//!
//! Parsing uses `html5ever` with the `markup5ever_rcdom` DOM (a
//! browser-grade, WHATWG-compliant parser that handles malformed input
//! gracefully) and then flattens the reference-counted DOM into the arena
//! [`Tree`]. Comments, doctypes and processing instructions are dropped;
//! everything else (including `head`, so a `<base href>` can be
//! discovered) is carried over.
//!
//! A whitespace-minification pass then collapses the indentation noise
//! HTML sources are full of: runs of whitespace become single spaces,
//! text at block boundaries is trimmed, and whitespace-only text nodes
//! survive only between two pieces of phrasing content. Content inside
//! `pre` is preserved untouched.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as DomData, RcDom};

use crate::error::ConvertError;
use crate::tree::{NodeData, NodeId, Tree};

/// Parse an HTML string into an input tree rooted at the document.
pub fn parse_html(html: &str) -> Result<Tree, ConvertError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| ConvertError::Parse(e.to_string()))?;

    let mut tree = Tree::new();
    convert_children(&dom.document, &mut tree, Tree::ROOT);
    minify_whitespace(&mut tree);
    Ok(tree)
}

fn convert_children(handle: &Handle, tree: &mut Tree, parent: NodeId) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            DomData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref().to_ascii_lowercase();
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.as_ref().to_string(), a.value.to_string()))
                    .collect();
                let id = tree.element_in(parent, tag, attrs);
                convert_children(child, tree, id);
            }
            DomData::Text { contents } => {
                tree.text_in(parent, contents.borrow().to_string());
            }
            _ => {}
        }
    }
}

/// Tags whose contents render inline; used to decide which whitespace-only
/// text nodes are significant.
const PHRASING_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "img", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strike", "strong", "sub", "sup", "time", "u",
    "var", "wbr", "del", "ins",
];

fn is_phrasing(tree: &Tree, id: NodeId) -> bool {
    match tree.data(id) {
        NodeData::Text(_) => true,
        NodeData::Element(el) => PHRASING_TAGS.contains(&el.tag.as_str()),
        NodeData::Root => false,
    }
}

/// Collapse and strip insignificant whitespace across the whole tree.
pub fn minify_whitespace(tree: &mut Tree) {
    minify_node(tree, Tree::ROOT, false);
}

fn minify_node(tree: &mut Tree, id: NodeId, preformatted: bool) {
    if preformatted {
        return;
    }
    let children = tree.children(id).to_vec();
    let parent_is_phrasing = is_phrasing(tree, id);
    let mut kept = Vec::with_capacity(children.len());

    for (i, &child) in children.iter().enumerate() {
        match tree.data(child) {
            NodeData::Text(value) => {
                let collapsed = collapse_whitespace(value);
                let prev_inline = i
                    .checked_sub(1)
                    .map(|p| is_phrasing(tree, children[p]))
                    .unwrap_or(parent_is_phrasing);
                let next_inline = children
                    .get(i + 1)
                    .map(|&n| is_phrasing(tree, n))
                    .unwrap_or(parent_is_phrasing);

                if collapsed.trim().is_empty() {
                    // Whitespace between two pieces of phrasing content is
                    // significant, everything else is indentation noise.
                    if prev_inline && next_inline {
                        *tree.data_mut(child) = NodeData::Text(" ".to_string());
                        kept.push(child);
                    }
                    continue;
                }

                let mut text = collapsed;
                if !prev_inline {
                    text = text.trim_start().to_string();
                }
                if !next_inline {
                    text = text.trim_end().to_string();
                }
                if text.is_empty() {
                    continue;
                }
                *tree.data_mut(child) = NodeData::Text(text);
                kept.push(child);
            }
            _ => {
                let pre = tree.tag(child) == Some("pre");
                minify_node(tree, child, pre);
                kept.push(child);
            }
        }
    }
    tree.set_children(id, kept);
}

fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_whitespace = false;
    for ch in value.chars() {
        if ch.is_ascii_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}
