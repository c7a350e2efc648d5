//! Built-in per-type handlers.
//!
//! Every structural handler follows the same state-machine pattern over the
//! logical parent type: consult the constraint table ("is my type a legal
//! child of the current parent, and is it enabled by configuration?"). If
//! yes, recurse into children with the parent type narrowed to this node's
//! type and wrap the result. If no, recurse with the context *unchanged*
//! and return the children bare: the node is demoted, its content
//! survives, its structure does not.
//!
//! Inline-formatting elements are the degenerate case of that pattern: they
//! are transparent either way, and only differ in whether they push their
//! mark onto the context. Void elements (`hr`, `base`) check legality and
//! emit or drop themselves.

use crate::context::Context;
use crate::dast::{DastNode, ListStyle, MetaEntry};
use crate::schema::{self, Mark, NodeType};
use crate::tree::{NodeData, NodeId};
use crate::visit::{Handled, HandlerFuture, NodeHandler, TagKind, Visitor};
use crate::wrap::{wrap_inline_runs, wrap_list_items};

/// The built-in handler for an element kind. The match is exhaustive over
/// the closed [`TagKind`] union, so adding a kind without a handler fails
/// at compile time.
pub fn default_for(kind: TagKind) -> NodeHandler {
    match kind {
        TagKind::Paragraph => paragraph,
        TagKind::Heading => heading,
        TagKind::UnorderedList | TagKind::OrderedList => list,
        TagKind::ListItem => list_item,
        TagKind::Blockquote => blockquote,
        TagKind::Preformatted => code_block,
        TagKind::Anchor => link,
        TagKind::Base => base,
        TagKind::HorizontalRule => thematic_break,
        TagKind::LineBreak => line_break,
        TagKind::Strong => strong,
        TagKind::Emphasis => emphasis,
        TagKind::Underline => underline,
        TagKind::InlineCode => inline_code,
        TagKind::Strikethrough => strikethrough,
        TagKind::Highlight => highlight,
        TagKind::Noop => noop,
        TagKind::Other => fallback,
    }
}

/// Root handler: visits children under the root parent type and wraps any
/// stray inline runs so the root's child sequence is always block-only.
pub fn root<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let children = v
            .visit_children(node, &ctx.with_parent(NodeType::Root))
            .await?;
        let children = wrap_inline_runs(children);
        if children.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::Root { children }))
    })
}

/// Text handler: emits a span carrying the context's accumulated marks.
/// Text is never dropped here; positioning problems are solved by the
/// wrapper and the structural handlers, not by discarding content.
pub fn text<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let value = match v.tree().data(node) {
            NodeData::Text(value) => value.clone(),
            _ => return Ok(Handled::Skip),
        };
        Ok(Handled::Node(DastNode::span_with_marks(value, ctx.marks)))
    })
}

/// Generic fallback: the element is transparent, its children are visited
/// with the context unchanged. This is also what demotion looks like.
pub fn fallback<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(Handled::Nodes(v.visit_children(node, &ctx).await?)) })
}

/// Noop handler: the element and its entire subtree are dropped.
pub fn noop<'a>(_v: &'a Visitor<'a>, _node: NodeId, _ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(Handled::Skip) })
}

pub fn paragraph<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        if !schema::legal_child(ctx.parent_node_type, NodeType::Paragraph) {
            return fallback(v, node, ctx).await;
        }
        let children = v
            .visit_children(node, &ctx.with_parent(NodeType::Paragraph))
            .await?;
        if children.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::Paragraph { children }))
    })
}

pub fn heading<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let allowed = v.block_enabled(NodeType::Heading)
            && schema::legal_child(ctx.parent_node_type, NodeType::Heading);
        if !allowed {
            return fallback(v, node, ctx).await;
        }
        let level = heading_level(v.tree().tag(node).unwrap_or("h1"));
        let children = v
            .visit_children(node, &ctx.with_parent(NodeType::Heading))
            .await?;
        if children.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::Heading { level, children }))
    })
}

fn heading_level(tag: &str) -> u8 {
    tag.strip_prefix('h')
        .and_then(|level| level.parse::<u8>().ok())
        .unwrap_or(1)
        .clamp(1, 6)
}

pub fn list<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let allowed = v.block_enabled(NodeType::List)
            && schema::legal_child(ctx.parent_node_type, NodeType::List);
        if !allowed {
            return fallback(v, node, ctx).await;
        }
        let style = match v.tree().tag(node) {
            Some("ol") => ListStyle::Numbered,
            _ => ListStyle::Bulleted,
        };
        let children = v
            .visit_children(node, &ctx.with_parent(NodeType::List))
            .await?;
        let children = wrap_list_items(children);
        if children.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::List { style, children }))
    })
}

pub fn list_item<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        if !schema::legal_child(ctx.parent_node_type, NodeType::ListItem) {
            return fallback(v, node, ctx).await;
        }
        let children = v
            .visit_children(node, &ctx.with_parent(NodeType::ListItem))
            .await?;
        let children = wrap_inline_runs(children);
        if children.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::ListItem { children }))
    })
}

pub fn blockquote<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let allowed = v.block_enabled(NodeType::Blockquote)
            && schema::legal_child(ctx.parent_node_type, NodeType::Blockquote);
        if !allowed {
            return fallback(v, node, ctx).await;
        }
        let children = v
            .visit_children(node, &ctx.with_parent(NodeType::Blockquote))
            .await?;
        let children = wrap_inline_runs(children);
        if children.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::Blockquote {
            attribution: None,
            children,
        }))
    })
}

/// Code block (`pre`): the content is the concatenated descendant text with
/// trailing newlines trimmed. The language comes from a class-name
/// convention: a `<prefix><lang>` class on the `pre` itself or on a direct
/// `code` child, with the prefix configurable (default `language-`).
pub fn code_block<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let allowed = v.block_enabled(NodeType::Code)
            && schema::legal_child(ctx.parent_node_type, NodeType::Code);
        if !allowed {
            return fallback(v, node, ctx).await;
        }
        let mut code = String::new();
        v.tree().collect_text(node, &mut code);
        let code = code.trim_end_matches('\n').to_string();
        if code.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::Code {
            language: detect_language(v, node),
            highlight: None,
            code,
        }))
    })
}

fn detect_language(v: &Visitor<'_>, node: NodeId) -> Option<String> {
    let prefix = v.options().code_prefix.as_str();
    if let Some(lang) = language_from_class(v.tree().attr(node, "class"), prefix) {
        return Some(lang);
    }
    v.tree()
        .children(node)
        .iter()
        .find(|&&child| v.tree().tag(child) == Some("code"))
        .and_then(|&code| language_from_class(v.tree().attr(code, "class"), prefix))
}

fn language_from_class(class: Option<&str>, prefix: &str) -> Option<String> {
    class?
        .split_ascii_whitespace()
        .find_map(|token| token.strip_prefix(prefix))
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Anchor handler.
///
/// The inverter pre-pass has already restructured anchors that wrapped
/// headings; if direct-child headings are still present the anchor is no
/// longer eligible for the link slot and is simply transparent, letting the
/// promoted headings decide their own legality. Otherwise the anchor
/// becomes a link wherever an inline run can legally end up, resolving a
/// relative href against the shared base URL.
pub fn link<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let wraps_heading = v
            .tree()
            .children(node)
            .iter()
            .any(|&child| is_heading_tag(v.tree().tag(child)));
        if wraps_heading {
            return fallback(v, node, ctx).await;
        }

        let href = match v.tree().attr(node, "href") {
            Some(href) => href.to_string(),
            None => return fallback(v, node, ctx).await,
        };
        let allowed = v.block_enabled(NodeType::Link)
            && schema::legal_after_wrapping(ctx.parent_node_type, NodeType::Link);
        if !allowed {
            return fallback(v, node, ctx).await;
        }

        let children = v
            .visit_children(node, &ctx.with_parent(NodeType::Link))
            .await?;
        if children.is_empty() {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::Link {
            url: v.shared().resolve(&href),
            meta: link_meta(v, node),
            children,
        }))
    })
}

fn is_heading_tag(tag: Option<&str>) -> bool {
    matches!(tag, Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6"))
}

fn link_meta(v: &Visitor<'_>, node: NodeId) -> Option<Vec<MetaEntry>> {
    let mut meta = Vec::new();
    for key in ["target", "rel"] {
        if let Some(value) = v.tree().attr(node, key) {
            meta.push(MetaEntry {
                id: key.to_string(),
                value: value.to_string(),
            });
        }
    }
    if meta.is_empty() {
        None
    } else {
        Some(meta)
    }
}

/// `<base>`: records the document's base URL in the shared slot (first
/// write wins, and a caller-seeded base takes precedence) and emits nothing.
pub fn base<'a>(v: &'a Visitor<'a>, node: NodeId, _ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        if let Some(href) = v.tree().attr(node, "href") {
            if let Ok(url) = url::Url::parse(href) {
                v.shared().set_base_url(url);
            }
        }
        Ok(Handled::Skip)
    })
}

pub fn thematic_break<'a>(v: &'a Visitor<'a>, _node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let allowed = v.block_enabled(NodeType::ThematicBreak)
            && schema::legal_child(ctx.parent_node_type, NodeType::ThematicBreak);
        if !allowed {
            return Ok(Handled::Skip);
        }
        Ok(Handled::Node(DastNode::ThematicBreak))
    })
}

/// `<br>` becomes a newline span, marks included like any other text.
pub fn line_break<'a>(_v: &'a Visitor<'a>, _node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(Handled::Node(DastNode::span_with_marks("\n", ctx.marks))) })
}

fn mark_element<'a>(
    v: &'a Visitor<'a>,
    node: NodeId,
    ctx: Context,
    mark: Mark,
) -> HandlerFuture<'a> {
    Box::pin(async move {
        let ctx = if v.mark_enabled(mark) {
            ctx.with_mark(mark)
        } else {
            ctx
        };
        Ok(Handled::Nodes(v.visit_children(node, &ctx).await?))
    })
}

pub fn strong<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    mark_element(v, node, ctx, Mark::Strong)
}

pub fn emphasis<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    mark_element(v, node, ctx, Mark::Emphasis)
}

pub fn underline<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    mark_element(v, node, ctx, Mark::Underline)
}

pub fn inline_code<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    mark_element(v, node, ctx, Mark::Code)
}

pub fn strikethrough<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    mark_element(v, node, ctx, Mark::Strikethrough)
}

pub fn highlight<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    mark_element(v, node, ctx, Mark::Highlight)
}
