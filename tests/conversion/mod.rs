//! End-to-end conversion tests, from HTML source to the serialized document.

use serde_json::json;

use strictext::context::Context;
use strictext::dast::DastNode;
use strictext::error::ConvertError;
use strictext::options::Options;
use strictext::schema::{Mark, NodeType, TOGGLEABLE_BLOCK_TYPES};
use strictext::tree::{NodeId, Tree};
use strictext::visit::{Handled, HandlerFuture, TagKind, Visitor};
use strictext::{convert, convert_html};

use crate::common::{assert_valid_document, el};

fn document_json(doc: &strictext::StructuredText) -> serde_json::Value {
    serde_json::to_value(&doc.document).unwrap()
}

#[tokio::test]
async fn test_simple_paragraph() {
    let doc = convert_html("<p>Hello</p>", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "span", "value": "Hello"}],
            }],
        })
    );
}

#[tokio::test]
async fn test_marks_nest_across_elements() {
    let doc = convert_html(
        "<p><strong>bold <em>both</em></strong></p>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [
                    {"type": "span", "marks": ["strong"], "value": "bold "},
                    {"type": "span", "marks": ["strong", "emphasis"], "value": "both"},
                ],
            }],
        })
    );
}

#[tokio::test]
async fn test_heading_levels() {
    let doc = convert_html("<h1>a</h1><h6>b</h6>", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [
                {"type": "heading", "level": 1, "children": [{"type": "span", "value": "a"}]},
                {"type": "heading", "level": 6, "children": [{"type": "span", "value": "b"}]},
            ],
        })
    );
}

#[tokio::test]
async fn test_nested_list() {
    let doc = convert_html(
        "<ul><li>a<ul><li>b</li></ul></li></ul>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "list",
                "style": "bulleted",
                "children": [{
                    "type": "listItem",
                    "children": [
                        {"type": "paragraph", "children": [{"type": "span", "value": "a"}]},
                        {
                            "type": "list",
                            "style": "bulleted",
                            "children": [{
                                "type": "listItem",
                                "children": [{
                                    "type": "paragraph",
                                    "children": [{"type": "span", "value": "b"}],
                                }],
                            }],
                        },
                    ],
                }],
            }],
        })
    );
}

#[tokio::test]
async fn test_ordered_list_style() {
    let doc = convert_html("<ol><li>one</li></ol>", Options::new())
        .await
        .unwrap()
        .unwrap();
    match &doc.document {
        DastNode::Root { children } => {
            assert!(matches!(
                children[0],
                DastNode::List {
                    style: strictext::ListStyle::Numbered,
                    ..
                }
            ));
        }
        other => panic!("expected root, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stray_list_content_becomes_items() {
    // Text directly inside a list has no legal slot; the list handler wraps
    // it into its own item.
    let doc = convert_html("<ul>stray<li>a</li></ul>", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "list",
                "style": "bulleted",
                "children": [
                    {
                        "type": "listItem",
                        "children": [{
                            "type": "paragraph",
                            "children": [{"type": "span", "value": "stray"}],
                        }],
                    },
                    {
                        "type": "listItem",
                        "children": [{
                            "type": "paragraph",
                            "children": [{"type": "span", "value": "a"}],
                        }],
                    },
                ],
            }],
        })
    );
}

#[tokio::test]
async fn test_blockquote_wraps_inline_content() {
    let doc = convert_html("<blockquote>quoted</blockquote>", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_valid_document(&doc);
    let json = document_json(&doc);
    assert_eq!(
        json,
        json!({
            "type": "root",
            "children": [{
                "type": "blockquote",
                "children": [{
                    "type": "paragraph",
                    "children": [{"type": "span", "value": "quoted"}],
                }],
            }],
        })
    );
    // No attribution key when unset.
    assert!(json["children"][0].get("attribution").is_none());
}

#[tokio::test]
async fn test_code_block_language_and_trailing_newline() {
    let doc = convert_html(
        "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "code",
                "language": "rust",
                "code": "fn main() {}",
            }],
        })
    );
}

#[tokio::test]
async fn test_code_block_custom_class_prefix() {
    let doc = convert_html(
        "<pre class=\"lang-rb\">puts 1</pre>",
        Options::new().with_code_prefix("lang-"),
    )
    .await
    .unwrap()
    .unwrap();
    match &doc.document {
        DastNode::Root { children } => match &children[0] {
            DastNode::Code { language, code, .. } => {
                assert_eq!(language.as_deref(), Some("rb"));
                assert_eq!(code, "puts 1");
            }
            other => panic!("expected code, got {other:?}"),
        },
        other => panic!("expected root, got {other:?}"),
    }
}

#[tokio::test]
async fn test_document_base_resolves_relative_links() {
    let doc = convert_html(
        "<head><base href=\"https://example.com/docs/\"></head>\
         <body><p><a href=\"guide/intro\">intro</a></p></body>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc)["children"][0]["children"][0]["url"],
        json!("https://example.com/docs/guide/intro")
    );
}

#[tokio::test]
async fn test_caller_base_wins_over_document_base() {
    let doc = convert_html(
        "<head><base href=\"https://ignored.example/\"></head>\
         <body><p><a href=\"/a\">x</a></p></body>",
        Options::new().with_base_url("https://example.com".parse().unwrap()),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc)["children"][0]["children"][0]["url"],
        json!("https://example.com/a")
    );
}

#[tokio::test]
async fn test_link_meta_from_target_and_rel() {
    let doc = convert_html(
        "<p><a href=\"https://example.com\" target=\"_blank\" rel=\"nofollow\">x</a></p>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc)["children"][0]["children"][0]["meta"],
        json!([
            {"id": "target", "value": "_blank"},
            {"id": "rel", "value": "nofollow"},
        ])
    );
}

#[tokio::test]
async fn test_disabled_heading_demotes_to_paragraph() {
    let options = Options::new().with_allowed_blocks(
        TOGGLEABLE_BLOCK_TYPES
            .iter()
            .copied()
            .filter(|&t| t != NodeType::Heading),
    );
    let doc = convert_html("<h1>Title</h1>", options).await.unwrap().unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "span", "value": "Title"}],
            }],
        })
    );
}

#[tokio::test]
async fn test_disabled_link_is_transparent() {
    let options = Options::new().with_allowed_blocks(
        TOGGLEABLE_BLOCK_TYPES
            .iter()
            .copied()
            .filter(|&t| t != NodeType::Link),
    );
    let doc = convert_html("<p><a href=\"/x\">t</a></p>", options)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "span", "value": "t"}],
            }],
        })
    );
}

#[tokio::test]
async fn test_disabled_mark_is_dropped() {
    let doc = convert_html(
        "<p><strong><em>x</em></strong></p>",
        Options::new().with_allowed_marks([Mark::Emphasis]),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc)["children"][0]["children"][0],
        json!({"type": "span", "marks": ["emphasis"], "value": "x"})
    );
}

#[tokio::test]
async fn test_unknown_elements_are_transparent() {
    let doc = convert_html(
        "<div><section><p>x</p></section></div>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "span", "value": "x"}],
            }],
        })
    );
}

#[tokio::test]
async fn test_noop_subtrees_are_dropped() {
    let doc = convert_html(
        "<p>a</p><script>var x = 1;</script><style>p { color: red }</style>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "span", "value": "a"}],
            }],
        })
    );
}

#[tokio::test]
async fn test_empty_input_yields_no_document() {
    assert!(convert_html("", Options::new()).await.unwrap().is_none());
    assert!(convert_html("<script>x</script>", Options::new())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_whitespace_only_text_is_still_wrapped() {
    // A degenerate document whose only content is a whitespace span still
    // comes out as a paragraph; content is never silently dropped.
    let mut tree = Tree::new();
    tree.text_in(Tree::ROOT, " ");
    let doc = convert(tree, Options::new()).await.unwrap().unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "span", "value": " "}],
            }],
        })
    );
}

#[tokio::test]
async fn test_block_inside_heading_is_demoted() {
    let mut tree = Tree::new();
    let h2 = el(&mut tree, Tree::ROOT, "h2");
    tree.text_in(h2, "a");
    let p = el(&mut tree, h2, "p");
    tree.text_in(p, "b");

    let doc = convert(tree, Options::new()).await.unwrap().unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "heading",
                "level": 2,
                "children": [
                    {"type": "span", "value": "a"},
                    {"type": "span", "value": "b"},
                ],
            }],
        })
    );
}

#[tokio::test]
async fn test_heading_inside_list_item_is_demoted() {
    let mut tree = Tree::new();
    let ul = el(&mut tree, Tree::ROOT, "ul");
    let li = el(&mut tree, ul, "li");
    let h1 = el(&mut tree, li, "h1");
    tree.text_in(h1, "a");

    let doc = convert(tree, Options::new()).await.unwrap().unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "list",
                "style": "bulleted",
                "children": [{
                    "type": "listItem",
                    "children": [{
                        "type": "paragraph",
                        "children": [{"type": "span", "value": "a"}],
                    }],
                }],
            }],
        })
    );
}

#[tokio::test]
async fn test_horizontal_rule_and_line_break() {
    let doc = convert_html("<p>a<br>b</p><hr><p>c</p>", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [
                {
                    "type": "paragraph",
                    "children": [
                        {"type": "span", "value": "a"},
                        {"type": "span", "value": "\n"},
                        {"type": "span", "value": "b"},
                    ],
                },
                {"type": "thematicBreak"},
                {
                    "type": "paragraph",
                    "children": [{"type": "span", "value": "c"}],
                },
            ],
        })
    );
}

fn handle_marquee<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    // Delegate to the built-in paragraph handler.
    v.default_handler(TagKind::Paragraph)(v, node, ctx)
}

#[tokio::test]
async fn test_override_delegating_to_default_handler() {
    let doc = convert_html(
        "<marquee>hi</marquee>",
        Options::new().with_handler("marquee", handle_marquee),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [{"type": "span", "value": "hi"}],
            }],
        })
    );
}

fn handle_boom<'a>(_v: &'a Visitor<'a>, _node: NodeId, _ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move { Err(ConvertError::Handler("boom".to_string())) })
}

#[tokio::test]
async fn test_failing_override_aborts_the_conversion() {
    let err = convert_html(
        "<p>a</p><p>b</p>",
        Options::new().with_handler_fn("p", handle_boom),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ConvertError::Handler(msg) if msg == "boom"));
}

fn handle_token<'a>(v: &'a Visitor<'a>, node: NodeId, _ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        let delay = v
            .tree()
            .attr(node, "delay")
            .and_then(|d| d.parse::<u64>().ok())
            .unwrap_or(0);
        let value = v.tree().attr(node, "value").unwrap_or("").to_string();
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        // One input token fans out into one span per comma-separated part.
        let spans = value.split(',').map(DastNode::span).collect();
        Ok(Handled::Nodes(spans))
    })
}

#[tokio::test]
async fn test_sibling_order_survives_slow_handlers() {
    // The first token takes the longest and the middle one fans out into
    // two nodes; output order must still follow input order, not
    // completion order.
    let mut tree = Tree::new();
    for (value, delay) in [("a", "30"), ("b1,b2", "15"), ("c", "0")] {
        tree.element_in(
            Tree::ROOT,
            "token",
            vec![
                ("value".to_string(), value.to_string()),
                ("delay".to_string(), delay.to_string()),
            ],
        );
    }

    let doc = convert(tree, Options::new().with_handler_fn("token", handle_token))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [
                    {"type": "span", "value": "a"},
                    {"type": "span", "value": "b1"},
                    {"type": "span", "value": "b2"},
                    {"type": "span", "value": "c"},
                ],
            }],
        })
    );
}

fn handle_mention<'a>(v: &'a Visitor<'a>, node: NodeId, ctx: Context) -> HandlerFuture<'a> {
    Box::pin(async move {
        if !strictext::schema::legal_after_wrapping(ctx.parent_node_type, NodeType::InlineItem) {
            return Ok(Handled::Skip);
        }
        let item = v.tree().attr(node, "data-id").unwrap_or("").to_string();
        Ok(Handled::Node(DastNode::InlineItem { item }))
    })
}

#[tokio::test]
async fn test_inline_item_override_joins_the_run() {
    let mut tree = Tree::new();
    let p = el(&mut tree, Tree::ROOT, "p");
    tree.text_in(p, "hi ");
    tree.element_in(
        p,
        "x-mention",
        vec![("data-id".to_string(), "user-7".to_string())],
    );

    let doc = convert(
        tree,
        Options::new().with_handler_fn("x-mention", handle_mention),
    )
    .await
    .unwrap()
    .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [
                    {"type": "span", "value": "hi "},
                    {"type": "inlineItem", "item": "user-7"},
                ],
            }],
        })
    );
}

fn handle_embed<'a>(v: &'a Visitor<'a>, node: NodeId, _ctx: Context) -> HandlerFuture<'a> {
    // Deliberately skips the legality check a well-behaved override does.
    Box::pin(async move {
        let item = v.tree().attr(node, "data-id").unwrap_or("").to_string();
        Ok(Handled::Node(DastNode::Block { item }))
    })
}

#[tokio::test]
async fn test_unchecked_block_override_inside_list_stays_valid() {
    let mut tree = Tree::new();
    let ul = el(&mut tree, Tree::ROOT, "ul");
    let li = el(&mut tree, ul, "li");
    tree.text_in(li, "a");
    tree.element_in(
        ul,
        "x-embed",
        vec![("data-id".to_string(), "asset-9".to_string())],
    );

    let doc = convert(
        tree,
        Options::new().with_handler_fn("x-embed", handle_embed),
    )
    .await
    .unwrap()
    .unwrap();
    // The stray block cannot live inside a list item, so the list keeps
    // only its legal items and still validates.
    assert_valid_document(&doc);
    assert_eq!(
        document_json(&doc),
        json!({
            "type": "root",
            "children": [{
                "type": "list",
                "style": "bulleted",
                "children": [{
                    "type": "listItem",
                    "children": [{
                        "type": "paragraph",
                        "children": [{"type": "span", "value": "a"}],
                    }],
                }],
            }],
        })
    );
}

#[tokio::test]
async fn test_preprocess_runs_before_conversion() {
    let options = Options::new().with_preprocess(|tree: &mut Tree| {
        let extra = tree.new_text("appended");
        let p = tree.new_element("p", Vec::new());
        tree.append_child(p, extra);
        tree.append_child(Tree::ROOT, p);
    });
    let doc = convert_html("<p>first</p>", options).await.unwrap().unwrap();
    let json = document_json(&doc);
    assert_eq!(json["children"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["children"][1]["children"][0]["value"],
        json!("appended")
    );
}
