//! Paragraph wrapping of stray inline content.

use serde_json::json;

use strictext::convert_html;
use strictext::dast::DastNode;
use strictext::options::Options;
use strictext::wrap::wrap_inline_runs;

use crate::common::assert_valid_document;

#[tokio::test]
async fn test_bare_text_at_root_is_wrapped() {
    let doc = convert_html("hello <b>world</b>", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        serde_json::to_value(&doc.document).unwrap(),
        json!({
            "type": "root",
            "children": [{
                "type": "paragraph",
                "children": [
                    {"type": "span", "value": "hello "},
                    {"type": "span", "marks": ["strong"], "value": "world"},
                ],
            }],
        })
    );
}

#[tokio::test]
async fn test_runs_around_a_block_become_separate_paragraphs() {
    let doc = convert_html("before<p>middle</p>after", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        serde_json::to_value(&doc.document).unwrap(),
        json!({
            "type": "root",
            "children": [
                {"type": "paragraph", "children": [{"type": "span", "value": "before"}]},
                {"type": "paragraph", "children": [{"type": "span", "value": "middle"}]},
                {"type": "paragraph", "children": [{"type": "span", "value": "after"}]},
            ],
        })
    );
}

#[tokio::test]
async fn test_run_is_maximal_not_per_node() {
    // Three adjacent inline nodes end up in one paragraph, not three.
    let doc = convert_html("a<em>b</em>c", Options::new())
        .await
        .unwrap()
        .unwrap();
    let json = serde_json::to_value(&doc.document).unwrap();
    assert_eq!(json["children"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["children"][0]["children"].as_array().unwrap().len(),
        3
    );
}

#[test]
fn test_wrapping_is_idempotent() {
    let once = wrap_inline_runs(vec![
        DastNode::span("a"),
        DastNode::Paragraph {
            children: vec![DastNode::span("b")],
        },
        DastNode::span("c"),
    ]);
    let twice = wrap_inline_runs(once.clone());
    assert_eq!(once, twice);
}
