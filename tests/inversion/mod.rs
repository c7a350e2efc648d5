//! Link/heading inversion, end to end.

use serde_json::json;

use strictext::convert_html;
use strictext::invert::invert_links_with_headings;
use strictext::options::Options;
use strictext::tree::Tree;

use crate::common::{assert_valid_document, el};

#[tokio::test]
async fn test_anchor_wrapping_heading_is_inverted() {
    let doc = convert_html(
        "<a href=\"https://example.com/x\"><h1>x</h1>y</a>",
        Options::new(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_valid_document(&doc);
    assert_eq!(
        serde_json::to_value(&doc.document).unwrap(),
        json!({
            "type": "root",
            "children": [
                {
                    "type": "heading",
                    "level": 1,
                    "children": [{
                        "type": "link",
                        "url": "https://example.com/x",
                        "children": [{"type": "span", "value": "x"}],
                    }],
                },
                {
                    "type": "paragraph",
                    "children": [{
                        "type": "link",
                        "url": "https://example.com/x",
                        "children": [{"type": "span", "value": "y"}],
                    }],
                },
            ],
        })
    );
}

#[tokio::test]
async fn test_detection_is_shallow() {
    // A heading that is not a *direct* child of the anchor is not promoted;
    // it is demoted inside the link instead.
    let doc = convert_html(
        "<a href=\"https://example.com/x\"><div><h2>x</h2></div></a>",
        Options::new(),
    )
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
                "children": [{
                    "type": "link",
                    "url": "https://example.com/x",
                    "children": [{"type": "span", "value": "x"}],
                }],
            }],
        })
    );
}

#[test]
fn test_inverted_tree_shape() {
    let mut tree = Tree::new();
    let a = tree.element_in(
        Tree::ROOT,
        "a",
        vec![("href".to_string(), "/u".to_string())],
    );
    let h1 = el(&mut tree, a, "h1");
    tree.text_in(h1, "first");
    tree.text_in(a, "mid");
    let h2 = el(&mut tree, a, "h2");
    tree.text_in(h2, "second");

    invert_links_with_headings(&mut tree);

    // a[ h1[a["first"]], a["mid"], h2[a["second"]] ]
    let rebuilt = tree.children(a).to_vec();
    assert_eq!(rebuilt.len(), 3);
    assert_eq!(tree.tag(rebuilt[0]), Some("h1"));
    assert_eq!(tree.tag(rebuilt[1]), Some("a"));
    assert_eq!(tree.tag(rebuilt[2]), Some("h2"));
    // Each promoted heading wraps an anchor clone carrying the href.
    for &heading in [rebuilt[0], rebuilt[2]].iter() {
        let inner = tree.children(heading)[0];
        assert_eq!(tree.tag(inner), Some("a"));
        assert_eq!(tree.attr(inner, "href"), Some("/u"));
    }
}

#[tokio::test]
async fn test_plain_anchor_is_untouched() {
    let doc = convert_html("<p><a href=\"/u\">plain</a></p>", Options::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        serde_json::to_value(&doc.document).unwrap()["children"][0]["children"][0]["type"],
        json!("link")
    );
}
