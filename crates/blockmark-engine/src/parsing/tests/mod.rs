//! Tests for the parsing module as a whole: tokens, tree and assembly.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use xi_rope::Rope;

use crate::library::core_registry;
use crate::model::{BlockRecord, Document, InnerPart};
use crate::parsing::{builder::BlockBuilder, parse, snapshot, tokenize};
use crate::registry::{BlockType, Registry};
use crate::serialize::serialize;

fn names(doc: &Document) -> Vec<&str> {
    doc.iter().map(|b| b.name.as_str()).collect()
}

fn check_invariants(src: &str) {
    let rope = Rope::from(src);
    let tokens = tokenize(src);
    snapshot::invariants(&rope, &tokens);

    let mut builder = BlockBuilder::new();
    for token in tokens {
        builder.push(token);
    }
    snapshot::check_tree(&rope, &builder.finish(src.len()));
}

#[test]
fn hello_world_becomes_one_paragraph() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "Hello world");

    assert_eq!(names(&doc), vec!["core/paragraph"]);
    assert_eq!(doc.blocks[0].attributes.get("content"), Some(&json!("Hello world")));
    assert_eq!(
        serialize(&reg, &doc.blocks),
        "<!-- wp:paragraph -->\nHello world\n<!-- /wp:paragraph -->"
    );
}

#[test]
fn output_order_equals_source_order() {
    let reg = core_registry().unwrap();
    let src = "<!-- wp:separator /-->\n\nloose text\n\n<!-- wp:heading -->\n<h2>T</h2>\n<!-- /wp:heading -->";
    assert_eq!(
        names(&parse(&reg, src)),
        vec!["core/separator", "core/paragraph", "core/heading"]
    );
}

#[test]
fn explicit_blob_value_wins_over_markup() {
    let reg = core_registry().unwrap();
    let doc = parse(
        &reg,
        "<!-- wp:heading {\"nodeName\":\"H4\"} -->\n<h2>T</h2>\n<!-- /wp:heading -->",
    );
    assert_eq!(doc.blocks[0].attributes.get("nodeName"), Some(&json!("H4")));
}

#[test]
fn unknown_type_goes_to_handler() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:acme/widget {\"size\":3} -->\n<div>w</div>\n<!-- /wp:acme/widget -->");

    assert_eq!(names(&doc), vec!["core/freeform"]);
    assert_eq!(doc.blocks[0].attributes.get("content"), Some(&json!("<div>w</div>")));
    assert_eq!(doc.blocks[0].markup(), "<div>w</div>");
}

#[test]
fn unknown_type_without_handler_is_dropped() {
    let mut reg = Registry::new();
    reg.register(BlockType::new("core/separator", "Separator", "layout")).unwrap();
    let doc = parse(
        &reg,
        "<!-- wp:acme/widget -->\n<div>w</div>\n<!-- /wp:acme/widget -->\n\n<!-- wp:separator /-->",
    );
    assert_eq!(names(&doc), vec!["core/separator"]);
}

#[test]
fn malformed_delimiter_is_treated_as_text() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:paragraph {broken} -->\nHi\n<!-- /wp:paragraph -->");
    // The opener is text, so the closer matches nothing and is text too. Each
    // comment line is its own HTML chunk for the raw handler.
    assert_eq!(names(&doc), vec!["core/html", "core/paragraph", "core/html"]);
    assert_eq!(doc.blocks[0].markup(), "<!-- wp:paragraph {broken} -->");
    assert_eq!(doc.blocks[1].markup(), "Hi");
}

#[test]
fn nested_blocks_keep_surrounding_markup() {
    let mut reg = core_registry().unwrap();
    reg.register(BlockType::new("acme/group", "Group", "layout")).unwrap();
    let src = "<!-- wp:acme/group -->\n<div>\n<!-- wp:separator /-->\n</div>\n<!-- /wp:acme/group -->";
    let doc = parse(&reg, src);

    let group = &doc.blocks[0];
    assert_eq!(group.inner.len(), 3);
    assert_eq!(group.inner[0], InnerPart::Markup("<div>\n".into()));
    assert!(matches!(&group.inner[1], InnerPart::Block(b) if b.name == "core/separator"));
    assert_eq!(group.inner[2], InnerPart::Markup("\n</div>".into()));
    assert_eq!(serialize(&reg, &doc.blocks), src);
}

#[test]
fn outer_closer_closes_open_inner_block() {
    let mut reg = core_registry().unwrap();
    reg.register(BlockType::new("acme/group", "Group", "layout")).unwrap();
    let doc = parse(
        &reg,
        "<!-- wp:acme/group -->\n<!-- wp:paragraph -->\nunclosed\n<!-- /wp:acme/group -->",
    );
    let group = &doc.blocks[0];
    let child = group.children().next().unwrap();
    assert_eq!(child.name, "core/paragraph");
    assert_eq!(child.markup(), "unclosed");
}

#[test]
fn unclosed_block_runs_to_end_of_input() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:paragraph -->\nstill going");
    assert_eq!(names(&doc), vec!["core/paragraph"]);
    assert_eq!(doc.blocks[0].markup(), "still going");
}

#[test]
fn stray_closer_inside_block_is_markup() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:html -->\na<!-- /wp:quote -->b\n<!-- /wp:html -->");
    assert_eq!(doc.blocks[0].markup(), "a<!-- /wp:quote -->b");
}

#[test]
fn class_name_is_lifted_from_blob() {
    let reg = core_registry().unwrap();
    let doc = parse(
        &reg,
        "<!-- wp:paragraph {\"className\":\"lead\"} -->\n<p class=\"lead\">x</p>\n<!-- /wp:paragraph -->",
    );
    let p = &doc.blocks[0];
    assert_eq!(p.class_name.as_deref(), Some("lead"));
    assert!(p.attributes.get("className").is_none());
}

#[test]
fn class_name_stays_an_attribute_without_support() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:html {\"className\":\"x\"} -->\n<b>x</b>\n<!-- /wp:html -->");
    assert_eq!(doc.blocks[0].class_name, None);
    assert_eq!(doc.blocks[0].attributes.get("className"), Some(&json!("x")));
}

#[test]
fn anchor_from_blob_beats_markup_id() {
    let reg = core_registry().unwrap();
    let doc = parse(
        &reg,
        "<!-- wp:heading {\"anchor\":\"custom\"} -->\n<h2 id=\"other\">T</h2>\n<!-- /wp:heading -->",
    );
    assert_eq!(doc.blocks[0].anchor.as_deref(), Some("custom"));
}

#[test]
fn private_types_still_parse() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:block {\"ref\":\"42\"} /-->");
    assert_eq!(names(&doc), vec!["core/block"]);
    assert_eq!(doc.blocks[0].attributes.get("ref"), Some(&json!("42")));
    assert_eq!(serialize(&reg, &doc.blocks), "<!-- wp:block {\"ref\":\"42\"} /-->");
}

#[rstest]
#[case("")]
#[case("\n\n   \n")]
fn blank_input_gives_empty_document(#[case] src: &str) {
    let reg = core_registry().unwrap();
    assert!(parse(&reg, src).is_empty());
}

#[test]
fn empty_registry_still_opens_documents() {
    let reg = Registry::new();
    let doc = parse(&reg, "Some text\n\n<!-- wp:paragraph -->\nx\n<!-- /wp:paragraph -->");
    assert_eq!(names(&doc), vec!["core/freeform"]);
    assert_eq!(doc.blocks[0].markup(), "Some text");
}

#[test]
fn text_around_a_dropped_block_joins_into_one_fallback() {
    let mut reg = Registry::new();
    reg.register(BlockType::new("core/separator", "Separator", "layout")).unwrap();
    let doc = parse(&reg, "A\n\n<!-- wp:acme/x /-->\n\nB\n\n<!-- wp:separator /-->\n\n    indented");

    assert_eq!(names(&doc), vec!["core/freeform", "core/separator", "core/freeform"]);
    assert_eq!(doc.blocks[0].markup(), "A\n\nB");
    assert_eq!(doc.blocks[2].markup(), "    indented");

    let once = serialize(&reg, &doc.blocks);
    assert_eq!(once, "A\n\nB\n\n<!-- wp:separator /-->\n\n    indented");
    assert!(parse(&reg, &once).content_eq(&doc));
}

#[test]
fn normalized_snapshot_omits_uids() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:heading -->\n<h3>Title</h3>\n<!-- /wp:heading -->");
    let snap = serde_json::to_value(snapshot::normalize(&doc)).unwrap();
    assert_eq!(
        snap,
        json!({
            "blocks": [{
                "name": "core/heading",
                "attributes": {"content": "Title", "nodeName": "H3"},
                "inner": [{"markup": "<h3>Title</h3>"}],
            }]
        })
    );
}

#[test]
fn parse_is_pure_over_registry() {
    let reg = core_registry().unwrap();
    let before: Vec<String> = reg.list().iter().map(|t| t.name.clone()).collect();
    let _ = parse(&reg, "<!-- wp:acme/x /-->text");
    let after: Vec<String> = reg.list().iter().map(|t| t.name.clone()).collect();
    assert_eq!(before, after);
}

#[rstest]
#[case("")]
#[case("plain")]
#[case("<!-- wp:paragraph -->\nx\n<!-- /wp:paragraph -->")]
#[case("<!-- wp:a/b --><!-- wp:c/d -->x<!-- /wp:a/b -->y<!-- /wp:c/d -->")]
#[case("<!-- /wp:stray --><!-- wp:open -->")]
#[case("<!-- wp:bad {json -->tail")]
#[case("héllo <!-- wp:separator /--> wörld")]
fn parser_invariants_hold(#[case] src: &str) {
    check_invariants(src);
}

#[test]
fn parsed_records_have_distinct_uids() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "a\n\nb\n\nc");
    let mut uids: Vec<_> = doc.iter().map(|b: &BlockRecord| b.uid).collect();
    uids.dedup();
    assert_eq!(uids.len(), 3);
}

#[test]
fn reusable_placeholder_does_not_lift_class_name() {
    let reg = core_registry().unwrap();
    let doc = parse(&reg, "<!-- wp:block {\"className\":\"x\",\"ref\":\"7\"} /-->");
    assert_eq!(doc.blocks[0].class_name, None);
    assert_eq!(doc.blocks[0].attributes.get("className"), Some(&json!("x")));
    assert_eq!(
        serialize(&reg, &doc.blocks),
        "<!-- wp:block {\"className\":\"x\",\"ref\":\"7\"} /-->"
    );
}
