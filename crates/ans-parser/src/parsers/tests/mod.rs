use serde_json::Value;

use super::*;
use crate::dom::Document;
use crate::result::Output;

mod embeds;

/// Run `parser` on the first `<tag>` of `html`.
fn parse_tag(parser: &dyn ElementParser, html: &str, tag: &str) -> ParseResult {
    let doc = Document::parse(html);
    let node = doc
        .find(tag)
        .unwrap_or_else(|| panic!("should find <{tag}> in {html}"));
    parser.parse(node).expect("parse should succeed")
}

/// Whether `parser` applies to the first `<tag>` of `html`.
fn applies(parser: &dyn ElementParser, html: &str, tag: &str) -> bool {
    let doc = Document::parse(html);
    let node = doc
        .find(tag)
        .unwrap_or_else(|| panic!("should find <{tag}> in {html}"));
    parser.is_applicable(node)
}

/// The output of a match as JSON (`null` when empty).
fn output_json(result: ParseResult) -> Value {
    assert!(result.matched, "expected a match");
    match result.output {
        Output::None => Value::Null,
        Output::One(element) => Value::Object(element),
        Output::Many(elements) => Value::Array(elements.into_iter().map(Value::Object).collect()),
    }
}

#[test]
fn descriptor_requires_every_class() {
    let descriptor = Descriptor::tags(&["blockquote"]).with_classes(&["twitter-tweet", "tw-align-center"]);
    let doc = Document::parse(
        "<blockquote class=\"twitter-tweet\"></blockquote>\
         <blockquote class=\"tw-align-center twitter-tweet\"></blockquote>",
    );
    let quotes = doc.body().find_all(&["blockquote"]);
    assert!(!descriptor.applies_to(quotes[0]));
    assert!(descriptor.applies_to(quotes[1]));
}

#[test]
fn descriptor_matches_node_kinds() {
    let descriptor = Descriptor::new([NodeKey::Comment]);
    let doc = Document::parse("<!-- note -->text");
    let mut children = doc.body().children();
    assert!(descriptor.applies_to(children.next().expect("comment")));
    assert!(!descriptor.applies_to(children.next().expect("text")));
    assert!(!descriptor.applies_to(doc.root()));
}

#[test]
fn construct_output_keeps_attributes() {
    let doc = Document::parse("<p class=\"lead intro\" data-id=\"7\">x</p><p>y</p>");
    let paragraphs = doc.body().find_all(&["p"]);
    assert_eq!(
        Value::Object(construct_output(paragraphs[0], "text", Some("x"))),
        serde_json::json!({
            "type": "text",
            "content": "x",
            "additional_properties": {"class": ["lead", "intro"], "data-id": "7"}
        })
    );
    assert_eq!(
        Value::Object(construct_output(paragraphs[1], "text", Some(""))),
        serde_json::json!({"type": "text"})
    );
}

#[test]
fn null_parser_discards() {
    let parser = NullParser::new();
    assert!(applies(&parser, "<p>a<br>b</p>", "br"));
    assert_eq!(parse_tag(&parser, "<br>", "br"), ParseResult::discard());
}
