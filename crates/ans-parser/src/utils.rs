//! Stateless predicates over document nodes.
//!
//! These decide what the converter skips, what it unwraps, and which
//! elements count as plain text.

use serde_json::{Map, Value};

use crate::dom::{NodeKind, NodeRef};

/// Trimmed strings that count as empty content.
pub const EMPTY_STRINGS: &[&str] = &["", " ", "\n", "<br>", "<br/>"];

/// Elements that are always empty.
pub const EMPTY_TAGS: &[&str] = &["br"];

/// Attributes that never make an element meaningful on their own.
pub const IGNORABLE_ATTRIBUTES: &[&str] = &["id", "class", "style"];

/// Elements that may be unwrapped.
pub const WRAPPER_TAGS: &[&str] = &["p", "div"];

/// Elements that may appear inside a text block.
pub const TEXT_TAGS: &[&str] = &[
    "blockquote",
    "p",
    "a",
    "b",
    "del",
    "em",
    "i",
    "ins",
    "mark",
    "small",
    "strong",
    "sub",
    "sup",
    "span",
];

/// Attributes whose values are whitespace-separated lists.
const MULTI_VALUED_ATTRIBUTES: &[&str] = &[
    "class",
    "rel",
    "rev",
    "accept-charset",
    "headers",
    "accesskey",
    "dropzone",
];

/// Whether `node` carries no meaningful content.
///
/// Text and comments are empty when their trimmed string is one of
/// [`EMPTY_STRINGS`]. Elements are empty when listed in [`EMPTY_TAGS`] or
/// when they have neither non-empty children nor meaningful attributes.
#[must_use]
pub fn is_empty(node: NodeRef<'_>) -> bool {
    match node.kind() {
        NodeKind::Text | NodeKind::Comment => node
            .string()
            .is_none_or(|s| EMPTY_STRINGS.contains(&s.trim())),
        NodeKind::Element => {
            node.name().is_some_and(|name| EMPTY_TAGS.contains(&name))
                || !(has_children(node) || has_attributes(node))
        }
        NodeKind::Document => !has_children(node),
    }
}

fn has_children(node: NodeRef<'_>) -> bool {
    node.children().any(|child| !is_empty(child))
}

/// Whether `node` holds nothing but text and inline text elements.
#[must_use]
pub fn is_text_only(node: NodeRef<'_>) -> bool {
    is_text_only_with(node, &[])
}

/// [`is_text_only`] with additional tags treated as text-bearing.
#[must_use]
pub fn is_text_only_with(node: NodeRef<'_>, extra_tags: &[&str]) -> bool {
    match node.kind() {
        NodeKind::Text | NodeKind::Comment => true,
        NodeKind::Document => false,
        NodeKind::Element => {
            let Some(name) = node.name() else {
                return false;
            };
            if !TEXT_TAGS.contains(&name) && !extra_tags.contains(&name) {
                return false;
            }
            get_children(node, &[], &[])
                .into_iter()
                .all(|child| is_text_only_with(child, extra_tags))
        }
    }
}

/// Whether `node` merely wraps other content and should be unwrapped.
///
/// `<p><img src="a"/></p>` is a wrapper; `<p>A <a href="x">link</a></p>`
/// is not, because its several children read as one block of text.
#[must_use]
pub fn is_wrapper(node: NodeRef<'_>) -> bool {
    let Some(name) = node.name() else {
        return false;
    };
    if !WRAPPER_TAGS.contains(&name) || has_attributes(node) {
        return false;
    }
    !(is_text_only(node) && get_children(node, &[], &[]).len() > 1)
}

/// Non-empty children of an element, minus those whose tag is in
/// `exclude_tags` or whose kind is in `exclude_kinds`. Always empty for
/// non-elements.
#[must_use]
pub fn get_children<'a>(
    node: NodeRef<'a>,
    exclude_tags: &[&str],
    exclude_kinds: &[NodeKind],
) -> Vec<NodeRef<'a>> {
    if !node.is_element() {
        return Vec::new();
    }
    node.children()
        .filter(|child| !is_empty(*child))
        .filter(|child| !exclude_kinds.contains(&child.kind()))
        .filter(|child| child.name().is_none_or(|name| !exclude_tags.contains(&name)))
        .collect()
}

/// Whether `node` has an attribute outside [`IGNORABLE_ATTRIBUTES`].
#[must_use]
pub fn has_attributes(node: NodeRef<'_>) -> bool {
    node.attrs()
        .iter()
        .any(|attr| !IGNORABLE_ATTRIBUTES.contains(&attr.name.as_str()))
}

/// Copy integer-valued dimension attributes of `node` into `target`.
/// Values that are not plain integers (`"42%"`, `"40px"`) are skipped.
pub fn parse_dimensions(node: NodeRef<'_>, target: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(value) = node.attr(key).and_then(|v| v.trim().parse::<i64>().ok()) {
            target.insert((*key).to_string(), Value::from(value));
        }
    }
}

/// Attributes of `node` as a JSON object. Multi-valued attributes such as
/// `class` become arrays.
#[must_use]
pub fn attrs_to_json(node: NodeRef<'_>) -> Map<String, Value> {
    node.attrs()
        .iter()
        .map(|attr| {
            let value = if MULTI_VALUED_ATTRIBUTES.contains(&attr.name.as_str()) {
                Value::Array(
                    attr.value
                        .split_ascii_whitespace()
                        .map(|v| Value::String(v.to_string()))
                        .collect(),
                )
            } else {
                Value::String(attr.value.clone())
            };
            (attr.name.clone(), value)
        })
        .collect()
}
