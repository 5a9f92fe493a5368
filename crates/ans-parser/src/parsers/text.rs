//! Text-bearing parsers: paragraphs, inline formatting, quotes, headers,
//! links and lists.

use std::sync::Arc;

use serde_json::Value;

use super::{Descriptor, ElementParser, construct_output};
use crate::dom::{NodeKey, NodeKind, NodeRef};
use crate::error::ElementError;
use crate::repair::fix_text;
use crate::result::{ContentElement, ParseResult};
use crate::utils::{is_empty, is_text_only, is_text_only_with};

/// Inline formatting tags emitted with their own markup.
const FORMATTED_TAGS: &[&str] = &[
    "b", "del", "em", "i", "ins", "mark", "small", "strong", "sub", "sup", "u",
];

const LIST_TAGS: &[&str] = &["ul", "ol"];

/// A `text` element for `node`, or `None` when it has no content.
///
/// Text nodes give their trimmed string. Elements give their inner markup
/// (inline tags kept) after text repair, or their outer markup when
/// `outer` is set.
fn text_output(node: NodeRef<'_>, outer: bool) -> Option<ContentElement> {
    let content = match node.kind() {
        NodeKind::Text | NodeKind::Comment => node.string().unwrap_or_default().trim().to_string(),
        _ if outer => node.outer_html(),
        _ => fix_text(node.inner_html().trim()),
    };
    (!content.is_empty()).then(|| construct_output(node, "text", Some(&content)))
}

// ── Paragraph ──────────────────────────────────────────────────────

/// Plain paragraphs and bare text. Inline formatting and links are kept in
/// the content.
#[derive(Debug)]
pub struct ParagraphParser {
    name: &'static str,
    descriptor: Descriptor,
    extra_text_tags: &'static [&'static str],
}

impl ParagraphParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "paragraph",
            descriptor: Descriptor::tags(&["p"]).with_key(NodeKey::Text),
            extra_text_tags: &[],
        }
    }

    /// Paragraph parser for `<li>` items, treating `li` as text-bearing.
    #[must_use]
    pub fn list_item() -> Self {
        Self {
            name: "list-item",
            descriptor: Descriptor::tags(&["li"]),
            extra_text_tags: &["li"],
        }
    }
}

impl Default for ParagraphParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for ParagraphParser {
    fn name(&self) -> &str {
        self.name
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        if !is_text_only_with(node, self.extra_text_tags) {
            return Ok(ParseResult::no_match());
        }
        Ok(ParseResult::matched(text_output(node, false)))
    }
}

// ── Formatted text ─────────────────────────────────────────────────

/// Stand-alone inline formatting such as `<em>` or `<strong>`.
#[derive(Debug)]
pub struct FormattedTextParser {
    descriptor: Descriptor,
}

impl FormattedTextParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(FORMATTED_TAGS),
        }
    }
}

impl Default for FormattedTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for FormattedTextParser {
    fn name(&self) -> &str {
        "formatted-text"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        if !is_text_only(node) {
            return Ok(ParseResult::no_match());
        }
        Ok(ParseResult::matched(text_output(node, true)))
    }
}

// ── Blockquote ─────────────────────────────────────────────────────

/// Text-only blockquotes, emitted as a `quote` of paragraphs. Quotes
/// holding images or other block markup do not match.
#[derive(Debug)]
pub struct BlockquoteParser {
    descriptor: Descriptor,
    paragraph: ParagraphParser,
}

impl BlockquoteParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["blockquote"]),
            paragraph: ParagraphParser::new(),
        }
    }
}

impl Default for BlockquoteParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for BlockquoteParser {
    fn name(&self) -> &str {
        "blockquote"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        if !is_text_only(node) {
            return Ok(ParseResult::no_match());
        }

        let paragraphs = node.find_all(&["p"]);
        let mut content_elements = Vec::new();
        if paragraphs.is_empty() {
            content_elements.extend(text_output(node, false));
        } else {
            for paragraph in paragraphs.into_iter().filter(|p| !is_empty(*p)) {
                let result = self.paragraph.parse(paragraph)?;
                if result.matched {
                    content_elements.extend(result.output.into_one());
                }
            }
        }

        let mut output = construct_output(node, "quote", None);
        output.insert(
            "content_elements".into(),
            Value::Array(content_elements.into_iter().map(Value::Object).collect()),
        );
        Ok(ParseResult::matched(output))
    }
}

// ── Header ─────────────────────────────────────────────────────────

/// `<h1>` through `<h6>`.
#[derive(Debug)]
pub struct HeaderParser {
    descriptor: Descriptor,
}

impl HeaderParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["h1", "h2", "h3", "h4", "h5", "h6"]),
        }
    }
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for HeaderParser {
    fn name(&self) -> &str {
        "header"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let name = node.name().unwrap_or_default();
        let level = name
            .get(1..)
            .and_then(|suffix| suffix.parse::<u8>().ok())
            .ok_or_else(|| ElementError::InvalidValue {
                field: "level".into(),
                reason: format!("cannot derive a header level from <{name}>"),
            })?;

        let text = node.text();
        let content = text.trim();
        if content.is_empty() {
            return Ok(ParseResult::discard());
        }
        let mut output = construct_output(node, "header", Some(content));
        output.insert("level".into(), Value::from(level));
        Ok(ParseResult::matched(output))
    }
}

// ── Interstitial link ──────────────────────────────────────────────

/// Anchors that are neither images nor embeds.
#[derive(Debug)]
pub struct InterstitialLinkParser {
    descriptor: Descriptor,
}

impl InterstitialLinkParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["a"]),
        }
    }
}

impl Default for InterstitialLinkParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for InterstitialLinkParser {
    fn name(&self) -> &str {
        "interstitial-link"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let url = node.attr("href").unwrap_or_default();
        let text = node.text();
        let content = text.trim();
        if url.is_empty() || content.is_empty() {
            return Ok(ParseResult::discard());
        }
        let mut output = construct_output(node, "interstitial_link", Some(content));
        output.insert("url".into(), Value::from(url));
        Ok(ParseResult::matched(output))
    }
}

// ── List ───────────────────────────────────────────────────────────

/// Ordered and unordered lists.
///
/// Items that contain lists are replaced by those lists, parsed with this
/// same parser; other items go through the item parser.
pub struct ListParser {
    descriptor: Descriptor,
    item_parser: Arc<dyn ElementParser>,
}

impl ListParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_item_parser(Arc::new(ParagraphParser::list_item()))
    }

    #[must_use]
    pub fn with_item_parser(item_parser: Arc<dyn ElementParser>) -> Self {
        Self {
            descriptor: Descriptor::tags(LIST_TAGS),
            item_parser,
        }
    }

    fn parse_item(
        &self,
        item: NodeRef<'_>,
        items: &mut Vec<Value>,
    ) -> Result<(), ElementError> {
        let nested: Vec<_> = item
            .find_all(LIST_TAGS)
            .into_iter()
            .filter(|list| is_outermost_list(*list, item))
            .collect();

        if nested.is_empty() {
            if self.item_parser.is_applicable(item) {
                let result = self.item_parser.parse(item)?;
                push_if_present(items, result, "content");
            }
            return Ok(());
        }
        for list in nested {
            let result = self.parse(list)?;
            push_if_present(items, result, "items");
        }
        Ok(())
    }
}

impl Default for ListParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ListParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListParser")
            .field("descriptor", &self.descriptor)
            .field("item_parser", &self.item_parser.name())
            .finish()
    }
}

/// Whether no list lies between `list` and the item `within`.
fn is_outermost_list(list: NodeRef<'_>, within: NodeRef<'_>) -> bool {
    let mut current = list.parent();
    while let Some(node) = current {
        if node == within {
            return true;
        }
        if node.name().is_some_and(|name| LIST_TAGS.contains(&name)) {
            return false;
        }
        current = node.parent();
    }
    true
}

/// Keep a single output whose `field` is non-empty.
fn push_if_present(items: &mut Vec<Value>, result: ParseResult, field: &str) {
    let Some(element) = result.output.into_one() else {
        return;
    };
    let present = match element.get(field) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    if present {
        items.push(Value::Object(element));
    }
}

impl ElementParser for ListParser {
    fn name(&self) -> &str {
        "list"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let list_type = if node.is_tag("ul") {
            "unordered"
        } else {
            "ordered"
        };

        let mut items = Vec::new();
        for item in node.children().filter(|c| c.is_element() && !is_empty(*c)) {
            self.parse_item(item, &mut items)?;
        }

        let mut output = construct_output(node, "list", None);
        output.insert("list_type".into(), Value::from(list_type));
        output.insert("items".into(), Value::Array(items));
        Ok(ParseResult::matched(output))
    }
}
