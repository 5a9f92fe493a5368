//! Element parsers.
//!
//! An [`ElementParser`] turns one document node into zero or more content
//! elements. Each parser declares the node keys (and optionally the CSS
//! classes) it applies to through a [`Descriptor`]; the converter looks up
//! candidates by key and tries them in order until one reports a match.

mod audio;
mod embeds;
mod image;
mod raw_html;
mod text;

#[cfg(test)]
mod tests;

use serde_json::Value;

use crate::dom::{NodeKey, NodeRef};
use crate::error::ElementError;
use crate::result::{ContentElement, ParseResult};
use crate::utils::attrs_to_json;

pub use audio::AudioParser;
pub use embeds::{EmbedParser, EmbedProvider, providers};
pub use image::{FigureParser, ImageParser, LinkedImageParser};
pub use raw_html::{IFrameParser, RawHtmlParser};
pub use text::{
    BlockquoteParser, FormattedTextParser, HeaderParser, InterstitialLinkParser, ListParser,
    ParagraphParser,
};

/// Which nodes a parser applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// Node keys the parser is registered under.
    pub keys: Vec<NodeKey>,
    /// CSS classes that must all be present on an element.
    pub classes: Vec<String>,
    /// Whether the converter stamps its configured ANS version on output.
    pub version_required: bool,
}

impl Descriptor {
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = NodeKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Descriptor for a set of tag names.
    #[must_use]
    pub fn tags(tags: &[&str]) -> Self {
        Self::new(tags.iter().map(|tag| NodeKey::tag(tag)))
    }

    #[must_use]
    pub fn with_key(mut self, key: NodeKey) -> Self {
        self.keys.push(key);
        self
    }

    #[must_use]
    pub fn with_classes(mut self, classes: &[&str]) -> Self {
        self.classes
            .extend(classes.iter().map(|class| (*class).to_string()));
        self
    }

    #[must_use]
    pub const fn versioned(mut self) -> Self {
        self.version_required = true;
        self
    }

    /// Key membership, plus every required class for elements.
    #[must_use]
    pub fn applies_to(&self, node: NodeRef<'_>) -> bool {
        let Some(key) = node.key() else {
            return false;
        };
        if !self.keys.contains(&key) {
            return false;
        }
        !node.is_element() || self.classes.iter().all(|class| node.has_class(class))
    }
}

/// A converter for one kind of node.
///
/// Parsers are stateless and shared across conversions; all per-call state
/// lives in the document being converted.
pub trait ElementParser: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    fn descriptor(&self) -> &Descriptor;

    /// Cheap pre-check run before [`ElementParser::parse`].
    fn is_applicable(&self, node: NodeRef<'_>) -> bool {
        self.descriptor().applies_to(node)
    }

    /// Convert `node`. An unmatched result lets the next candidate try.
    ///
    /// # Errors
    /// Returns [`ElementError`] when the node is structurally unusable.
    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError>;

    fn version_required(&self) -> bool {
        self.descriptor().version_required
    }
}

/// Start an output element of type `ans_type`. `content` is set when
/// non-empty; the node's attributes go under `additional_properties`.
#[must_use]
pub fn construct_output(
    node: NodeRef<'_>,
    ans_type: &str,
    content: Option<&str>,
) -> ContentElement {
    let mut output = ContentElement::new();
    output.insert("type".into(), Value::from(ans_type));
    if let Some(content) = content.filter(|c| !c.is_empty()) {
        output.insert("content".into(), Value::from(content));
    }
    if !node.attrs().is_empty() {
        output.insert(
            "additional_properties".into(),
            Value::Object(attrs_to_json(node)),
        );
    }
    output
}

/// Discards comments and line breaks.
#[derive(Debug)]
pub struct NullParser {
    descriptor: Descriptor,
}

impl NullParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["br"]).with_key(NodeKey::Comment),
        }
    }
}

impl Default for NullParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for NullParser {
    fn name(&self) -> &str {
        "null"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, _node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        Ok(ParseResult::discard())
    }
}
