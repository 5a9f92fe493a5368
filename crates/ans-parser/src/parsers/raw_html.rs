//! Raw markup fallbacks.

use serde_json::Value;

use super::{Descriptor, ElementParser, construct_output};
use crate::dom::NodeRef;
use crate::error::ElementError;
use crate::result::{ContentElement, ParseResult};
use crate::utils::{attrs_to_json, parse_dimensions};

/// Last resort: emits the node's markup verbatim as `raw_html`.
#[derive(Debug, Default)]
pub struct RawHtmlParser {
    descriptor: Descriptor,
}

impl RawHtmlParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ElementParser for RawHtmlParser {
    fn name(&self) -> &str {
        "raw-html"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn is_applicable(&self, _node: NodeRef<'_>) -> bool {
        true
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let content = node.outer_html();
        Ok(ParseResult::matched(construct_output(
            node,
            "raw_html",
            Some(&content),
        )))
    }
}

/// Iframes that no embed provider recognised, bare or wrapped in another
/// element. Unlike images, a non-numeric `height` is kept as a string.
#[derive(Debug)]
pub struct IFrameParser {
    descriptor: Descriptor,
}

impl IFrameParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["iframe"]),
        }
    }
}

impl Default for IFrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for IFrameParser {
    fn name(&self) -> &str {
        "iframe"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn is_applicable(&self, node: NodeRef<'_>) -> bool {
        self.descriptor.applies_to(node) || node.find("iframe").is_some()
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let iframe = if node.is_tag("iframe") {
            node
        } else {
            node.find("iframe")
                .ok_or_else(|| ElementError::MissingElement("iframe".into()))?
        };

        let mut properties = attrs_to_json(node);
        properties.extend(attrs_to_json(iframe));
        parse_dimensions(iframe, &mut properties, &["height"]);

        let mut output = ContentElement::new();
        output.insert("type".into(), Value::from("raw_html"));
        output.insert("content".into(), Value::from(iframe.outer_html()));
        if !properties.is_empty() {
            output.insert("additional_properties".into(), Value::Object(properties));
        }
        Ok(ParseResult::matched(output))
    }
}
