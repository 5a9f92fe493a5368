//! Image parsers.

use serde_json::Value;

use super::{Descriptor, ElementParser, construct_output};
use crate::dom::NodeRef;
use crate::error::ElementError;
use crate::result::{ContentElement, ParseResult};
use crate::utils::parse_dimensions;

/// An `image` element for an `<img>`, or `None` without a `src`.
///
/// Only integer `width`/`height` values are kept.
fn image_output(img: NodeRef<'_>) -> Option<ContentElement> {
    let src = img.attr("src").filter(|src| !src.is_empty())?;
    let mut output = construct_output(img, "image", None);
    output.insert("url".into(), Value::from(src));
    if let Some(alt) = img.attr("alt").filter(|alt| !alt.is_empty()) {
        output.insert("caption".into(), Value::from(alt));
    }
    parse_dimensions(img, &mut output, &["width", "height"]);
    Some(output)
}

/// Plain `<img>` tags. Always matches, so a broken image is dropped rather
/// than re-emitted as raw markup.
#[derive(Debug)]
pub struct ImageParser {
    descriptor: Descriptor,
}

impl ImageParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["img"]).versioned(),
        }
    }
}

impl Default for ImageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for ImageParser {
    fn name(&self) -> &str {
        "image"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        Ok(ParseResult::matched(image_output(node)))
    }
}

/// An `<a>` wrapping an `<img>`. The link target is kept as
/// `additional_properties.image_link`.
#[derive(Debug)]
pub struct LinkedImageParser {
    descriptor: Descriptor,
}

impl LinkedImageParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["a"]).versioned(),
        }
    }
}

impl Default for LinkedImageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for LinkedImageParser {
    fn name(&self) -> &str {
        "linked-image"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn is_applicable(&self, node: NodeRef<'_>) -> bool {
        self.descriptor.applies_to(node) && node.find("img").is_some()
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        // A linked image without a source is consumed, not retried as a link.
        let Some(mut output) = node.find("img").and_then(image_output) else {
            return Ok(ParseResult::discard());
        };

        if let Some(href) = node.attr("href").filter(|href| !href.is_empty()) {
            let properties = output
                .entry("additional_properties")
                .or_insert_with(|| Value::Object(ContentElement::new()));
            if let Value::Object(properties) = properties {
                properties.insert("image_link".into(), Value::from(href));
            }
        }
        Ok(ParseResult::matched(output))
    }
}

/// `<figure>` with an image and an optional `<figcaption>`, which takes
/// precedence over the image's `alt` text.
#[derive(Debug)]
pub struct FigureParser {
    descriptor: Descriptor,
}

impl FigureParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["figure"]).versioned(),
        }
    }
}

impl Default for FigureParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for FigureParser {
    fn name(&self) -> &str {
        "figure"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let Some(mut output) = node.find("img").and_then(image_output) else {
            return Ok(ParseResult::discard());
        };

        let caption = node
            .find("figcaption")
            .map(|figcaption| figcaption.text().trim().to_string())
            .unwrap_or_default();
        if !caption.is_empty() {
            output.insert("caption".into(), Value::from(caption));
        }
        Ok(ParseResult::matched(output))
    }
}
