use serde_json::{Value, json};

use super::{Descriptor, ElementParser, construct_output};
use crate::dom::NodeRef;
use crate::error::ElementError;
use crate::result::ParseResult;
use crate::urls::encode_url;

/// `<audio>` with a `<source>`. Without a usable source the node is left
/// to the next candidate.
#[derive(Debug)]
pub struct AudioParser {
    descriptor: Descriptor,
}

impl AudioParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: Descriptor::tags(&["audio"]).versioned(),
        }
    }
}

impl Default for AudioParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementParser for AudioParser {
    fn name(&self) -> &str {
        "audio"
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let Some(src) = node
            .find("source")
            .and_then(|source| source.attr("src"))
            .filter(|src| !src.is_empty())
        else {
            return Ok(ParseResult::no_match());
        };

        let mut output = construct_output(node, "audio", None);
        output.insert(
            "streams".into(),
            Value::Array(vec![json!({ "url": encode_url(src) })]),
        );
        Ok(ParseResult::matched(output))
    }
}
