//! Error types for ans-parser.

use crate::dom::NodeKey;

/// Errors raised by a single element parser while parsing one node.
///
/// These never escape a conversion on their own: the converter either
/// treats them as a non-match (when suppression is on) or wraps them in
/// [`ParserError::ElementParse`].
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error("expected a <{0}> element but none was found")]
    MissingElement(String),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("node kind not supported by this parser: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}

/// Errors that abort a whole conversion.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("{parser} failed on {key}: {source}")]
    ElementParse {
        parser: String,
        key: NodeKey,
        #[source]
        source: ElementError,
    },
}
