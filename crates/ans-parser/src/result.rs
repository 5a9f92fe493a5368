//! Parse outcomes.

use serde_json::{Map, Value};

/// One structured output element. Always carries a non-empty `type`.
pub type ContentElement = Map<String, Value>;

/// What a parser produced for a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Output {
    #[default]
    None,
    One(ContentElement),
    Many(Vec<ContentElement>),
}

impl Output {
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The single element, if exactly one was produced.
    #[must_use]
    pub const fn as_one(&self) -> Option<&ContentElement> {
        match self {
            Self::One(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_one(self) -> Option<ContentElement> {
        match self {
            Self::One(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Option<ContentElement>> for Output {
    fn from(element: Option<ContentElement>) -> Self {
        element.map_or(Self::None, Self::One)
    }
}

/// Result of running one parser on one node.
///
/// `matched` stops the candidate chain for the node whether or not any
/// output was produced; an unmatched result is always discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    pub output: Output,
    pub matched: bool,
}

impl ParseResult {
    /// A match carrying `output` (which may be empty).
    #[must_use]
    pub fn matched(output: impl Into<Output>) -> Self {
        Self {
            output: output.into(),
            matched: true,
        }
    }

    /// Matched, but nothing to emit.
    #[must_use]
    pub const fn discard() -> Self {
        Self {
            output: Output::None,
            matched: true,
        }
    }

    /// Not handled; the next candidate is tried.
    #[must_use]
    pub const fn no_match() -> Self {
        Self {
            output: Output::None,
            matched: false,
        }
    }

    #[must_use]
    pub const fn many(elements: Vec<ContentElement>) -> Self {
        Self {
            output: Output::Many(elements),
            matched: true,
        }
    }
}

impl From<ContentElement> for Output {
    fn from(element: ContentElement) -> Self {
        Self::One(element)
    }
}
