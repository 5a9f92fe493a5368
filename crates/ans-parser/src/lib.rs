//! # ans-parser
//!
//! Converts HTML documents into ANS content elements.
//!
//! Markup is parsed with html5ever into an owned [`Document`].
//! The [`Converter`] walks the document, skipping empty nodes and unwrapping
//! plain `<p>`/`<div>` wrappers, and hands every other node to the ordered
//! chain of [`ElementParser`]s registered for its tag (or node kind):
//! - **Text parsers**: paragraphs, inline formatting, quotes, headers,
//!   lists and links
//! - **Media parsers**: images, linked images, figures and audio
//! - **Embed parsers**: one per third-party provider, producing oEmbed
//!   references
//! - **Fallbacks**: iframes and raw HTML, tried after every chain
//!
//! ```
//! use ans_parser::{Converter, ConverterOptions};
//!
//! let converter = Converter::default_converter(ConverterOptions::default());
//! let elements = converter.convert("<h6>Here is a headline</h6>").unwrap();
//! assert_eq!(elements[0]["type"], "header");
//! assert_eq!(elements[0]["level"], 6);
//! ```

pub mod converter;
pub mod defaults;
pub mod dom;
pub mod error;
pub mod parsers;
pub mod registry;
pub mod repair;
pub mod result;
pub mod urls;
pub mod utils;

pub use converter::{Converter, ConverterOptions, DEFAULT_START_TAG};
pub use defaults::{backup_parsers, default_parsers};
pub use dom::{Document, NodeKey, NodeKind, NodeRef};
pub use error::{ElementError, ParserError};
pub use parsers::{Descriptor, ElementParser};
pub use registry::{DispatchTable, SharedParser};
pub use result::{ContentElement, Output, ParseResult};
