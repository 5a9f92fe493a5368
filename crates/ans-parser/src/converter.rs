//! Document walker: reduces a markup tree to a flat list of content
//! elements.

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::defaults::{backup_parsers, default_parsers};
use crate::dom::{Document, NodeKey, NodeRef};
use crate::error::ParserError;
use crate::registry::{DispatchTable, SharedParser};
use crate::result::{ContentElement, Output};
use crate::utils::{is_empty, is_wrapper};

/// Tag whose children are converted when none is given.
pub const DEFAULT_START_TAG: &str = "body";

/// Converter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Stamped as `version` on output of parsers that require one.
    pub ans_version: Option<String>,
    /// Treat parser errors as non-matches instead of failing the call.
    pub suppress_exceptions: bool,
}

/// Converts HTML into ANS content elements.
///
/// The parser table is fixed once built; [`Converter::convert`] only reads
/// it, so a converter can be shared between threads.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConverterOptions,
    table: DispatchTable,
}

impl Converter {
    /// A converter with no parsers.
    #[must_use]
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            options,
            table: DispatchTable::new(),
        }
    }

    /// A converter with the built-in parsers and backups.
    #[must_use]
    pub fn default_converter(options: ConverterOptions) -> Self {
        let mut converter = Self::with_parsers(options, default_parsers());
        for backup in backup_parsers() {
            converter.table.add_backup(backup);
        }
        converter
    }

    /// A converter registering `parsers` in order, without backups.
    #[must_use]
    pub fn with_parsers(
        options: ConverterOptions,
        parsers: impl IntoIterator<Item = SharedParser>,
    ) -> Self {
        let mut converter = Self::new(options);
        for parser in parsers {
            converter.add_parser(parser);
        }
        converter
    }

    #[must_use]
    pub const fn options(&self) -> &ConverterOptions {
        &self.options
    }

    /// Register `parser` after existing candidates for each of its keys.
    pub fn add_parser(&mut self, parser: SharedParser) {
        self.table.register(parser);
    }

    /// Insert `parser` for `key` at `position` (`None` appends).
    pub fn insert_parser(&mut self, key: NodeKey, parser: SharedParser, position: Option<usize>) {
        self.table.insert(key, parser, position);
    }

    /// Append a parser tried after every key's own candidates.
    pub fn add_backup_parser(&mut self, parser: SharedParser) {
        self.table.add_backup(parser);
    }

    /// Names of the parsers tried for `key`, in order.
    #[must_use]
    pub fn candidates(&self, key: &NodeKey) -> Vec<&str> {
        self.table.candidates(key).map(|p| p.name()).collect()
    }

    /// Convert the children of `<body>`.
    ///
    /// # Errors
    /// Returns [`ParserError`] when a parser fails and errors are not
    /// suppressed.
    pub fn convert(&self, html: &str) -> Result<Vec<ContentElement>, ParserError> {
        self.convert_from(html, Some(DEFAULT_START_TAG))
    }

    /// Convert the children of the first `start_tag` element. Without a
    /// start tag, or when none is found, the children of `<body>` are
    /// converted.
    ///
    /// # Errors
    /// Returns [`ParserError`] when a parser fails and errors are not
    /// suppressed.
    pub fn convert_from(
        &self,
        html: &str,
        start_tag: Option<&str>,
    ) -> Result<Vec<ContentElement>, ParserError> {
        let doc = Document::parse(html);
        let start = start_tag
            .and_then(|tag| doc.find(&tag.to_ascii_lowercase()))
            .unwrap_or_else(|| doc.body());
        debug!(start = ?start, "converting document");

        let mut output = Vec::new();
        self.reduce(start.first_child(), &mut output)?;
        Ok(output)
    }

    /// Reduce `first` and its following siblings. Siblings are re-read
    /// after each node, so scripts detached by an embed parser are skipped.
    fn reduce(
        &self,
        first: Option<NodeRef<'_>>,
        output: &mut Vec<ContentElement>,
    ) -> Result<(), ParserError> {
        let mut current = first;
        while let Some(node) = current {
            if is_empty(node) {
                trace!(node = ?node, "skipping empty node");
            } else if is_wrapper(node) {
                trace!(node = ?node, "unwrapping");
                self.reduce(node.first_child(), output)?;
            } else {
                self.dispatch(node, output)?;
            }
            current = node.next_sibling();
        }
        Ok(())
    }

    fn dispatch(
        &self,
        node: NodeRef<'_>,
        output: &mut Vec<ContentElement>,
    ) -> Result<(), ParserError> {
        let Some(key) = node.key() else {
            return Ok(());
        };

        for parser in self.table.candidates(&key) {
            if !parser.is_applicable(node) {
                continue;
            }
            let result = match parser.parse(node) {
                Ok(result) => result,
                Err(source) if self.options.suppress_exceptions => {
                    warn!(parser = parser.name(), %key, error = %source, "parser failed, trying next");
                    continue;
                }
                Err(source) => {
                    return Err(ParserError::ElementParse {
                        parser: parser.name().to_string(),
                        key,
                        source,
                    });
                }
            };
            if !result.matched {
                continue;
            }

            debug!(parser = parser.name(), %key, "matched");
            match result.output {
                Output::None => {}
                Output::One(element) => self.emit(parser, element, output),
                Output::Many(elements) => {
                    for element in elements {
                        self.emit(parser, element, output);
                    }
                }
            }
            return Ok(());
        }

        trace!(%key, "no parser matched");
        Ok(())
    }

    /// Append `element`, stamping the configured version where required.
    /// Elements without a `type` are dropped.
    fn emit(
        &self,
        parser: &SharedParser,
        mut element: ContentElement,
        output: &mut Vec<ContentElement>,
    ) {
        let typed = element
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.is_empty());
        if !typed {
            debug!(parser = parser.name(), "dropping untyped element");
            return;
        }
        if parser.version_required() {
            if let Some(version) = &self.options.ans_version {
                element
                    .entry("version")
                    .or_insert_with(|| Value::from(version.as_str()));
            }
        }
        output.push(element);
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::default_converter(ConverterOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::dom::NodeRef;
    use crate::error::ElementError;
    use crate::parsers::{Descriptor, ElementParser, HeaderParser};
    use crate::result::ParseResult;

    fn to_json(elements: Vec<ContentElement>) -> Value {
        Value::Array(elements.into_iter().map(Value::Object).collect())
    }

    /// Fails on every node it is offered.
    struct Failing(Descriptor);

    impl ElementParser for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn descriptor(&self) -> &Descriptor {
            &self.0
        }

        fn parse(&self, _node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
            Err(ElementError::Other("boom".into()))
        }
    }

    /// Emits two elements per node, one of them without a type.
    struct FanOut(Descriptor);

    impl ElementParser for FanOut {
        fn name(&self) -> &str {
            "fan-out"
        }

        fn descriptor(&self) -> &Descriptor {
            &self.0
        }

        fn parse(&self, _node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
            let typed = json!({"type": "text", "content": "x"});
            let untyped = json!({"content": "y"});
            let (Value::Object(a), Value::Object(b)) = (typed, untyped) else {
                unreachable!()
            };
            Ok(ParseResult::many(vec![a, b]))
        }
    }

    #[test]
    fn errors_propagate_by_default() {
        let converter = Converter::with_parsers(
            ConverterOptions::default(),
            [Arc::new(Failing(Descriptor::tags(&["h2"]))) as SharedParser],
        );
        let err = converter
            .convert("<h2>Title</h2><h2>Other</h2>")
            .expect_err("should fail");
        assert!(matches!(
            &err,
            ParserError::ElementParse { parser, key, .. }
                if parser == "failing" && *key == NodeKey::tag("h2")
        ));
        assert_eq!(err.to_string(), "failing failed on <h2>: boom");
    }

    #[test]
    fn suppressed_errors_fall_through_to_next_candidate() {
        let converter = Converter::with_parsers(
            ConverterOptions {
                suppress_exceptions: true,
                ..ConverterOptions::default()
            },
            [
                Arc::new(Failing(Descriptor::tags(&["h2"]))) as SharedParser,
                Arc::new(HeaderParser::new()),
            ],
        );
        let output = converter
            .convert("<h2>Title</h2><h2>Other</h2>")
            .expect("convert");
        assert_eq!(
            to_json(output),
            json!([
                {"type": "header", "content": "Title", "level": 2},
                {"type": "header", "content": "Other", "level": 2}
            ])
        );
    }

    #[test]
    fn many_outputs_are_spliced_and_untyped_dropped() {
        let converter = Converter::with_parsers(
            ConverterOptions::default(),
            [Arc::new(FanOut(Descriptor::tags(&["section"]))) as SharedParser],
        );
        let output = converter
            .convert("<section>a</section><section>b</section>")
            .expect("convert");
        assert_eq!(
            to_json(output),
            json!([
                {"type": "text", "content": "x"},
                {"type": "text", "content": "x"}
            ])
        );
    }

    #[test]
    fn version_is_stamped_only_when_configured() {
        let html = "<img src=\"a.png\">";
        let unversioned = Converter::default().convert(html).expect("convert");
        assert_eq!(unversioned[0].get("version"), None);

        let versioned = Converter::default_converter(ConverterOptions {
            ans_version: Some("0.10.9".into()),
            ..ConverterOptions::default()
        })
        .convert(html)
        .expect("convert");
        assert_eq!(versioned[0].get("version"), Some(&json!("0.10.9")));
    }

    #[test]
    fn unmatched_nodes_produce_nothing() {
        let converter = Converter::with_parsers(
            ConverterOptions::default(),
            [Arc::new(HeaderParser::new()) as SharedParser],
        );
        let output = converter
            .convert("<h2>Title</h2><section>ignored</section>")
            .expect("convert");
        assert_eq!(
            to_json(output),
            json!([{"type": "header", "content": "Title", "level": 2}])
        );
    }

    #[test]
    fn start_tag_selects_subtree() {
        let converter = Converter::default();
        let html = "<html><body><header><h1>Site</h1></header><article><p>Body</p></article></body></html>";
        let output = converter.convert_from(html, Some("article")).expect("convert");
        assert_eq!(to_json(output), json!([{"type": "text", "content": "Body"}]));
    }

    #[test]
    fn missing_start_tag_falls_back_to_body() {
        let converter = Converter::default();
        let output = converter
            .convert_from("<h1>One</h1>plain", Some("main"))
            .expect("convert");
        assert_eq!(
            to_json(output),
            json!([
                {"type": "header", "content": "One", "level": 1},
                {"type": "text", "content": "plain"}
            ])
        );

        let document = "<html><head><title>Skipped</title></head><body><p>Kept</p></body></html>";
        let output = converter.convert_from(document, None).expect("convert");
        assert_eq!(to_json(output), json!([{"type": "text", "content": "Kept"}]));
    }

    #[test]
    fn candidates_list_backups_last() {
        let converter = Converter::default();
        assert_eq!(
            converter.candidates(&NodeKey::tag("a")),
            vec!["flickr", "linked-image", "interstitial-link", "iframe", "raw-html"]
        );
        assert_eq!(
            converter.candidates(&NodeKey::Text),
            vec!["paragraph", "iframe", "raw-html"]
        );
    }

    #[test]
    fn converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }
}
