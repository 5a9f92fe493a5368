//! The built-in parser chain.

use std::sync::Arc;

use crate::parsers::{
    AudioParser, BlockquoteParser, EmbedParser, FigureParser, FormattedTextParser, HeaderParser,
    IFrameParser, ImageParser, InterstitialLinkParser, LinkedImageParser, ListParser, NullParser,
    ParagraphParser, RawHtmlParser, providers,
};
use crate::registry::SharedParser;

/// Default parsers in priority order: every embed provider, then the
/// generic text, media and fallback parsers.
#[must_use]
pub fn default_parsers() -> Vec<SharedParser> {
    let mut parsers: Vec<SharedParser> = providers::ALL
        .iter()
        .map(|provider| Arc::new(EmbedParser::new(*provider)) as SharedParser)
        .collect();

    parsers.extend([
        Arc::new(HeaderParser::new()) as SharedParser,
        Arc::new(ListParser::new()),
        Arc::new(FormattedTextParser::new()),
        Arc::new(BlockquoteParser::new()),
        Arc::new(ParagraphParser::new()),
        Arc::new(LinkedImageParser::new()),
        Arc::new(ImageParser::new()),
        Arc::new(FigureParser::new()),
        Arc::new(InterstitialLinkParser::new()),
        Arc::new(AudioParser::new()),
        Arc::new(IFrameParser::new()),
        Arc::new(NullParser::new()),
    ]);
    parsers
}

/// Parsers tried after every key's own candidates.
#[must_use]
pub fn backup_parsers() -> Vec<SharedParser> {
    vec![
        Arc::new(IFrameParser::new()) as SharedParser,
        Arc::new(RawHtmlParser::new()),
    ]
}
