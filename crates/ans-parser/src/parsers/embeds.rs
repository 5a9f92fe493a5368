//! Third-party embed parsers.
//!
//! Every provider shares one extraction routine: find an identifying token
//! in an attribute of the node (or of a descendant of a given tag), narrow
//! it with the provider's pattern, and emit a `reference` element pointing
//! at the provider's oEmbed endpoint. Nothing is fetched.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::{Descriptor, ElementParser, construct_output};
use crate::dom::NodeRef;
use crate::error::ElementError;
use crate::result::ParseResult;
use crate::urls::decode_token;
use crate::utils::is_empty;

/// Embed types whose references are not resolved through oEmbed.
const NON_OEMBED_TYPES: &[&str] = &["video"];

/// Static description of one embed provider.
pub struct EmbedProvider {
    /// Parser name, used in logs and errors.
    pub name: &'static str,
    /// Tags the embed markup starts with.
    pub tags: &'static [&'static str],
    /// Classes the outer element must carry.
    pub classes: &'static [&'static str],
    /// Descendant tag searched when the outer element has no token.
    pub tag: &'static str,
    /// Attribute holding the token.
    pub attr: &'static str,
    /// Narrows the attribute value to its first capture group.
    pub pattern: Option<&'static LazyLock<Regex>>,
    /// `referent.type`.
    pub embed_type: &'static str,
    /// `referent.provider`.
    pub provider: &'static str,
    /// Post-processing applied to the decoded id.
    pub rewrite: Option<fn(&str) -> String>,
}

impl std::fmt::Debug for EmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedProvider")
            .field("name", &self.name)
            .field("embed_type", &self.embed_type)
            .finish_non_exhaustive()
    }
}

impl EmbedProvider {
    /// Token carried by `node`, if any.
    fn token<'a>(&self, node: NodeRef<'a>) -> Option<&'a str> {
        let value = node.attr(self.attr).filter(|v| !v.is_empty())?;
        match self.pattern {
            Some(pattern) => pattern
                .captures(value)?
                .get(1)
                .map(|m| m.as_str())
                .filter(|id| !id.is_empty()),
            None => Some(value),
        }
    }

    fn find_token<'a>(&self, node: NodeRef<'a>) -> Option<&'a str> {
        self.token(node).or_else(|| {
            node.find_all(&[self.tag])
                .into_iter()
                .find_map(|candidate| self.token(candidate))
        })
    }
}

/// Parser for one [`EmbedProvider`].
#[derive(Debug)]
pub struct EmbedParser {
    provider: &'static EmbedProvider,
    descriptor: Descriptor,
}

impl EmbedParser {
    #[must_use]
    pub fn new(provider: &'static EmbedProvider) -> Self {
        Self {
            provider,
            descriptor: Descriptor::tags(provider.tags).with_classes(provider.classes),
        }
    }

    #[must_use]
    pub const fn provider(&self) -> &'static EmbedProvider {
        self.provider
    }
}

impl ElementParser for EmbedParser {
    fn name(&self) -> &str {
        self.provider.name
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, node: NodeRef<'_>) -> Result<ParseResult, ElementError> {
        let provider = self.provider;
        let result = provider.find_token(node).map_or_else(ParseResult::no_match, |token| {
            let mut id = decode_token(token);
            if let Some(rewrite) = provider.rewrite {
                id = rewrite(&id);
            }

            let mut referent = Map::new();
            referent.insert("provider".into(), Value::from(provider.provider));
            referent.insert("type".into(), Value::from(provider.embed_type));
            referent.insert("id".into(), Value::from(id));
            if !NON_OEMBED_TYPES.contains(&provider.embed_type) {
                referent.insert("service".into(), Value::from("oembed"));
            }

            let mut output = construct_output(node, "reference", None);
            output.insert("referent".into(), Value::Object(referent));
            ParseResult::matched(output)
        });

        remove_embed_script(node, provider.name);
        Ok(result)
    }
}

/// Embed snippets usually come with a loader `<script>`. Drop the next
/// non-empty sibling if it is one; otherwise drop the scripts inside that
/// sibling, or inside `node` when there is no element sibling.
fn remove_embed_script(node: NodeRef<'_>, provider: &str) {
    let mut next = node.next_sibling();
    while let Some(sibling) = next.filter(|s| is_empty(*s)) {
        next = sibling.next_sibling();
    }

    match next.filter(|sibling| sibling.is_element()) {
        Some(script) if script.is_tag("script") => {
            debug!(provider, "detaching embed script");
            script.detach();
        }
        Some(sibling) => remove_all_scripts(sibling, provider),
        None => remove_all_scripts(node, provider),
    }
}

fn remove_all_scripts(node: NodeRef<'_>, provider: &str) {
    for script in node.find_all(&["script"]) {
        debug!(provider, "detaching nested embed script");
        script.detach();
    }
}

fn youtube_watch_url(id: &str) -> String {
    let path = id
        .split_once("://")
        .map_or(id, |(_, rest)| rest.find('/').map_or("", |slash| &rest[slash..]));
    let path = path.split(['?', '#']).next().unwrap_or_default();
    format!("https://www.youtube.com/watch?v={}", path.replace("/embed/", ""))
}

// ── Providers ──────────────────────────────────────────────────────

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("embed pattern is valid"));
    };
}

pattern!(DAILYMOTION_RE, r"https?://www.dailymotion.com/embed/video/(.+)");
pattern!(FACEBOOK_POST_RE, r"https?://www.facebook.com/plugins/post\.php\?href=(.*)");
pattern!(FACEBOOK_VIDEO_RE, r"https?://www.facebook.com/plugins/video\.php\?href=(.*)");
pattern!(FLICKR_RE, r"(https?://www.flickr.com/photos/.+)");
pattern!(IMGUR_RE, r"(https?://imgur.com/.*)");
pattern!(INSTAGRAM_RE, r"(https?://www.instagram.com/[\w-]+/[\w-]+/)");
pattern!(POLLDADDY_RE, r"(https?://poll.fm/(\d+))");
pattern!(SPOTIFY_RE, r"(https?://\w+.spotify.com/.*)");
pattern!(TUMBLR_RE, r"(https?://\w+.tumblr.com/post/\d+)");
pattern!(TWITTER_RE, r"https?://twitter.com/\w+/status/(\d+)");
pattern!(YOUTUBE_RE, r"(https?://www.youtube.com/embed/[\w-]+)");
pattern!(VIMEO_RE, r"(https?://player.vimeo.com/video/\w+)");
pattern!(VINE_RE, r"(https?://vine.co/v(/[\w?=]+)+)");

/// Built-in providers.
pub mod providers {
    use super::{
        DAILYMOTION_RE, EmbedProvider, FACEBOOK_POST_RE, FACEBOOK_VIDEO_RE, FLICKR_RE, IMGUR_RE,
        INSTAGRAM_RE, POLLDADDY_RE, SPOTIFY_RE, TUMBLR_RE, TWITTER_RE, VIMEO_RE, VINE_RE,
        YOUTUBE_RE, youtube_watch_url,
    };

    pub static ARC_PLAYER: EmbedProvider = EmbedProvider {
        name: "arc-player",
        tags: &["div"],
        classes: &["arc-player"],
        tag: "div",
        attr: "data-uuid",
        pattern: None,
        embed_type: "video",
        provider: "",
        rewrite: None,
    };

    pub static DAILYMOTION: EmbedProvider = EmbedProvider {
        name: "dailymotion",
        tags: &["iframe"],
        classes: &[],
        tag: "iframe",
        attr: "src",
        pattern: Some(&DAILYMOTION_RE),
        embed_type: "dailymotion",
        provider: "https://www.dailymotion.com/services/oembed?id=",
        rewrite: None,
    };

    pub static FACEBOOK_POST: EmbedProvider = EmbedProvider {
        name: "facebook-post",
        tags: &["iframe"],
        classes: &[],
        tag: "iframe",
        attr: "src",
        pattern: Some(&FACEBOOK_POST_RE),
        embed_type: "facebook-post",
        provider: "https://www.facebook.com/plugins/post/oembed.json/?url=",
        rewrite: None,
    };

    pub static FACEBOOK_VIDEO: EmbedProvider = EmbedProvider {
        name: "facebook-video",
        tags: &["iframe"],
        classes: &[],
        tag: "iframe",
        attr: "src",
        pattern: Some(&FACEBOOK_VIDEO_RE),
        embed_type: "facebook-video",
        provider: "https://www.facebook.com/plugins/video/oembed.json/?url=",
        rewrite: None,
    };

    pub static FLICKR: EmbedProvider = EmbedProvider {
        name: "flickr",
        tags: &["a"],
        classes: &[],
        tag: "a",
        attr: "href",
        pattern: Some(&FLICKR_RE),
        embed_type: "flickr",
        provider: "https://www.flickr.com/services/oembed.json/?url=",
        rewrite: None,
    };

    pub static IMGUR: EmbedProvider = EmbedProvider {
        name: "imgur",
        tags: &["blockquote"],
        classes: &["imgur-embed-pub"],
        tag: "a",
        attr: "href",
        pattern: Some(&IMGUR_RE),
        embed_type: "imgur",
        provider: "https://api.imgur.com/oembed/?url=",
        rewrite: None,
    };

    pub static INSTAGRAM: EmbedProvider = EmbedProvider {
        name: "instagram",
        tags: &["blockquote"],
        classes: &["instagram-media"],
        tag: "a",
        attr: "href",
        pattern: Some(&INSTAGRAM_RE),
        embed_type: "instagram",
        provider: "https://api.instagram.com/oembed?url=",
        rewrite: None,
    };

    pub static POLLDADDY: EmbedProvider = EmbedProvider {
        name: "polldaddy",
        tags: &["noscript"],
        classes: &[],
        tag: "a",
        attr: "href",
        pattern: Some(&POLLDADDY_RE),
        embed_type: "polldaddy",
        provider: "https://polldaddy.com/oembed/?url=",
        rewrite: None,
    };

    pub static REDDIT: EmbedProvider = EmbedProvider {
        name: "reddit",
        tags: &["blockquote"],
        classes: &["reddit-card"],
        tag: "a",
        attr: "href",
        pattern: None,
        embed_type: "reddit",
        provider: "https://www.reddit.com/oembed?url=",
        rewrite: None,
    };

    pub static SPOTIFY: EmbedProvider = EmbedProvider {
        name: "spotify",
        tags: &["iframe"],
        classes: &[],
        tag: "iframe",
        attr: "src",
        pattern: Some(&SPOTIFY_RE),
        embed_type: "spotify",
        provider: "https://embed.spotify.com/oembed/?url=",
        rewrite: None,
    };

    pub static TUMBLR: EmbedProvider = EmbedProvider {
        name: "tumblr",
        tags: &["div"],
        classes: &["tumblr-post"],
        tag: "a",
        attr: "href",
        pattern: Some(&TUMBLR_RE),
        embed_type: "tumblr",
        provider: "https://www.tumblr.com/oembed/1.0?url=",
        rewrite: None,
    };

    pub static TWITTER_TWEET: EmbedProvider = EmbedProvider {
        name: "twitter-tweet",
        tags: &["blockquote"],
        classes: &["twitter-tweet"],
        tag: "a",
        attr: "href",
        pattern: Some(&TWITTER_RE),
        embed_type: "twitter",
        provider: "https://api.twitter.com/1.1/statuses/oembed.json?id=",
        rewrite: None,
    };

    pub static TWITTER_VIDEO: EmbedProvider = EmbedProvider {
        name: "twitter-video",
        tags: &["blockquote"],
        classes: &["twitter-video"],
        tag: "a",
        attr: "href",
        pattern: Some(&TWITTER_RE),
        embed_type: "twitter",
        provider: "https://api.twitter.com/1.1/statuses/oembed.json?id=",
        rewrite: None,
    };

    pub static YOUTUBE: EmbedProvider = EmbedProvider {
        name: "youtube",
        tags: &["iframe"],
        classes: &[],
        tag: "iframe",
        attr: "src",
        pattern: Some(&YOUTUBE_RE),
        embed_type: "youtube",
        provider: "https://www.youtube.com/oembed?format=json&url=",
        rewrite: Some(youtube_watch_url),
    };

    pub static VIMEO: EmbedProvider = EmbedProvider {
        name: "vimeo",
        tags: &["iframe"],
        classes: &[],
        tag: "iframe",
        attr: "src",
        pattern: Some(&VIMEO_RE),
        embed_type: "vimeo",
        provider: "https://vimeo.com/api/oembed.json?url=",
        rewrite: None,
    };

    pub static VINE: EmbedProvider = EmbedProvider {
        name: "vine",
        tags: &["iframe"],
        classes: &["vine-embed"],
        tag: "iframe",
        attr: "src",
        pattern: Some(&VINE_RE),
        embed_type: "vine",
        provider: "https://vine.co/oembed.json?url=",
        rewrite: None,
    };

    /// Every built-in provider, in dispatch order.
    pub static ALL: [&EmbedProvider; 16] = [
        &ARC_PLAYER,
        &DAILYMOTION,
        &FACEBOOK_POST,
        &FACEBOOK_VIDEO,
        &FLICKR,
        &IMGUR,
        &INSTAGRAM,
        &POLLDADDY,
        &REDDIT,
        &SPOTIFY,
        &TUMBLR,
        &TWITTER_TWEET,
        &TWITTER_VIDEO,
        &YOUTUBE,
        &VIMEO,
        &VINE,
    ];
}
