use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::parsers::embeds::providers;

fn embed(provider: &'static EmbedProvider) -> EmbedParser {
    EmbedParser::new(provider)
}

/// Referent of the reference element parsed from the first `<tag>`.
fn referent(provider: &'static EmbedProvider, html: &str, tag: &str) -> Value {
    let output = output_json(parse_tag(&embed(provider), html, tag));
    assert_eq!(output["type"], "reference");
    output["referent"].clone()
}

// ── Providers ──────────────────────────────────────────────────────

#[rstest]
#[case(
    "<iframe src=\"https://www.youtube.com/embed/7IBERQ9abkk?feature=oembed\"></iframe>",
    "https://www.youtube.com/watch?v=7IBERQ9abkk"
)]
#[case(
    "<iframe src=\"http://www.youtube.com/embed/OVK-tGUZy9A?rel=0\"></iframe>",
    "https://www.youtube.com/watch?v=OVK-tGUZy9A"
)]
#[case(
    "<iframe src=\"https://www.youtube.com/embed/4I86iz4X4jM\"></iframe>",
    "https://www.youtube.com/watch?v=4I86iz4X4jM"
)]
fn youtube_ids_become_watch_urls(#[case] html: &str, #[case] id: &str) {
    assert_eq!(
        referent(&providers::YOUTUBE, html, "iframe"),
        json!({
            "provider": "https://www.youtube.com/oembed?format=json&url=",
            "type": "youtube",
            "id": id,
            "service": "oembed"
        })
    );
}

#[rstest]
#[case(
    "<blockquote class=\"twitter-tweet\" data-lang=\"en\"><p lang=\"en\" dir=\"ltr\">.<a href=\"https://twitter.com/CityDogsRescue\">@CityDogsRescue</a> facilitated 712 adoptions</p>&mdash; Melissa Steffan (@melissasteffan) <a href=\"https://twitter.com/melissasteffan/status/692759996610715648\">January 28, 2016</a></blockquote>",
    "692759996610715648"
)]
#[case(
    "<blockquote class=\"twitter-tweet\" data-lang=\"en\"><p>Displaced by Woolsey fire</p>&mdash; Los Angeles Times (@latimes) <a href=\"https://twitter.com/latimes/status/1065323995959037953?ref_src=twsrc%5Etfw\">November 21, 2018</a></blockquote>",
    "1065323995959037953"
)]
fn twitter_tweet_id_from_status_link(#[case] html: &str, #[case] id: &str) {
    let output = output_json(parse_tag(&embed(&providers::TWITTER_TWEET), html, "blockquote"));
    assert_eq!(output["referent"]["id"], id);
    assert_eq!(output["referent"]["type"], "twitter");
    assert_eq!(output["referent"]["service"], "oembed");
    assert_eq!(output["additional_properties"]["class"][0], "twitter-tweet");
    assert_eq!(output["additional_properties"]["data-lang"], "en");
}

#[test]
fn twitter_video_requires_its_class() {
    let html = "<blockquote class=\"twitter-video\" data-lang=\"es\"><p>GRACIAS</p><a href=\"https://twitter.com/Granaderosarg/status/752635477799370752\">July 11, 2016</a></blockquote>";
    assert!(applies(&embed(&providers::TWITTER_VIDEO), html, "blockquote"));
    assert!(!applies(&embed(&providers::TWITTER_TWEET), html, "blockquote"));
    assert_eq!(
        referent(&providers::TWITTER_VIDEO, html, "blockquote")["id"],
        "752635477799370752"
    );
}

#[rstest]
#[case(
    "<iframe src=\"https://www.facebook.com/plugins/post.php?href=https%3A%2F%2Fwww.facebook.com%2Fzuck%2Fposts%2F10102883338403521&width=500\"></iframe>",
    "https://www.facebook.com/zuck/posts/10102883338403521&width=500"
)]
#[case(
    "<iframe src=\"http://www.facebook.com/plugins/post.php?href=http%3A%2F%2Fwww.facebook.com%2Fzuck%2Fposts%2F10102883338403521\"></iframe>",
    "https://www.facebook.com/zuck/posts/10102883338403521"
)]
fn facebook_post_ids_are_decoded(#[case] html: &str, #[case] id: &str) {
    let referent = referent(&providers::FACEBOOK_POST, html, "iframe");
    assert_eq!(referent["id"], id);
    assert_eq!(referent["type"], "facebook-post");
    assert_eq!(
        referent["provider"],
        "https://www.facebook.com/plugins/post/oembed.json/?url="
    );
}

#[test]
fn facebook_video_id() {
    let html = "<iframe src=\"https://www.facebook.com/plugins/video.php?href=https%3A%2F%2Fwww.facebook.com%2Fchicagotribune%2Fvideos%2F351670322074116%2F&show_text=0&width=560\"></iframe>";
    assert_eq!(
        referent(&providers::FACEBOOK_VIDEO, html, "iframe")["id"],
        "https://www.facebook.com/chicagotribune/videos/351670322074116/&show_text=0&width=560"
    );
}

#[rstest]
#[case("div")]
#[case("section")]
#[case("span")]
fn arc_player_uses_data_uuid_without_oembed(#[case] tag: &str) {
    let html = format!(
        "<{tag} class=\"arc-player\" data-org=\"washingtonpost\" data-uuid=\"cc09466e-7982-4dca-a56e-8d1155f68361\"></{tag}>"
    );
    assert_eq!(
        referent(&providers::ARC_PLAYER, &html, tag),
        json!({
            "provider": "",
            "type": "video",
            "id": "cc09466e-7982-4dca-a56e-8d1155f68361"
        })
    );
}

#[test]
fn arc_player_requires_class() {
    let parser = embed(&providers::ARC_PLAYER);
    assert!(applies(&parser, "<div class=\"arc-player\" data-uuid=\"x\"></div>", "div"));
    assert!(!applies(&parser, "<div data-uuid=\"x\"></div>", "div"));
}

#[rstest]
#[case(
    &providers::DAILYMOTION,
    "<iframe frameborder=\"0\" src=\"https://www.dailymotion.com/embed/video/x2p99yn\"></iframe>",
    "iframe",
    "x2p99yn"
)]
#[case(
    &providers::FLICKR,
    "<a data-flickr-embed=\"true\" href=\"https://www.flickr.com/photos/16177003@N03/8240338083/in/photolist-dyaTqx\" title=\"Fox\"><img src=\"https://farm9.staticflickr.com/8066/8240338083_938cc14c6f_k.jpg\" alt=\"Fox\"></a>",
    "a",
    "https://www.flickr.com/photos/16177003@N03/8240338083/in/photolist-dyaTqx"
)]
#[case(
    &providers::IMGUR,
    "<blockquote class=\"imgur-embed-pub\" lang=\"en\" data-id=\"a/FhjmG\"><a href=\"//imgur.com/FhjmG\">Cat</a> <a href=\"http://imgur.com/a/FhjmG\">album</a></blockquote>",
    "blockquote",
    "https://imgur.com/a/FhjmG"
)]
#[case(
    &providers::INSTAGRAM,
    "<blockquote class=\"instagram-media\" data-instgrm-version=\"9\"><div><a href=\"https://www.instagram.com/p/BqVdnf4l6Lb/?utm_source=ig_embed\" target=\"_blank\">A post shared by CNN</a></div></blockquote>",
    "blockquote",
    "https://www.instagram.com/p/BqVdnf4l6Lb/"
)]
#[case(
    &providers::POLLDADDY,
    "<noscript><a href=\"http://poll.fm/10137355\">Take Our Poll</a></noscript>",
    "noscript",
    "https://poll.fm/10137355"
)]
#[case(
    &providers::REDDIT,
    "<blockquote class=\"reddit-card\"><a href=\"https://www.reddit.com/r/podcasts/comments/9zd3ip/\">A curated list</a></blockquote>",
    "blockquote",
    "https://www.reddit.com/r/podcasts/comments/9zd3ip/"
)]
#[case(
    &providers::SPOTIFY,
    "<iframe src=\"https://open.spotify.com/embed/album/1DFixLWuPkv3KT3TnV35m3\" allow=\"encrypted-media\"></iframe>",
    "iframe",
    "https://open.spotify.com/embed/album/1DFixLWuPkv3KT3TnV35m3"
)]
#[case(
    &providers::TUMBLR,
    "<div class=\"tumblr-post\" data-did=\"abc\"><a href=\"https://herepet.tumblr.com/post/180352280783/source-instagram\">herepet</a></div>",
    "div",
    "https://herepet.tumblr.com/post/180352280783"
)]
#[case(
    &providers::VIMEO,
    "<iframe src=\"https://player.vimeo.com/video/299467393?color=ffffff\"></iframe>",
    "iframe",
    "https://player.vimeo.com/video/299467393"
)]
#[case(
    &providers::VINE,
    "<iframe class=\"vine-embed\" src=\"https://vine.co/v/5WYDJFYYmWp/embed/simple\"></iframe>",
    "iframe",
    "https://vine.co/v/5WYDJFYYmWp/embed/simple"
)]
fn provider_ids(
    #[case] provider: &'static EmbedProvider,
    #[case] html: &str,
    #[case] tag: &str,
    #[case] id: &str,
) {
    let parser = embed(provider);
    assert!(applies(&parser, html, tag), "{} should apply", provider.name);
    let referent = referent(provider, html, tag);
    assert_eq!(referent["id"], id);
    assert_eq!(referent["type"], provider.embed_type);
    assert_eq!(referent["provider"], provider.provider);
    assert_eq!(referent["service"], "oembed");
}

#[test]
fn unrecognised_iframe_does_not_match() {
    let result = parse_tag(
        &embed(&providers::YOUTUBE),
        "<iframe src=\"https://scores.test.com/page.html\"></iframe>",
        "iframe",
    );
    assert_eq!(result, ParseResult::no_match());
}

#[test]
fn provider_table_order() {
    let names: Vec<_> = providers::ALL.iter().map(|p| p.name).collect();
    assert_eq!(
        names,
        vec![
            "arc-player",
            "dailymotion",
            "facebook-post",
            "facebook-video",
            "flickr",
            "imgur",
            "instagram",
            "polldaddy",
            "reddit",
            "spotify",
            "tumblr",
            "twitter-tweet",
            "twitter-video",
            "youtube",
            "vimeo",
            "vine",
        ]
    );
}

// ── Script removal ─────────────────────────────────────────────────

fn parse_and_serialize(provider: &'static EmbedProvider, html: &str, tag: &str) -> (bool, String) {
    let doc = Document::parse(html);
    let node = doc.find(tag).expect("embed node");
    let result = embed(provider).parse(node).expect("parse");
    (result.matched, doc.body().inner_html())
}

#[test]
fn trailing_script_sibling_is_detached() {
    let (matched, html) = parse_and_serialize(
        &providers::TWITTER_TWEET,
        "<blockquote class=\"twitter-tweet\"><a href=\"https://twitter.com/a/status/1\">t</a></blockquote>\n<script async src=\"https://platform.twitter.com/widgets.js\"></script><p>after</p>",
        "blockquote",
    );
    assert!(matched);
    assert_eq!(
        html,
        "<blockquote class=\"twitter-tweet\"><a href=\"https://twitter.com/a/status/1\">t</a></blockquote>\n<p>after</p>"
    );
}

#[test]
fn scripts_inside_next_sibling_are_detached() {
    let (_, html) = parse_and_serialize(
        &providers::INSTAGRAM,
        "<blockquote class=\"instagram-media\"><a href=\"https://www.instagram.com/p/abc/\">x</a></blockquote><div><script src=\"//www.instagram.com/embed.js\"></script><span>kept</span></div>",
        "blockquote",
    );
    assert!(!html.contains("<script"));
    assert!(html.contains("<span>kept</span>"));
}

#[test]
fn scripts_inside_node_are_detached_without_element_sibling() {
    let (matched, html) = parse_and_serialize(
        &providers::REDDIT,
        "<blockquote class=\"reddit-card\"><a href=\"https://www.reddit.com/r/x/\">x</a><script src=\"//embed.redditmedia.com/widgets/platform.js\"></script></blockquote>",
        "blockquote",
    );
    assert!(matched);
    assert_eq!(
        html,
        "<blockquote class=\"reddit-card\"><a href=\"https://www.reddit.com/r/x/\">x</a></blockquote>"
    );
}

#[test]
fn script_is_detached_even_without_match() {
    let (matched, html) = parse_and_serialize(
        &providers::DAILYMOTION,
        "<iframe src=\"https://example.com/player\"></iframe><script src=\"loader.js\"></script>",
        "iframe",
    );
    assert!(!matched);
    assert_eq!(html, "<iframe src=\"https://example.com/player\"></iframe>");
}
