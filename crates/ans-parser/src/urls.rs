//! URL helpers.

use std::borrow::Cow;

/// Characters that may appear unescaped in a URL.
fn is_url_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '-' | '.' | '_' | '~' | ':' | '/' | '?' | '#' | '[' | ']' | '@' | '!' | '$' | '&'
                | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
        )
}

/// Percent-encode characters that are illegal in a URL.
///
/// Reserved characters and existing `%XX` escapes are kept, so encoding an
/// already encoded URL is a no-op.
#[must_use]
pub fn encode_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let bytes = url.as_bytes();
    for (i, ch) in url.char_indices() {
        if is_url_safe(ch) {
            out.push(ch);
        } else if ch == '%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            out.push('%');
        } else {
            let mut buf = [0; 4];
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

/// Percent-decode an embed token and force `https`. Tokens that do not
/// decode to UTF-8 are used as-is.
#[must_use]
pub fn decode_token(token: &str) -> String {
    let decoded = urlencoding::decode(token).unwrap_or(Cow::Borrowed(token));
    decoded.replace("http://", "https://")
}
