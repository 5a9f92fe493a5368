//! Best-effort repair of text extracted from markup.
//!
//! Article HTML frequently contains UTF-8 that was decoded as Windows-1252
//! somewhere upstream (`cafÃ©` instead of `café`). Such sequences are
//! re-encoded and decoded again. Line breaks are normalised to `\n` and
//! invisible control characters are removed.

use std::borrow::Cow;

/// Unicode characters for the Windows-1252 bytes `0x80..=0x9F`. Undefined
/// bytes map to the matching C1 control, as Latin-1 would decode them.
const CP1252_HIGH: [char; 32] = [
    '\u{20ac}', '\u{81}', '\u{201a}', '\u{192}', '\u{201e}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2c6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8d}', '\u{17d}', '\u{8f}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2dc}', '\u{2122}', '\u{161}', '\u{203a}', '\u{153}', '\u{9d}', '\u{17e}', '\u{178}',
];

/// Repair mojibake, normalise line breaks and strip control characters.
#[must_use]
pub fn fix_text(text: &str) -> String {
    let text = fix_mojibake(text);
    let text = fix_line_breaks(&text);
    remove_control_chars(&text)
}

/// The single byte `ch` encodes to in Windows-1252, if any.
fn cp1252_byte(ch: char) -> Option<u8> {
    let code = u32::from(ch);
    if code < 0x80 || (0xa0..=0xff).contains(&code) {
        return u8::try_from(code).ok();
    }
    CP1252_HIGH
        .iter()
        .position(|&c| c == ch)
        .and_then(|i| u8::try_from(0x80 + i).ok())
}

/// Number of continuation bytes announced by a UTF-8 lead byte.
const fn continuation_len(lead: u8) -> Option<usize> {
    match lead {
        0xc2..=0xdf => Some(1),
        0xe0..=0xef => Some(2),
        0xf0..=0xf4 => Some(3),
        _ => None,
    }
}

fn fix_mojibake(text: &str) -> Cow<'_, str> {
    let chars: Vec<char> = text.chars().collect();
    if !chars.iter().any(|&c| ('\u{c2}'..='\u{f4}').contains(&c)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if let Some((decoded, consumed)) = decode_sequence(&chars[i..]) {
            out.push(decoded);
            i += consumed;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Cow::Owned(out)
}

/// Decode one mis-decoded UTF-8 sequence at the start of `chars`.
fn decode_sequence(chars: &[char]) -> Option<(char, usize)> {
    let lead = cp1252_byte(*chars.first()?)?;
    let len = continuation_len(lead)?;
    let mut bytes = vec![lead];
    for &c in chars.get(1..=len)? {
        let byte = cp1252_byte(c).filter(|b| (0x80..=0xbf).contains(b))?;
        bytes.push(byte);
    }
    let decoded = std::str::from_utf8(&bytes).ok()?;
    let ch = decoded.chars().next()?;
    Some((ch, len + 1))
}

fn fix_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\u{2028}', '\u{2029}', '\u{85}']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("\r\n", "\n")
            .replace(['\r', '\u{2028}', '\u{2029}', '\u{85}'], "\n"),
    )
}

fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            !matches!(c,
                '\u{0}'..='\u{8}' | '\u{b}'..='\u{c}' | '\u{e}'..='\u{1f}' | '\u{7f}' | '\u{feff}'
            )
        })
        .collect()
}
