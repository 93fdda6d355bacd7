//! Character reference decoding for template text and attribute values.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{a0}"),
        ("copy", "\u{a9}"),
        ("reg", "\u{ae}"),
        ("trade", "\u{2122}"),
        ("hellip", "\u{2026}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201c}"),
        ("rdquo", "\u{201d}"),
        ("laquo", "\u{ab}"),
        ("raquo", "\u{bb}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{b7}"),
        ("times", "\u{d7}"),
        ("divide", "\u{f7}"),
        ("plusmn", "\u{b1}"),
        ("deg", "\u{b0}"),
        ("para", "\u{b6}"),
        ("sect", "\u{a7}"),
        ("cent", "\u{a2}"),
        ("pound", "\u{a3}"),
        ("euro", "\u{20ac}"),
        ("yen", "\u{a5}"),
        ("larr", "\u{2190}"),
        ("uarr", "\u{2191}"),
        ("rarr", "\u{2192}"),
        ("darr", "\u{2193}"),
        ("harr", "\u{2194}"),
        ("hearts", "\u{2665}"),
        ("check", "\u{2713}"),
        ("zwj", "\u{200d}"),
        ("zwnj", "\u{200c}"),
        ("shy", "\u{ad}"),
    ])
});

/// Decodes the reference at the start of `input` (just after the `&`).
///
/// Returns the decoded text and how many bytes of `input` it consumed, or
/// `None` when `input` does not start with a complete `name;`, `#123;` or
/// `#x1F;` reference.
pub fn decode_character_reference(input: &str) -> Option<(String, usize)> {
    let end = input.find(';')?;
    let body = &input[..end];
    if body.is_empty() || body.len() > 32 {
        return None;
    }

    let decoded = if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        char::from_u32(code)?.to_string()
    } else {
        if !body.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return None;
        }
        NAMED_ENTITIES.get(body)?.to_string()
    };
    Some((decoded, end + 1))
}
