//! UTF-16 code unit conversion.
//!
//! Entity offsets and lengths count UTF-16 code units, so every piece of
//! span arithmetic in this crate happens on a unit buffer. Characters
//! outside the basic multilingual plane occupy two units (a surrogate
//! pair); slicing the unit buffer is the only way to guarantee that an
//! entity boundary lands between units and never inside a codepoint.

/// Encodes `text` as a buffer of UTF-16 code units.
pub fn to_units(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Decodes a unit buffer back into a string, collapsing surrogate pairs
/// into single codepoints.
///
/// A boundary that splits a pair leaves a lone surrogate behind; Rust
/// strings cannot represent one, so it decodes to U+FFFD instead of
/// failing. Rendering must never fail, even on malformed entity spans.
pub fn from_units(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|decoded| decoded.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Slice with lenient bounds: the end clamps to the buffer and an inverted
/// range is empty. Entity lists from misbehaving clients may point past the
/// end of the text; the renderer truncates instead of panicking.
pub(crate) fn slice(units: &[u16], start: usize, end: usize) -> &[u16] {
    let end = end.min(units.len());
    let start = start.min(end);
    &units[start..end]
}

pub(crate) fn is_whitespace(unit: u16) -> bool {
    char::from_u32(u32::from(unit)).is_some_and(char::is_whitespace)
}
