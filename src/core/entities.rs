//! XML Entity Decoding and Escaping
//!
//! Decoding handles the predefined entities (`&lt;` `&gt;` `&amp;` `&quot;`
//! `&apos;`) and numeric character references. WADL documents carry no DTD,
//! so any other entity reference is an error.
//!
//! Uses Cow for zero-copy when nothing needs to change.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
pub fn decode_text(input: &str) -> Result<Cow<'_, str>, &'static str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = memchr(b';', after.as_bytes()).ok_or("Unterminated entity reference")?;
        result.push(decode_entity(&after[..semi])?);
        rest = &after[semi + 1..];
    }
    result.push_str(rest);

    Ok(Cow::Owned(result))
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Result<char, &'static str> {
    match entity {
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "amp" => Ok('&'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ => match entity.strip_prefix('#') {
            Some(reference) => decode_numeric_entity(reference),
            None => Err("Undefined entity reference"),
        },
    }
}

/// Decode a numeric character reference (`#65` or `#x41`, without the `#`)
fn decode_numeric_entity(reference: &str) -> Result<char, &'static str> {
    let codepoint = match reference.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => reference.parse::<u32>(),
    }
    .map_err(|_| "Invalid character reference")?;

    char::from_u32(codepoint)
        .filter(|&c| is_valid_xml_char(c))
        .ok_or("Character reference to a character not allowed in XML")
}

/// End-of-line handling: `\r\n` and lone `\r` become `\n`
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if memchr(b'\r', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Attribute-value normalization: every literal line break or tab becomes a
/// space, a `\r\n` pair counting as one line break.
///
/// Runs before entity decoding, so `&#10;` and friends survive.
pub fn normalize_attribute_whitespace(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| matches!(b, b'\t' | b'\n' | b'\r')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\t' | '\n' | '\r' => result.push(' '),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Check if a character is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(c: char) -> bool {
    matches!(c as u32,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

/// Escape character data for HTML output
pub fn escape_text(input: &str) -> Cow<'_, str> {
    escape_with(input, |c| match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        _ => None,
    })
}

/// Escape a double-quoted HTML attribute value
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    escape_with(input, |c| match c {
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '<' => Some("&lt;"),
        _ => None,
    })
}

fn escape_with(input: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    // Fast path: nothing to escape
    if !input.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match replacement(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}
