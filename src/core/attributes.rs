//! XML Attribute Parsing
//!
//! Parses the attribute list of a start tag. Parsing is strict: every
//! attribute needs a quoted value, names may not repeat, and entity
//! references in values must be well-formed.

use super::entities::{decode_text, normalize_attribute_whitespace};
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use std::borrow::Cow;

/// A parsed attribute, borrowed from the tag text where possible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute<'a> {
    /// Attribute name as written (may include namespace prefix)
    pub name: &'a str,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, str>,
}

impl RawAttribute<'_> {
    /// Namespace declarations are `xmlns` or `xmlns:prefix`
    pub fn is_namespace_declaration(&self) -> bool {
        self.name == "xmlns" || self.name.starts_with("xmlns:")
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'
pub fn parse_attributes(input: &str) -> Result<Vec<RawAttribute<'_>>, &'static str> {
    let bytes = input.as_bytes();
    let mut attrs: Vec<RawAttribute<'_>> = Vec::new();
    let mut pos = 0;

    loop {
        let ws_start = pos;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        if !attrs.is_empty() && pos == ws_start {
            return Err("Attributes must be separated by whitespace");
        }

        // Attribute name
        if !is_name_start_char(bytes[pos]) {
            return Err("Attribute name must start with letter, underscore, or colon");
        }
        let name_start = pos;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'=') {
            return Err("Attribute value required");
        }
        pos += 1;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        // Quoted value
        let quote = match bytes.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err("Attribute value must be quoted"),
        };
        pos += 1;
        let value_start = pos;
        while pos < bytes.len() && bytes[pos] != quote {
            if bytes[pos] == b'<' {
                return Err("Attribute value cannot contain '<'");
            }
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err("Attribute value has mismatched quotes");
        }
        let value = match normalize_attribute_whitespace(&input[value_start..pos]) {
            Cow::Borrowed(raw) => decode_text(raw)?,
            Cow::Owned(normalized) => Cow::Owned(decode_text(&normalized)?.into_owned()),
        };
        pos += 1; // Skip closing quote

        if attrs.iter().any(|a| a.name == name) {
            return Err("Duplicate attribute");
        }
        attrs.push(RawAttribute { name, value });
    }

    Ok(attrs)
}
