//! XML Encoding Detection and Conversion
//!
//! Handles detection of UTF-16 based on BOM or byte patterns and converts
//! the document to a UTF-8 `String` before tokenizing.

/// Detect the encoding of XML input based on BOM or byte patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            _ => XmlEncoding::Utf8,
        }
    }
}

/// Decode raw document bytes into UTF-8 text, dropping any byte order mark
pub fn decode_document(input: Vec<u8>) -> Result<String, String> {
    match XmlEncoding::detect(&input) {
        XmlEncoding::Utf8 => {
            let mut text = String::from_utf8(input).map_err(|e| format!("Invalid UTF-8: {}", e))?;
            if text.starts_with('\u{FEFF}') {
                text.drain(..'\u{FEFF}'.len_utf8());
            }
            Ok(text)
        }
        XmlEncoding::Utf16Le => decode_utf16(&input, [0xFF, 0xFE], u16::from_le_bytes, "LE"),
        XmlEncoding::Utf16Be => decode_utf16(&input, [0xFE, 0xFF], u16::from_be_bytes, "BE"),
    }
}

fn decode_utf16(
    input: &[u8],
    bom: [u8; 2],
    unit: fn([u8; 2]) -> u16,
    label: &str,
) -> Result<String, String> {
    let bytes = input.strip_prefix(&bom[..]).unwrap_or(input);

    if bytes.len() % 2 != 0 {
        return Err(format!("Invalid UTF-16 {}: odd number of bytes", label));
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| unit([chunk[0], chunk[1]]))
        .collect();

    String::from_utf16(&code_units).map_err(|e| format!("Invalid UTF-16 {}: {}", label, e))
}
