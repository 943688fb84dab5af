//! Strict pull reader over an in-memory document
//!
//! Produces namespace-resolved [`XmlEvent`]s one at a time. Well-formedness
//! is checked as the reader goes, so a broken document only fails once the
//! offending construct is pulled.

use super::events::{Attribute, QName, XmlEvent};
use super::namespace::{split_qname, NamespaceResolver};
use crate::core::attributes::parse_attributes;
use crate::core::entities::{decode_text, is_valid_xml_char, normalize_line_endings};
use crate::core::scanner::{is_name_start_char, is_whitespace, Scanner};

/// Well-formedness violation with the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Where the reader is relative to the root element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// StartDocument not yet emitted
    Start,
    /// Before the root element
    Prolog,
    /// Inside the root element
    Content,
    /// After the root element closed
    Epilog,
    /// EndDocument emitted, or an error was reported
    Done,
}

/// Strict XML reader from a string slice
pub struct SliceReader<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    namespaces: NamespaceResolver,
    /// Names of the currently open elements, innermost last
    open: Vec<QName>,
    /// End event owed for an empty-element tag
    pending: Option<XmlEvent>,
    state: ReaderState,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a str) -> Self {
        SliceReader {
            input,
            scanner: Scanner::new(input.as_bytes()),
            namespaces: NamespaceResolver::new(),
            open: Vec::with_capacity(32),
            pending: None,
            state: ReaderState::Start,
        }
    }

    /// One-based line and column of a byte offset
    pub fn line_col(&self, position: usize) -> (usize, usize) {
        self.scanner.line_col(position)
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Get the next XML event, `Ok(None)` once EndDocument has been produced
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, ParseError> {
        let result = self.read_event();
        if result.is_err() {
            self.state = ReaderState::Done;
        }
        result
    }

    fn read_event(&mut self) -> Result<Option<XmlEvent>, ParseError> {
        if let Some(event) = self.pending.take() {
            return Ok(Some(event));
        }

        loop {
            match self.state {
                ReaderState::Done => return Ok(None),
                ReaderState::Start => {
                    self.state = ReaderState::Prolog;
                    return Ok(Some(XmlEvent::StartDocument));
                }
                _ => {}
            }

            if self.scanner.is_eof() {
                return self.finish().map(Some);
            }

            let event = match self.scanner.peek() {
                Some(b'<') => self.read_markup()?,
                _ => self.read_text()?,
            };
            if event.is_some() {
                return Ok(event);
            }
        }
    }

    fn finish(&mut self) -> Result<XmlEvent, ParseError> {
        let position = self.scanner.position();
        match self.state {
            ReaderState::Prolog => Err(ParseError::new("Document has no root element", position)),
            ReaderState::Content => {
                let name = self.open.last().map_or("", |n| n.qualified_name.as_str());
                Err(ParseError::new(format!("Unclosed element <{}>", name), position))
            }
            _ => {
                self.state = ReaderState::Done;
                Ok(XmlEvent::EndDocument)
            }
        }
    }

    /// Text content up to the next '<'
    fn read_text(&mut self) -> Result<Option<XmlEvent>, ParseError> {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or(self.input.len());
        self.scanner.set_position(end);
        let raw = &self.input[start..end];

        if self.state != ReaderState::Content {
            if raw.bytes().all(is_whitespace) {
                return Ok(None);
            }
            return Err(ParseError::new("Content is not allowed outside the root element", start));
        }

        if let Some(offset) = raw.find(|c: char| !is_valid_xml_char(c)) {
            return Err(ParseError::new("Invalid XML character in content", start + offset));
        }
        let text = decode_text(&normalize_line_endings(raw))
            .map_err(|msg| ParseError::new(msg, start))?
            .into_owned();
        Ok(Some(XmlEvent::Characters(text)))
    }

    /// Scan markup starting with '<'
    fn read_markup(&mut self) -> Result<Option<XmlEvent>, ParseError> {
        let start = self.scanner.position();

        match self.scanner.peek_at(1) {
            Some(b'/') => self.read_end_tag(start).map(Some),
            Some(b'?') => self.skip_pi(start).map(|_| None),
            Some(b'!') => {
                self.scanner.advance(2);
                if self.scanner.starts_with(b"--") {
                    self.scanner.advance(2);
                    self.skip_past(b"-->", "Unterminated comment", start).map(|_| None)
                } else if self.scanner.starts_with(b"[CDATA[") {
                    self.read_cdata(start).map(Some)
                } else if self.scanner.starts_with(b"DOCTYPE") {
                    self.skip_doctype(start).map(|_| None)
                } else {
                    Err(ParseError::new("Invalid markup declaration", start))
                }
            }
            Some(c) if is_name_start_char(c) => self.read_start_tag(start).map(Some),
            _ => Err(ParseError::new(
                "Invalid element name: must start with letter, underscore, or colon",
                start,
            )),
        }
    }

    fn read_start_tag(&mut self, start: usize) -> Result<XmlEvent, ParseError> {
        match self.state {
            ReaderState::Epilog => return Err(ParseError::new("Multiple root elements", start)),
            _ => self.state = ReaderState::Content,
        }

        self.scanner.advance(1); // Skip '<'
        let name_start = self.scanner.position();
        self.scanner.read_name();
        let name_end = self.scanner.position();
        let name = &self.input[name_start..name_end];

        let tag_end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| ParseError::new(format!("Unterminated start tag <{}>", name), start))?;
        let is_empty = tag_end > name_end && self.input.as_bytes()[tag_end - 1] == b'/';
        let body_end = if is_empty { tag_end - 1 } else { tag_end };
        let body = &self.input[name_end..body_end];
        if !body.is_empty() && !is_whitespace(body.as_bytes()[0]) {
            return Err(ParseError::new("Invalid character in element name", name_end));
        }
        let raw_attributes = parse_attributes(body).map_err(|msg| ParseError::new(msg, name_end))?;
        self.scanner.set_position(tag_end + 1);

        self.namespaces.push_scope();
        for attr in raw_attributes.iter().filter(|a| a.is_namespace_declaration()) {
            self.namespaces
                .declare(attr.name, &attr.value)
                .map_err(|msg| ParseError::new(msg, name_end))?;
        }

        let qname = self.resolve(name, start)?;
        let mut attributes = Vec::with_capacity(raw_attributes.len());
        for attr in raw_attributes.into_iter().filter(|a| !a.is_namespace_declaration()) {
            let (prefix, _) = split_qname(attr.name);
            if !prefix.is_empty() {
                self.namespaces
                    .resolve(prefix)
                    .map_err(|msg| ParseError::new(msg, name_end))?;
            }
            attributes.push(Attribute::new(attr.name, attr.value.into_owned()));
        }

        if is_empty {
            self.namespaces.pop_scope();
            if self.open.is_empty() {
                self.state = ReaderState::Epilog;
            }
            self.pending = Some(XmlEvent::end(qname.clone()));
        } else {
            self.open.push(qname.clone());
        }

        Ok(XmlEvent::start(qname, attributes))
    }

    fn resolve(&self, name: &str, position: usize) -> Result<QName, ParseError> {
        let (prefix, local) = split_qname(name);
        if local.is_empty() || local.contains(':') || (prefix.is_empty() && name.contains(':')) {
            return Err(ParseError::new(format!("Invalid qualified name {}", name), position));
        }
        let namespace = self
            .namespaces
            .resolve(prefix)
            .map_err(|msg| ParseError::new(msg, position))?;
        Ok(QName::new(namespace, local, name))
    }

    fn read_end_tag(&mut self, start: usize) -> Result<XmlEvent, ParseError> {
        self.scanner.advance(2); // Skip '</'
        let name_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(ParseError::new("Invalid end tag", start));
        }
        let name = &self.input[name_start..self.scanner.position()];
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(ParseError::new(format!("Unterminated end tag </{}>", name), start));
        }
        self.scanner.advance(1);

        let expected = self
            .open
            .pop()
            .ok_or_else(|| ParseError::new(format!("Unexpected end tag </{}>", name), start))?;
        if expected.qualified_name != name {
            return Err(ParseError::new(
                format!("Mismatched end tag: expected </{}>, found </{}>", expected.qualified_name, name),
                start,
            ));
        }

        self.namespaces.pop_scope();
        if self.open.is_empty() {
            self.state = ReaderState::Epilog;
        }
        Ok(XmlEvent::end(expected))
    }

    fn read_cdata(&mut self, start: usize) -> Result<XmlEvent, ParseError> {
        if self.state != ReaderState::Content {
            return Err(ParseError::new("CDATA section outside the root element", start));
        }
        self.scanner.advance(7); // Skip '[CDATA['
        let content_start = self.scanner.position();
        let content_end = self.skip_past(b"]]>", "Unterminated CDATA section", start)?;
        let content = normalize_line_endings(&self.input[content_start..content_end]);
        Ok(XmlEvent::Characters(content.into_owned()))
    }

    fn skip_pi(&mut self, start: usize) -> Result<(), ParseError> {
        self.scanner.advance(2); // Skip '<?'
        let target = self
            .scanner
            .read_name()
            .ok_or_else(|| ParseError::new("Invalid processing instruction", start))?;
        if target.eq_ignore_ascii_case(b"xml") && start != 0 {
            return Err(ParseError::new(
                "XML declaration is only allowed at the start of the document",
                start,
            ));
        }
        self.skip_past(b"?>", "Unterminated processing instruction", start)?;
        Ok(())
    }

    fn skip_doctype(&mut self, start: usize) -> Result<(), ParseError> {
        if self.state != ReaderState::Prolog {
            return Err(ParseError::new("DOCTYPE is only allowed before the root element", start));
        }

        // Find end of DOCTYPE, handling internal subset
        let mut depth = 0usize;
        while let Some(c) = self.scanner.peek() {
            self.scanner.advance(1);
            match c {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(ParseError::new("Unterminated DOCTYPE", start))
    }

    /// Advance past `terminator`, returning where it began
    fn skip_past(&mut self, terminator: &[u8], message: &str, start: usize) -> Result<usize, ParseError> {
        let end = self
            .scanner
            .find_sequence(terminator)
            .ok_or_else(|| ParseError::new(message, start))?;
        self.scanner.set_position(end + terminator.len());
        Ok(end)
    }
}

impl Iterator for SliceReader<'_> {
    type Item = Result<XmlEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}
