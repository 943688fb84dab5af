//! HTML Serializer
//!
//! Writes the final event stream as HTML text. Void elements get no end tag
//! and nothing is self-closed; `script` and `style` content is written raw,
//! so it may not contain the end tag of either.

use crate::core::entities::{escape_attribute, escape_text, is_valid_xml_char};
use crate::error::{PipelineError, Result, SerializationError};
use crate::pipeline::StageKind;
use crate::reader::namespace::ns;
use crate::reader::{Attribute, QName, XmlEvent};
use crate::sax::EventSink;
use memchr::memmem;
use std::io::{self, Write};

/// HTML elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_html(name: &QName) -> bool {
    name.namespace.as_deref().map_or(true, |uri| uri == ns::XHTML)
}

fn is_one_of(name: &QName, list: &[&str]) -> bool {
    is_html(name) && list.iter().any(|n| name.local_name.eq_ignore_ascii_case(n))
}

/// HTML and un-namespaced elements are written by local name, others as found
fn output_name(name: &QName) -> &str {
    if is_html(name) {
        &name.local_name
    } else {
        &name.qualified_name
    }
}

fn io_error(err: io::Error) -> PipelineError {
    PipelineError::new(StageKind::Serializer, SerializationError::Io(err))
}

fn check_encodable(text: &str) -> Result<()> {
    match text.chars().find(|c| !is_valid_xml_char(*c)) {
        Some(c) => Err(PipelineError::new(
            StageKind::Serializer,
            SerializationError::Unencodable { code: c as u32 },
        )),
        None => Ok(()),
    }
}

/// Reject raw text holding `</script` or `</style`, which a browser reads as an end tag
fn check_raw_text(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    for at in memmem::find_iter(bytes, b"</") {
        let tail = &bytes[at + 2..];
        let closes = RAW_TEXT_ELEMENTS.iter().copied().find(|element| {
            tail.len() >= element.len() && tail[..element.len()].eq_ignore_ascii_case(element.as_bytes())
        });
        if let Some(element) = closes {
            return Err(PipelineError::new(
                StageKind::Serializer,
                SerializationError::RawTextEnd { element },
            ));
        }
    }
    Ok(())
}

/// Event sink rendering HTML to a writer
#[derive(Debug)]
pub struct HtmlSerializer<W: Write> {
    out: W,
    /// Open script/style elements
    raw_text: usize,
}

impl<W: Write> HtmlSerializer<W> {
    pub fn new(out: W) -> Self {
        HtmlSerializer { out, raw_text: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, s: &str) -> Result<()> {
        self.out.write_all(s.as_bytes()).map_err(io_error)
    }

    fn start_tag(&mut self, name: &QName, attributes: &[Attribute]) -> Result<()> {
        self.write("<")?;
        self.write(output_name(name))?;
        for attr in attributes {
            check_encodable(&attr.value)?;
            self.write(" ")?;
            self.write(&attr.name)?;
            self.write("=\"")?;
            self.write(&escape_attribute(&attr.value))?;
            self.write("\"")?;
        }
        self.write(">")?;
        if is_one_of(name, RAW_TEXT_ELEMENTS) {
            self.raw_text += 1;
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &QName) -> Result<()> {
        if is_one_of(name, VOID_ELEMENTS) {
            return Ok(());
        }
        if is_one_of(name, RAW_TEXT_ELEMENTS) {
            self.raw_text = self.raw_text.saturating_sub(1);
        }
        self.write("</")?;
        self.write(output_name(name))?;
        self.write(">")
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        check_encodable(text)?;
        if self.raw_text > 0 {
            check_raw_text(text)?;
            self.write(text)
        } else {
            self.write(&escape_text(text))
        }
    }
}

impl<W: Write> EventSink for HtmlSerializer<W> {
    fn push(&mut self, event: XmlEvent) -> Result<()> {
        match event {
            XmlEvent::StartDocument => {
                self.raw_text = 0;
                Ok(())
            }
            XmlEvent::StartElement { name, attributes } => self.start_tag(&name, &attributes),
            XmlEvent::Characters(text) => self.characters(&text),
            XmlEvent::EndElement { name } => self.end_tag(&name),
            XmlEvent::EndDocument => self.out.flush().map_err(io_error),
        }
    }
}
