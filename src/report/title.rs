//! Title lookup for the index page
//!
//! Evaluates `/w:application/w:doc/@title` (`w` bound to the WADL namespace)
//! by streaming over the document and stopping at the first hit.

use crate::error::Error;
use crate::reader::namespace::ns;
use crate::reader::{attribute_value, EventSource, Location, XmlEvent};

/// The query this module answers, for log output
pub const TITLE_QUERY: &str = "/w:application/w:doc/@title";

/// Title declared by the document, or `""` when there is none
pub fn extract_title(location: &Location) -> Result<String, Error> {
    let source = EventSource::open(location)?;
    let title = title_of(&source)?;
    log::debug!("{} {} = {:?}", location, TITLE_QUERY, title);
    Ok(title)
}

/// Title lookup over an already opened source
pub fn title_of(source: &EventSource) -> Result<String, Error> {
    let mut depth = 0usize;
    for event in source.events() {
        match event? {
            XmlEvent::StartElement { name, attributes } => {
                depth += 1;
                match depth {
                    1 if !name.is(ns::WADL, "application") => break,
                    2 if name.is(ns::WADL, "doc") => {
                        if let Some(title) = attribute_value(&attributes, "title") {
                            return Ok(title.to_owned());
                        }
                    }
                    _ => {}
                }
            }
            XmlEvent::EndElement { .. } => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn title(xml: &str) -> String {
        title_of(&EventSource::from_text(Location::Path(PathBuf::from("t.wadl")), xml)).unwrap()
    }

    #[test]
    fn test_application_doc_title() {
        assert_eq!(
            title("<application xmlns=\"http://research.sun.com/wadl/2006/10\"><doc title=\"Orders API\"/></application>"),
            "Orders API"
        );
    }

    #[test]
    fn test_prefix_does_not_matter() {
        assert_eq!(
            title("<w:application xmlns:w=\"http://research.sun.com/wadl/2006/10\"><w:doc title=\"T\"/></w:application>"),
            "T"
        );
    }

    #[test]
    fn test_first_doc_with_a_title_wins() {
        let xml = "<application xmlns=\"http://research.sun.com/wadl/2006/10\">\
            <doc>untitled</doc><doc title=\"Second\"/><doc title=\"Third\"/></application>";
        assert_eq!(title(xml), "Second");
    }

    #[test]
    fn test_missing_title_is_empty() {
        assert_eq!(title("<application xmlns=\"http://research.sun.com/wadl/2006/10\"/>"), "");
        // Nested docs are not application docs
        assert_eq!(
            title("<application xmlns=\"http://research.sun.com/wadl/2006/10\"><resources><doc title=\"x\"/></resources></application>"),
            ""
        );
        // Wrong namespace
        assert_eq!(title("<application><doc title=\"x\"/></application>"), "");
    }

    #[test]
    fn test_reads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.wadl");
        fs::write(
            &path,
            "<application xmlns=\"http://research.sun.com/wadl/2006/10\"><doc title=\"Orders API\"/></application>",
        )
        .unwrap();
        assert_eq!(extract_title(&Location::from(path)).unwrap(), "Orders API");
    }

    #[test]
    fn test_malformed_before_title() {
        let source = EventSource::from_text(Location::Path(PathBuf::from("t.wadl")), "<application xmlns=\"http://research.sun.com/wadl/2006/10\"><resources></application>");
        assert!(matches!(title_of(&source), Err(Error::MalformedInput { .. })));
    }
}
