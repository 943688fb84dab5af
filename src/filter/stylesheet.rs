//! Stylesheet Injection Filter
//!
//! Drops the tags and character data of inline `<style type="...">` blocks
//! and appends a `link` to the configured external stylesheet as the last
//! child of `head`. Elements nested in a dropped block pass through without
//! their text.

use crate::error::Result;
use crate::pipeline::StageKind;
use crate::reader::namespace::ns;
use crate::reader::{attribute_value, Attribute, QName, XmlEvent};
use crate::sax::{EventSink, Stage};

const EL_STYLE: &str = "style";
const EL_HEAD: &str = "head";
const EL_LINK: &str = "link";
const ATT_TYPE: &str = "type";

#[derive(Debug)]
pub struct StylesheetFilter {
    href: String,
    /// Open elements inside a suppressed style block, the block itself included
    suppressed: usize,
}

impl StylesheetFilter {
    pub fn new(href: impl Into<String>) -> Self {
        StylesheetFilter {
            href: href.into(),
            suppressed: 0,
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn is_suppressing(&self) -> bool {
        self.suppressed > 0
    }

    fn link_events(&self) -> [XmlEvent; 2] {
        let name = QName::local(ns::XHTML, EL_LINK);
        let attributes = vec![
            Attribute::new("rel", "stylesheet"),
            Attribute::new("type", "text/css"),
            Attribute::new("href", self.href.as_str()),
        ];
        [XmlEvent::start(name.clone(), attributes), XmlEvent::end(name)]
    }
}

fn is_inline_style(name: &QName, attributes: &[Attribute]) -> bool {
    name.local_name.eq_ignore_ascii_case(EL_STYLE) && attribute_value(attributes, ATT_TYPE).is_some()
}

impl Stage for StylesheetFilter {
    fn kind(&self) -> StageKind {
        StageKind::Stylesheet
    }

    fn process(&mut self, event: XmlEvent, next: &mut dyn EventSink) -> Result<()> {
        match event {
            XmlEvent::StartElement { .. } if self.suppressed > 0 => {
                self.suppressed += 1;
                next.push(event)
            }
            XmlEvent::StartElement { ref name, ref attributes } if is_inline_style(name, attributes) => {
                self.suppressed = 1;
                Ok(())
            }
            XmlEvent::EndElement { .. } if self.suppressed == 1 => {
                self.suppressed = 0;
                Ok(())
            }
            XmlEvent::EndElement { .. } if self.suppressed > 1 => {
                self.suppressed -= 1;
                next.push(event)
            }
            XmlEvent::Characters(_) if self.suppressed > 0 => Ok(()),
            XmlEvent::EndElement { ref name } if name.local_name.eq_ignore_ascii_case(EL_HEAD) => {
                for link in self.link_events() {
                    next.push(link)?;
                }
                next.push(event)
            }
            XmlEvent::StartDocument => {
                self.suppressed = 0;
                next.push(event)
            }
            other => next.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::slice::SliceReader;
    use crate::sax::EventCollector;

    fn read(xml: &str) -> Vec<XmlEvent> {
        SliceReader::new(xml).collect::<std::result::Result<_, _>>().unwrap()
    }

    fn run(href: &str, xml: &str) -> Vec<XmlEvent> {
        let mut filter = StylesheetFilter::new(href);
        let mut collector = EventCollector::new();
        for event in read(xml) {
            filter.process(event, &mut collector).unwrap();
        }
        assert!(!filter.is_suppressing());
        collector.into_events()
    }

    fn text_of(events: &[XmlEvent]) -> String {
        events
            .iter()
            .filter_map(|e| match e {
                XmlEvent::Characters(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn count_starts(events: &[XmlEvent], local: &str) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, XmlEvent::StartElement { name, .. } if name.local_name == local))
            .count()
    }

    #[test]
    fn test_link_is_last_child_of_head() {
        let xml = "<html xmlns=\"http://www.w3.org/1999/xhtml\"><head><title>T</title></head><body><p>x</p></body></html>";
        let input = read(xml);
        let output = run("site.css", xml);

        assert_eq!(output.len(), input.len() + 2);
        assert_eq!(count_starts(&output, "link"), 1);

        let head_end = output
            .iter()
            .position(|e| matches!(e, XmlEvent::EndElement { name } if name.local_name == "head"))
            .unwrap();
        assert_eq!(output[head_end - 1], XmlEvent::end(QName::local(ns::XHTML, "link")));
        match &output[head_end - 2] {
            XmlEvent::StartElement { name, attributes } => {
                assert!(name.is(ns::XHTML, "link"));
                assert_eq!(attribute_value(attributes, "rel"), Some("stylesheet"));
                assert_eq!(attribute_value(attributes, "type"), Some("text/css"));
                assert_eq!(attribute_value(attributes, "href"), Some("site.css"));
            }
            other => panic!("expected link start, got {other:?}"),
        }

        // Everything except the link is untouched and in order
        let without_link: Vec<_> = output
            .into_iter()
            .filter(|e| e.element_name().map_or(true, |n| n.local_name != "link"))
            .collect();
        assert_eq!(without_link, input);
    }

    #[test]
    fn test_inline_style_is_removed() {
        let xml = "<html><head><title>T</title><style type=\"text/css\">p { color: red }</style></head><body/></html>";
        let output = run("a.css", xml);
        assert_eq!(count_starts(&output, "style"), 0);
        assert!(!output.iter().any(|e| matches!(e, XmlEvent::EndElement { name } if name.local_name == "style")));
        assert_eq!(text_of(&output), "T");
    }

    #[test]
    fn test_markup_like_style_text_is_removed() {
        let xml = "<html><head><style type=\"text/css\"><![CDATA[a > b { } </style> <p>&amp;]]></style></head></html>";
        let output = run("a.css", xml);
        assert_eq!(text_of(&output), "");
    }

    #[test]
    fn test_elements_nested_in_style_lose_only_their_text() {
        let xml = "<html><head><style type=\"text/css\">a<b>c<style>d</style></b>e</style><meta/></head></html>";
        let output = run("a.css", xml);
        assert_eq!(text_of(&output), "");
        assert_eq!(count_starts(&output, "b"), 1);
        assert_eq!(count_starts(&output, "style"), 1);
        assert_eq!(count_starts(&output, "meta"), 1);

        let mut depth = 0i32;
        for event in &output {
            match event {
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0);
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn test_style_without_type_is_kept() {
        let xml = "<html><head><style>p {}</style></head></html>";
        let output = run("a.css", xml);
        assert_eq!(count_starts(&output, "style"), 1);
        assert_eq!(text_of(&output), "p {}");
    }

    #[test]
    fn test_matching_ignores_case() {
        let xml = "<HTML><HEAD><STYLE type=\"text/css\">x</STYLE></HEAD></HTML>";
        let output = run("a.css", xml);
        assert_eq!(count_starts(&output, "STYLE"), 0);
        assert_eq!(count_starts(&output, "link"), 1);
    }

    #[test]
    fn test_no_head_means_no_link() {
        let output = run("a.css", "<html><body>x</body></html>");
        assert_eq!(count_starts(&output, "link"), 0);
    }
}
