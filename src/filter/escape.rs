//! Escaping Filter
//!
//! HTML written inside a WADL `doc` that documents a `text/html`
//! representation is example markup, not structure. This stage turns the
//! tags of such markup into literal text so the transform shows them instead
//! of interpreting them.
//!
//! Region entry and exit follow the boundary elements (`doc` and
//! `representation` in the WADL namespace) with no reference counting: the
//! last boundary seen of each kind wins. Separately, every open element
//! remembers whether its start tag was escaped, and its end tag is treated
//! the same way, so the output stays balanced however the boundaries nest.

use crate::error::Result;
use crate::pipeline::StageKind;
use crate::reader::namespace::ns;
use crate::reader::{attribute_value, Attribute, QName, XmlEvent};
use crate::sax::{EventSink, Stage};
use std::fmt::Write;

const EL_DOC: &str = "doc";
const EL_REPRESENTATION: &str = "representation";
const ATT_MEDIA_TYPE: &str = "mediaType";
/// Prefix match on purpose: `text/html+custom` counts as HTML too
const MEDIA_TYPE_HTML: &str = "text/html";

/// A WADL `representation` documenting HTML content
pub fn is_html_representation(name: &QName, attributes: &[Attribute]) -> bool {
    name.is(ns::WADL, EL_REPRESENTATION)
        && attribute_value(attributes, ATT_MEDIA_TYPE).is_some_and(|t| t.starts_with(MEDIA_TYPE_HTML))
}

/// Which escaping-relevant regions the current position is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Outside,
    InDoc,
    InHtmlRepresentation,
    InDocAndHtmlRepresentation,
}

impl Region {
    fn from_flags(in_doc: bool, in_html_representation: bool) -> Self {
        match (in_doc, in_html_representation) {
            (false, false) => Region::Outside,
            (true, false) => Region::InDoc,
            (false, true) => Region::InHtmlRepresentation,
            (true, true) => Region::InDocAndHtmlRepresentation,
        }
    }

    pub fn in_doc(self) -> bool {
        matches!(self, Region::InDoc | Region::InDocAndHtmlRepresentation)
    }

    pub fn in_html_representation(self) -> bool {
        matches!(self, Region::InHtmlRepresentation | Region::InDocAndHtmlRepresentation)
    }

    /// Descendant markup is escaped only while both regions are open
    pub fn escapes(self) -> bool {
        self == Region::InDocAndHtmlRepresentation
    }

    pub fn enter_doc(self) -> Self {
        Region::from_flags(true, self.in_html_representation())
    }

    pub fn leave_doc(self) -> Self {
        Region::from_flags(false, self.in_html_representation())
    }

    pub fn enter_html_representation(self) -> Self {
        Region::from_flags(self.in_doc(), true)
    }

    pub fn leave_html_representation(self) -> Self {
        Region::from_flags(self.in_doc(), false)
    }

    /// Region after a start tag has been handled
    fn after_start(self, name: &QName, attributes: &[Attribute]) -> Self {
        if name.is(ns::WADL, EL_DOC) {
            self.enter_doc()
        } else if is_html_representation(name, attributes) {
            self.enter_html_representation()
        } else {
            self
        }
    }

    /// Region after an end tag has been seen
    fn after_end(self, name: &QName) -> Self {
        if name.is(ns::WADL, EL_DOC) {
            self.leave_doc()
        } else if name.is(ns::WADL, EL_REPRESENTATION) && self.in_html_representation() {
            self.leave_html_representation()
        } else {
            self
        }
    }
}

/// Stage that escapes markup inside HTML representation documentation
#[derive(Debug, Default)]
pub struct EscapingFilter {
    region: Region,
    /// Open elements, innermost last: whether each start tag was escaped
    escaped: Vec<bool>,
}

impl EscapingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

impl Stage for EscapingFilter {
    fn kind(&self) -> StageKind {
        StageKind::Escaping
    }

    fn process(&mut self, event: XmlEvent, next: &mut dyn EventSink) -> Result<()> {
        match event {
            XmlEvent::StartElement { name, attributes } => {
                // Boundary checks use the region as it was before this tag
                let escape = self.region.escapes();
                self.escaped.push(escape);
                self.region = self.region.after_start(&name, &attributes);

                if escape {
                    next.push(XmlEvent::Characters(start_tag_text(&name, &attributes)))
                } else {
                    next.push(XmlEvent::StartElement { name, attributes })
                }
            }
            XmlEvent::EndElement { name } => {
                self.region = self.region.after_end(&name);

                if self.escaped.pop().unwrap_or(false) {
                    next.push(XmlEvent::Characters(format!("</{}>", name.qualified_name)))
                } else {
                    next.push(XmlEvent::EndElement { name })
                }
            }
            XmlEvent::StartDocument => {
                self.region = Region::Outside;
                self.escaped.clear();
                next.push(XmlEvent::StartDocument)
            }
            other => next.push(other),
        }
    }
}

/// `<name a="1" b="2">`, attribute values verbatim and in source order
fn start_tag_text(name: &QName, attributes: &[Attribute]) -> String {
    let mut text = String::with_capacity(name.qualified_name.len() + 2 + attributes.len() * 16);
    text.push('<');
    text.push_str(&name.qualified_name);
    for attr in attributes {
        let _ = write!(text, " {}=\"{}\"", attr.name, attr.value);
    }
    text.push('>');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::slice::SliceReader;
    use crate::sax::EventCollector;

    fn wadl(body: &str) -> String {
        format!("<application xmlns=\"{}\">{}</application>", ns::WADL, body)
    }

    fn read(xml: &str) -> Vec<XmlEvent> {
        SliceReader::new(xml).collect::<std::result::Result<_, _>>().unwrap()
    }

    fn run(xml: &str) -> Vec<XmlEvent> {
        let mut filter = EscapingFilter::new();
        let mut collector = EventCollector::new();
        for event in read(xml) {
            filter.process(event, &mut collector).unwrap();
        }
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

    fn structural_names(events: &[XmlEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                XmlEvent::StartElement { name, .. } => Some(format!("+{}", name.local_name)),
                XmlEvent::EndElement { name } => Some(format!("-{}", name.local_name)),
                _ => None,
            })
            .collect()
    }

    /// Every structural end matches the innermost open structural start
    fn assert_balanced(events: &[XmlEvent]) {
        let mut open = Vec::new();
        for event in events {
            match event {
                XmlEvent::StartElement { name, .. } => open.push(name.clone()),
                XmlEvent::EndElement { name } => assert_eq!(open.pop().as_ref(), Some(name)),
                _ => {}
            }
        }
        assert!(open.is_empty(), "unclosed elements: {open:?}");
    }

    #[test]
    fn test_region_transitions() {
        let region = Region::Outside.enter_doc();
        assert_eq!(region, Region::InDoc);
        let region = region.enter_html_representation();
        assert!(region.escapes());
        assert_eq!(region.leave_doc(), Region::InHtmlRepresentation);
        assert_eq!(region.leave_doc().leave_html_representation(), Region::Outside);
        assert_eq!(Region::InDoc.enter_doc(), Region::InDoc);
    }

    #[test]
    fn test_html_fragment_becomes_literal_text() {
        let xml = wadl(
            "<representation mediaType=\"text/html\"><doc><p class=\"x\" id=\"y\">Hi <b>you</b></p></doc></representation>",
        );
        let events = run(&xml);

        assert_eq!(text_of(&events), "<p class=\"x\" id=\"y\">Hi <b>you</b></p>");
        assert_eq!(
            structural_names(&events),
            vec!["+application", "+representation", "+doc", "-doc", "-representation", "-application"]
        );
        assert_balanced(&events);
    }

    #[test]
    fn test_representation_inside_doc_also_escapes() {
        let xml = wadl("<doc><representation mediaType=\"text/html\"><em>x</em></representation></doc>");
        let events = run(&xml);
        assert_eq!(text_of(&events), "<em>x</em>");
        assert_balanced(&events);
    }

    #[test]
    fn test_foreign_namespace_markup_keeps_its_prefix() {
        let xml = wadl(
            "<representation mediaType=\"text/html\"><doc><h:p xmlns:h=\"http://www.w3.org/1999/xhtml\" h:lang=\"en\">t</h:p></doc></representation>",
        );
        assert_eq!(text_of(&run(&xml)), "<h:p h:lang=\"en\">t</h:p>");
    }

    #[test]
    fn test_attribute_values_are_verbatim() {
        let xml = wadl(
            "<representation mediaType=\"text/html\"><doc><a href=\"?a=1&amp;b=2\" title=\"&lt;x&gt;\"/></doc></representation>",
        );
        assert_eq!(text_of(&run(&xml)), "<a href=\"?a=1&b=2\" title=\"<x>\"></a>");
    }

    #[test]
    fn test_plain_text_representation_is_not_escaped() {
        let xml = wadl("<doc><representation mediaType=\"text/plain\"><p>x</p></representation></doc>");
        let events = run(&xml);
        assert_eq!(text_of(&events), "x");
        assert!(structural_names(&events).contains(&"+p".to_string()));
    }

    #[test]
    fn test_missing_media_type_is_not_escaped() {
        let xml = wadl("<representation><doc><p>x</p></doc></representation>");
        assert_eq!(text_of(&run(&xml)), "x");
    }

    #[test]
    fn test_media_type_prefix_match() {
        let xml = wadl("<representation mediaType=\"text/html+custom\"><doc><p>x</p></doc></representation>");
        assert_eq!(text_of(&run(&xml)), "<p>x</p>");

        let xml = wadl("<representation mediaType=\"TEXT/HTML\"><doc><p>x</p></doc></representation>");
        assert_eq!(text_of(&run(&xml)), "x");
    }

    #[test]
    fn test_boundary_names_in_other_namespaces_are_ignored() {
        let xml = "<a xmlns:o=\"urn:other\"><o:doc><o:representation mediaType=\"text/html\"><p>x</p></o:representation></o:doc></a>";
        assert_eq!(run(xml), read(xml));
    }

    #[test]
    fn test_pass_through_without_boundaries() {
        let xml = wadl("<resources base=\"http://x/\"><resource path=\"a\"><method name=\"GET\"/></resource></resources>");
        assert_eq!(run(&xml), read(&xml));
    }

    #[test]
    fn test_text_outside_region_is_untouched() {
        let xml = wadl("<doc>Plain <i>docs</i></doc>");
        let events = run(&xml);
        assert_eq!(text_of(&events), "Plain docs");
        assert!(structural_names(&events).contains(&"+i".to_string()));
    }

    #[test]
    fn test_nested_doc_inside_region_stays_balanced() {
        // The inner doc is escaped on the way in, so it is escaped on the way
        // out even though it resets the doc region
        let xml = wadl(
            "<representation mediaType=\"text/html\"><doc><div><doc>inner</doc><span>after</span></div></doc></representation>",
        );
        let events = run(&xml);
        assert_balanced(&events);
        assert_eq!(
            structural_names(&events),
            vec!["+application", "+representation", "+doc", "+span", "-span", "-doc", "-representation", "-application"]
        );
        assert_eq!(text_of(&events), "<div><doc>inner</doc>after</div>");
    }

    #[test]
    fn test_deeply_nested_boundaries() {
        let mut body = String::new();
        for _ in 0..50 {
            body.push_str("<doc><representation mediaType=\"text/html\">");
        }
        body.push_str("<p>deep</p>");
        for _ in 0..50 {
            body.push_str("</representation></doc>");
        }
        let events = run(&wadl(&body));
        assert_balanced(&events);
        assert!(text_of(&events).contains("<p>deep</p>"));
        // Only the outermost pair of boundaries stays structural
        assert_eq!(structural_names(&events).len(), 6);
    }

    #[test]
    fn test_state_resets_on_new_document() {
        let mut filter = EscapingFilter::new();
        let mut collector = EventCollector::new();
        let xml = wadl("<representation mediaType=\"text/html\"><doc><p>x</p></doc></representation>");
        for event in read(&xml).into_iter().take(5) {
            filter.process(event, &mut collector).unwrap();
        }
        assert!(filter.region().escapes());

        filter.process(XmlEvent::StartDocument, &mut collector).unwrap();
        assert_eq!(filter.region(), Region::Outside);
    }
}
