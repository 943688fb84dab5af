//! Streaming rule interpreter
//!
//! Each WADL element is looked up in the rule set when its start tag
//! arrives; whatever the rule emits is remembered on a frame stack and
//! closed again at the matching end tag. Elements outside the WADL namespace
//! (documentation markup) are copied through.
//!
//! The page head needs the application title, which lives on the first
//! `doc` child of `application`. Emitting the head is therefore deferred
//! until the first child start tag (or the end of `application`).

use super::rules::{Action, Context, Heading, Part, DEFAULT_CSS};
use super::RuleSet;
use crate::error::Result;
use crate::filter::is_html_representation;
use crate::pipeline::StageKind;
use crate::reader::namespace::ns;
use crate::reader::{attribute_value, Attribute, QName, XmlEvent};
use crate::sax::{EventSink, Stage};

/// What to emit when an open element ends
#[derive(Debug)]
enum Close {
    Element(QName),
    Document,
    Nothing,
}

#[derive(Debug)]
struct Frame {
    close: Close,
    /// Local name when the element is in the WADL namespace
    wadl: Option<String>,
    /// Whether character data directly inside is kept
    text: bool,
    html_representation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Head {
    NotStarted,
    Pending,
    Written,
}

#[derive(Debug)]
pub struct TransformStage {
    rule_set: RuleSet,
    frames: Vec<Frame>,
    /// Depth inside a skipped subtree
    skipped: usize,
    head: Head,
}

fn html(local: &str) -> QName {
    QName::local(ns::XHTML, local)
}

fn emit_text_element(next: &mut dyn EventSink, tag: &str, attributes: Vec<Attribute>, text: &str) -> Result<()> {
    next.push(XmlEvent::start(html(tag), attributes))?;
    if !text.is_empty() {
        next.push(XmlEvent::text(text))?;
    }
    next.push(XmlEvent::end(html(tag)))
}

/// Render heading parts against the element's attributes
fn heading_text(heading: &Heading, attributes: &[Attribute]) -> String {
    let mut text = String::new();
    for part in heading.parts {
        match *part {
            Part::Text(literal) => text.push_str(literal),
            Part::Attr { prefix, name, suffix } => {
                if let Some(value) = attribute_value(attributes, name).filter(|v| !v.is_empty()) {
                    text.push_str(prefix);
                    text.push_str(value);
                    text.push_str(suffix);
                }
            }
        }
    }
    text
}

impl TransformStage {
    pub fn new(rule_set: RuleSet) -> Self {
        TransformStage {
            rule_set,
            frames: Vec::with_capacity(16),
            skipped: 0,
            head: Head::NotStarted,
        }
    }

    pub fn rule_set(&self) -> RuleSet {
        self.rule_set
    }

    /// Nearest open WADL element
    fn parent(&self) -> Option<Context<'_>> {
        self.frames.iter().rev().find_map(|f| {
            f.wadl.as_deref().map(|element| Context {
                element,
                html_representation: f.html_representation,
            })
        })
    }

    fn keeps_text(&self) -> bool {
        self.skipped == 0 && self.frames.last().is_some_and(|f| f.text)
    }

    fn write_head(&mut self, title: &str, next: &mut dyn EventSink) -> Result<()> {
        self.head = Head::Written;
        next.push(XmlEvent::start(html("head"), vec![]))?;
        emit_text_element(next, "title", vec![], title)?;
        emit_text_element(next, "style", vec![Attribute::new("type", "text/css")], DEFAULT_CSS)?;
        next.push(XmlEvent::end(html("head")))?;
        next.push(XmlEvent::start(html("body"), vec![]))?;
        if !title.is_empty() {
            emit_text_element(next, "h1", vec![], title)?;
        }
        Ok(())
    }

    fn start(&mut self, name: QName, attributes: Vec<Attribute>, next: &mut dyn EventSink) -> Result<()> {
        if self.skipped > 0 {
            self.skipped += 1;
            return Ok(());
        }

        if self.head == Head::Pending {
            let title = if name.is(ns::WADL, "doc") {
                attribute_value(&attributes, "title").unwrap_or_default()
            } else {
                ""
            };
            self.write_head(title, next)?;
        }

        if name.namespace.as_deref() != Some(ns::WADL) {
            next.push(XmlEvent::start(name.clone(), attributes))?;
            self.frames.push(Frame {
                close: Close::Element(name),
                wadl: None,
                text: true,
                html_representation: false,
            });
            return Ok(());
        }

        let action = self
            .rule_set
            .lookup(&name.local_name, self.parent())
            .map(|rule| rule.action);
        let html_representation = is_html_representation(&name, &attributes);
        let wadl = Some(name.local_name);

        match action {
            Some(Action::Document) => {
                next.push(XmlEvent::start(html("html"), vec![]))?;
                self.head = Head::Pending;
                self.frames.push(Frame {
                    close: Close::Document,
                    wadl,
                    text: false,
                    html_representation,
                });
            }
            Some(Action::Wrap(wrapper)) => {
                let tag = html(wrapper.tag);
                next.push(XmlEvent::start(tag.clone(), vec![Attribute::new("class", wrapper.class)]))?;
                if let Some(heading) = &wrapper.heading {
                    let text = heading_text(heading, &attributes);
                    if !text.is_empty() {
                        emit_text_element(next, heading.tag, vec![], &text)?;
                    }
                }
                self.frames.push(Frame {
                    close: Close::Element(tag),
                    wadl,
                    text: wrapper.text,
                    html_representation,
                });
            }
            Some(Action::Skip) => self.skipped = 1,
            None => {
                // Unknown WADL element: drop the tags, keep the content
                let text = self.keeps_text();
                self.frames.push(Frame {
                    close: Close::Nothing,
                    wadl,
                    text,
                    html_representation,
                });
            }
        }
        Ok(())
    }

    fn end(&mut self, next: &mut dyn EventSink) -> Result<()> {
        if self.skipped > 0 {
            self.skipped -= 1;
            return Ok(());
        }
        let Some(frame) = self.frames.pop() else {
            return Ok(());
        };
        match frame.close {
            Close::Element(name) => next.push(XmlEvent::end(name)),
            Close::Nothing => Ok(()),
            Close::Document => {
                if self.head == Head::Pending {
                    self.write_head("", next)?;
                }
                next.push(XmlEvent::end(html("body")))?;
                next.push(XmlEvent::end(html("html")))
            }
        }
    }
}

impl Stage for TransformStage {
    fn kind(&self) -> StageKind {
        StageKind::Transform(self.rule_set)
    }

    fn process(&mut self, event: XmlEvent, next: &mut dyn EventSink) -> Result<()> {
        match event {
            XmlEvent::StartDocument => {
                self.frames.clear();
                self.skipped = 0;
                self.head = Head::NotStarted;
                next.push(XmlEvent::StartDocument)
            }
            XmlEvent::StartElement { name, attributes } => self.start(name, attributes, next),
            XmlEvent::EndElement { .. } => self.end(next),
            XmlEvent::Characters(text) => {
                if self.keeps_text() {
                    next.push(XmlEvent::Characters(text))
                } else {
                    Ok(())
                }
            }
            XmlEvent::EndDocument => next.push(XmlEvent::EndDocument),
        }
    }
}
