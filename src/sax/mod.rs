//! SAX-style push interface between pipeline stages
//!
//! ## Architecture
//!
//! ```text
//! EventSource --> Stage --> Stage --> ... --> EventSink (serializer)
//! ```
//!
//! Every stage consumes one event at a time and forwards zero or more events
//! to the next sink before the next event is pulled from the source. Stages
//! run on the calling thread; nothing is buffered beyond a stage's own
//! region-tracking state.

pub mod collector;

pub use collector::EventCollector;

use crate::error::Result;
use crate::pipeline::StageKind;
use crate::reader::XmlEvent;

/// The end of a chain: consumes one event
pub trait EventSink {
    fn push(&mut self, event: XmlEvent) -> Result<()>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn push(&mut self, event: XmlEvent) -> Result<()> {
        (**self).push(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn push(&mut self, event: XmlEvent) -> Result<()> {
        (**self).push(event)
    }
}

/// A filter in the chain: consumes one event, forwards zero or more to `next`
pub trait Stage {
    /// Which stage this is, for assembly introspection and error reports
    fn kind(&self) -> StageKind;

    fn process(&mut self, event: XmlEvent, next: &mut dyn EventSink) -> Result<()>;
}

/// A stage wired to the sink that receives its output
pub struct Link<'s> {
    stage: Box<dyn Stage>,
    next: Box<dyn EventSink + 's>,
}

impl<'s> Link<'s> {
    pub fn new(stage: Box<dyn Stage>, next: Box<dyn EventSink + 's>) -> Self {
        Link { stage, next }
    }
}

impl EventSink for Link<'_> {
    fn push(&mut self, event: XmlEvent) -> Result<()> {
        self.stage.process(event, self.next.as_mut())
    }
}

/// Wire `stages` in order in front of `sink`
pub fn chain<'s>(stages: Vec<Box<dyn Stage>>, sink: Box<dyn EventSink + 's>) -> Box<dyn EventSink + 's> {
    stages
        .into_iter()
        .rev()
        .fold(sink, |next, stage| Box::new(Link::new(stage, next)) as Box<dyn EventSink + 's>)
}
