//! Event Collector
//!
//! Sink that gathers every event it receives, in order.

use super::EventSink;
use crate::error::Result;
use crate::reader::XmlEvent;

/// Collector that gathers events pushed through a chain
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<XmlEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(256),
        }
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[XmlEvent] {
        &self.events
    }

    /// Take the collected events
    pub fn into_events(self) -> Vec<XmlEvent> {
        self.events
    }

    /// Concatenated text of all collected Characters events
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match e {
                XmlEvent::Characters(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for EventCollector {
    fn push(&mut self, event: XmlEvent) -> Result<()> {
        self.events.push(event);
        Ok(())
    }
}
