//! XML Reader Module
//!
//! - Events: the event data model shared by all stages
//! - Namespace: prefix to URI resolution
//! - SliceReader: strict pull reader over an in-memory document
//! - Source: locations and the Event Source stage

pub mod events;
pub mod namespace;
pub mod slice;
pub mod source;

pub use events::{attribute_value, Attribute, QName, XmlEvent};
pub use source::{EventSource, Location};
