//! Stateful filter stages
//!
//! - EscapingFilter: turns HTML example markup inside representation docs into text
//! - StylesheetFilter: swaps inline style blocks for an external stylesheet link

pub mod escape;
pub mod stylesheet;

pub use escape::{is_html_representation, EscapingFilter, Region};
pub use stylesheet::StylesheetFilter;
