//! Output serialization

pub mod html;

pub use html::HtmlSerializer;
