//! wadldoc - Streaming WADL to HTML documentation
//!
//! Stages:
//! Source: strict namespace-aware reader producing XML events
//! Escaping: HTML representation docs become literal text (optional)
//! Transform: WADL rule set rewrite into an HTML page
//! Stylesheet: inline styles swapped for an external stylesheet (optional)
//! Serializer: HTML text output
//!
//! ```no_run
//! use wadldoc::{PipelineConfig, Wadl2HtmlPipeline};
//!
//! let config = PipelineConfig::new(std::path::Path::new("api.wadl")).with_stylesheet("site.css");
//! let out = std::fs::File::create("api.html")?;
//! Wadl2HtmlPipeline::new(config).execute(std::io::BufWriter::new(out))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod sax;
pub mod serializer;
pub mod transform;

pub use error::{Error, PipelineError, ReportError, SerializationError};
pub use pipeline::{PipelineConfig, StageKind, Wadl2HtmlPipeline};
pub use reader::{EventSource, Location, XmlEvent};
pub use transform::{RuleSet, TransformProvider};
