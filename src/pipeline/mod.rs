//! Pipeline Orchestrator
//!
//! ## Stage order
//!
//! ```text
//! Source -> [Escaping] -> Transform -> [Stylesheet] -> Serializer
//! ```
//!
//! The optional stages are left out at assembly time: escaping when
//! `escape_html_representations` is off, the stylesheet filter when no
//! stylesheet is configured. The transform's rule set follows the same
//! escaping flag.

pub mod config;

pub use config::PipelineConfig;

use crate::error::{PipelineError, Result};
use crate::filter::{EscapingFilter, StylesheetFilter};
use crate::reader::EventSource;
use crate::sax::{chain, EventSink, Stage};
use crate::serializer::HtmlSerializer;
use crate::transform::{BuiltinTransform, RuleSet, TransformProvider};
use std::fmt;
use std::io::Write;

/// Identifies a stage in assembly listings and error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Source,
    Escaping,
    Transform(RuleSet),
    Stylesheet,
    Serializer,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Source => f.write_str("source"),
            StageKind::Escaping => f.write_str("escaping"),
            StageKind::Transform(rule_set) => write!(f, "transform ({rule_set})"),
            StageKind::Stylesheet => f.write_str("stylesheet"),
            StageKind::Serializer => f.write_str("serializer"),
        }
    }
}

/// Converts one WADL document to HTML.
///
/// A pipeline runs once: [`execute`](Self::execute) consumes it.
pub struct Wadl2HtmlPipeline {
    config: PipelineConfig,
    transform: Box<dyn TransformProvider>,
}

impl fmt::Debug for Wadl2HtmlPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wadl2HtmlPipeline")
            .field("config", &self.config)
            .field("stages", &self.stages())
            .finish()
    }
}

impl Wadl2HtmlPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Wadl2HtmlPipeline {
            config,
            transform: Box::new(BuiltinTransform),
        }
    }

    /// Use another engine for the transform stage
    pub fn with_transform(mut self, provider: impl TransformProvider + 'static) -> Self {
        self.transform = Box::new(provider);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn rule_set(&self) -> RuleSet {
        RuleSet::for_escaping(self.config.escape_html_representations())
    }

    /// Every stage this pipeline will run, source and serializer included
    pub fn stages(&self) -> Vec<StageKind> {
        let mut stages = vec![StageKind::Source];
        if self.config.escape_html_representations() {
            stages.push(StageKind::Escaping);
        }
        stages.push(StageKind::Transform(self.rule_set()));
        if self.config.stylesheet().is_some() {
            stages.push(StageKind::Stylesheet);
        }
        stages.push(StageKind::Serializer);
        stages
    }

    /// The filter stages between source and serializer
    fn assemble(&self) -> Vec<Box<dyn Stage>> {
        let mut stages: Vec<Box<dyn Stage>> = Vec::with_capacity(3);
        if self.config.escape_html_representations() {
            stages.push(Box::new(EscapingFilter::new()));
        }
        stages.push(self.transform.stage(self.rule_set()));
        if let Some(stylesheet) = self.config.stylesheet() {
            stages.push(Box::new(StylesheetFilter::new(stylesheet)));
        }
        stages
    }

    /// Run the conversion, writing HTML to `out`.
    ///
    /// Stops at the first stage failure; whatever was written to `out` up to
    /// that point is left as is.
    pub fn execute<W: Write>(self, out: W) -> Result<()> {
        let source = EventSource::open(self.config.source()).map_err(|e| PipelineError::new(StageKind::Source, e))?;

        log::debug!(
            "Converting {} through {:?}",
            source.location(),
            self.stages()
        );

        let mut sink = chain(self.assemble(), Box::new(HtmlSerializer::new(out)));
        for event in source.events() {
            let event = event.map_err(|e| PipelineError::new(StageKind::Source, e))?;
            sink.push(event)?;
        }
        Ok(())
    }
}
