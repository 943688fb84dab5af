//! Error taxonomy shared by every pipeline stage.

use crate::pipeline::StageKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A failure inside one stage of a document conversion.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open {location}: {source}")]
    SourceUnavailable {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot open {location}: only filesystem paths, file: and http(s) URLs are supported")]
    UnsupportedLocation { location: String },

    #[error("{location}:{line}:{column}: {message}")]
    MalformedInput {
        location: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl Error {
    /// True for both flavours of "the input could not be opened".
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Error::SourceUnavailable { .. } | Error::UnsupportedLocation { .. })
    }
}

/// Output side failures: a broken sink or a character HTML cannot carry.
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),

    #[error("character U+{code:04X} cannot be encoded in HTML output")]
    Unencodable { code: u32 },

    #[error("raw text would close its element early with \"</{element}\"")]
    RawTextEnd { element: &'static str },
}

/// The first stage failure of a pipeline run, tagged with the stage it came from.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: StageKind,
    #[source]
    pub source: Error,
}

impl PipelineError {
    pub fn new(stage: StageKind, source: impl Into<Error>) -> Self {
        PipelineError {
            stage,
            source: source.into(),
        }
    }

    /// The wrapped stage failure
    pub fn cause(&self) -> &Error {
        &self.source
    }

    /// Serialization failures point at a systemic output problem; a batch
    /// should stop rather than carry on with sibling documents.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self.source, Error::Serialization(_))
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Failures of a whole documentation run.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stylesheet {} does not exist", .path.display())]
    MissingStylesheet { path: PathBuf },

    #[error("invalid page template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("cannot render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("cannot convert {}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: PipelineError,
    },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    /// See [`PipelineError::is_batch_fatal`]
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, ReportError::Document { source, .. } if source.is_batch_fatal())
    }
}
