use crate::reader::Location;

/// Settings for one document conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    source: Location,
    stylesheet: Option<String>,
    escape_html_representations: bool,
}

impl PipelineConfig {
    /// Configuration for converting `source` with the defaults: escaping on,
    /// no external stylesheet.
    pub fn new(source: impl Into<Location>) -> Self {
        PipelineConfig {
            source: source.into(),
            stylesheet: None,
            escape_html_representations: true,
        }
    }

    /// Link this stylesheet from the page head; a blank reference means none.
    pub fn with_stylesheet(mut self, stylesheet: impl Into<String>) -> Self {
        let stylesheet = stylesheet.into();
        self.stylesheet = if stylesheet.trim().is_empty() { None } else { Some(stylesheet) };
        self
    }

    pub fn with_escape_html_representations(mut self, escape: bool) -> Self {
        self.escape_html_representations = escape;
        self
    }

    pub fn source(&self) -> &Location {
        &self.source
    }

    pub fn stylesheet(&self) -> Option<&str> {
        self.stylesheet.as_deref()
    }

    pub fn escape_html_representations(&self) -> bool {
        self.escape_html_representations
    }
}
