//! Index and frameset pages

use crate::error::ReportError;
use handlebars::Handlebars;
use serde::Serialize;

const RESOURCES_TEMPLATE: &str = include_str!("../../templates/resources.html.hbs");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html.hbs");

pub const RESOURCES_PAGE: &str = "resources.html";
pub const INDEX_PAGE: &str = "index.html";

/// One converted document as listed on the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlDocument {
    pub title: String,
    /// Output file name, relative to the output directory
    pub file_name: String,
}

impl HtmlDocument {
    pub fn new(title: impl Into<String>, file_name: impl Into<String>) -> Self {
        HtmlDocument {
            title: title.into(),
            file_name: file_name.into(),
        }
    }
}

/// Lexicographic by title; file name breaks ties so the order is stable
pub fn sort_documents(documents: &mut [HtmlDocument]) {
    documents.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.file_name.cmp(&b.file_name)));
}

#[derive(Serialize)]
struct ResourcesContext<'a> {
    title: &'a str,
    stylesheet: Option<&'a str>,
    documents: &'a [HtmlDocument],
}

#[derive(Serialize)]
struct IndexContext<'a> {
    title: &'a str,
    default_target: &'a str,
}

/// Renderer for the two navigation pages
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, ReportError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(RESOURCES_PAGE, RESOURCES_TEMPLATE)?;
        registry.register_template_string(INDEX_PAGE, INDEX_TEMPLATE)?;
        Ok(Pages { registry })
    }

    /// The resource list; `documents` must already be sorted
    pub fn resources(&self, title: &str, stylesheet: Option<&str>, documents: &[HtmlDocument]) -> Result<String, ReportError> {
        let context = ResourcesContext {
            title,
            stylesheet,
            documents,
        };
        Ok(self.registry.render(RESOURCES_PAGE, &context)?)
    }

    /// The frameset opening `default_target` next to the resource list
    pub fn index(&self, title: &str, default_target: &str) -> Result<String, ReportError> {
        let context = IndexContext { title, default_target };
        Ok(self.registry.render(INDEX_PAGE, &context)?)
    }
}
