//! Documentation run over a directory of WADL files
//!
//! Every input becomes `<stem>.html` through its own pipeline, conversions
//! running in parallel. An index page lists the documents by title and a
//! frameset shows it next to the selected document.

pub mod pages;
pub mod title;

pub use pages::{sort_documents, HtmlDocument, Pages, INDEX_PAGE, RESOURCES_PAGE};
pub use title::extract_title;

use crate::error::{PipelineError, ReportError};
use crate::pipeline::{PipelineConfig, StageKind, Wadl2HtmlPipeline};
use crate::reader::Location;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const DEFAULT_TITLE: &str = "REST API documentation";
const INPUT_EXTENSIONS: &[&str] = &["xml", "wadl"];

/// Settings for a documentation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Copied next to the pages and linked from every one of them
    pub stylesheet: Option<PathBuf>,
    pub title: String,
    pub escape_html_representations: bool,
    pub skip: bool,
    /// Abort on the first failed document instead of carrying on
    pub fail_on_error: bool,
}

impl ReportConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        ReportConfig {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            stylesheet: None,
            title: DEFAULT_TITLE.to_owned(),
            escape_html_representations: true,
            skip: false,
            fail_on_error: true,
        }
    }
}

/// What a run produced
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Converted documents in index order
    pub documents: Vec<HtmlDocument>,
    /// Inputs that failed while failures were tolerated
    pub failed: Vec<PathBuf>,
}

impl ReportSummary {
    /// Page the frameset opens first
    pub fn default_target(&self) -> Option<&HtmlDocument> {
        self.documents.first()
    }
}

/// WADL files directly inside `dir`, sorted by path
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ReportError::io(dir, e))? {
        let path = entry.map_err(|e| ReportError::io(dir, e))?.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| INPUT_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if wanted && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// `<stem>.html`
pub fn output_file_name(input: &Path) -> String {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    format!("{stem}.html")
}

#[derive(Debug)]
pub struct Report {
    config: ReportConfig,
}

impl Report {
    pub fn new(config: ReportConfig) -> Self {
        Report { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn run(&self) -> Result<ReportSummary, ReportError> {
        if self.config.skip {
            log::info!("Skipping REST API documentation");
            return Ok(ReportSummary::default());
        }

        if !self.config.input_dir.is_dir() {
            log::info!("{} does not exist, nothing to do", self.config.input_dir.display());
            return Ok(ReportSummary::default());
        }
        let inputs = discover_inputs(&self.config.input_dir)?;
        if inputs.is_empty() {
            log::info!("No WADL files in {}, nothing to do", self.config.input_dir.display());
            return Ok(ReportSummary::default());
        }

        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| ReportError::io(output_dir, e))?;
        let stylesheet = self.copy_stylesheet()?;

        let mut summary = self.convert_all(&inputs, stylesheet.as_deref())?;
        sort_documents(&mut summary.documents);

        match summary.default_target() {
            Some(first) => self.write_pages(&first.file_name, stylesheet.as_deref(), &summary.documents)?,
            None => log::warn!("No document could be converted, index not written"),
        }
        Ok(summary)
    }

    fn convert_all(&self, inputs: &[PathBuf], stylesheet: Option<&str>) -> Result<ReportSummary, ReportError> {
        if self.config.fail_on_error {
            let documents = inputs
                .par_iter()
                .map(|input| self.convert(input, stylesheet))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(ReportSummary {
                documents,
                failed: Vec::new(),
            });
        }

        let results: Vec<_> = inputs
            .par_iter()
            .map(|input| (input, self.convert(input, stylesheet)))
            .collect();

        let mut summary = ReportSummary::default();
        for (input, result) in results {
            match result {
                Ok(document) => summary.documents.push(document),
                Err(err) if err.is_batch_fatal() => return Err(err),
                Err(err) => {
                    log::warn!("{err}");
                    summary.failed.push(input.clone());
                }
            }
        }
        Ok(summary)
    }

    /// Convert one document, returning its index entry
    fn convert(&self, input: &Path, stylesheet: Option<&str>) -> Result<HtmlDocument, ReportError> {
        let file_name = output_file_name(input);
        let target = self.config.output_dir.join(&file_name);
        log::debug!("{} -> {}", input.display(), target.display());

        let document_error = |source: PipelineError| ReportError::Document {
            path: input.to_path_buf(),
            source,
        };

        let title = extract_title(&Location::from(input))
            .map_err(|e| document_error(PipelineError::new(StageKind::Source, e)))?;

        let mut config = PipelineConfig::new(input)
            .with_escape_html_representations(self.config.escape_html_representations);
        if let Some(stylesheet) = stylesheet {
            config = config.with_stylesheet(stylesheet);
        }

        let out = File::create(&target).map_err(|e| ReportError::io(&target, e))?;
        Wadl2HtmlPipeline::new(config)
            .execute(BufWriter::new(out))
            .map_err(document_error)?;

        Ok(HtmlDocument { title, file_name })
    }

    /// Copy the configured stylesheet into the output directory, returning
    /// the name pages link it by
    fn copy_stylesheet(&self) -> Result<Option<String>, ReportError> {
        let Some(source) = &self.config.stylesheet else {
            return Ok(None);
        };
        if !source.is_file() {
            return Err(ReportError::MissingStylesheet { path: source.clone() });
        }
        let Some(name) = source.file_name() else {
            return Err(ReportError::MissingStylesheet { path: source.clone() });
        };

        let target = self.config.output_dir.join(name);
        fs::copy(source, &target).map_err(|e| ReportError::io(&target, e))?;
        log::debug!("Copied stylesheet {} -> {}", source.display(), target.display());
        Ok(Some(name.to_string_lossy().into_owned()))
    }

    fn write_pages(&self, default_target: &str, stylesheet: Option<&str>, documents: &[HtmlDocument]) -> Result<(), ReportError> {
        let pages = Pages::new()?;
        let output_dir = &self.config.output_dir;

        let resources = pages.resources(&self.config.title, stylesheet, documents)?;
        let path = output_dir.join(RESOURCES_PAGE);
        fs::write(&path, resources).map_err(|e| ReportError::io(&path, e))?;

        let index = pages.index(&self.config.title, default_target)?;
        let path = output_dir.join(INDEX_PAGE);
        fs::write(&path, index).map_err(|e| ReportError::io(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::namespace::ns;
    use tempfile::TempDir;

    fn write_wadl(dir: &Path, name: &str, title: &str) {
        let xml = format!(
            "<application xmlns=\"{}\"><doc title=\"{}\"/><resources base=\"http://x/\"><resource path=\"p\"/></resources></application>",
            ns::WADL,
            title
        );
        fs::write(dir.join(name), xml).unwrap();
    }

    fn setup() -> (TempDir, ReportConfig) {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("wadl");
        fs::create_dir(&input).unwrap();
        let config = ReportConfig::new(input, dir.path().join("out"));
        (dir, config)
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_documents_are_listed_by_title() {
        let (_dir, config) = setup();
        write_wadl(&config.input_dir, "first.wadl", "B");
        write_wadl(&config.input_dir, "second.xml", "A");

        let summary = Report::new(config.clone()).run().unwrap();
        let titles: Vec<_> = summary.documents.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(summary.default_target().unwrap().file_name, "second.html");

        let out = &config.output_dir;
        assert!(out.join("first.html").is_file());
        assert!(out.join("second.html").is_file());

        let index = read(out.join(INDEX_PAGE));
        assert!(index.contains("<frame src=\"second.html\" name=\"content\">"));

        let resources = read(out.join(RESOURCES_PAGE));
        assert!(resources.contains("<title>REST API documentation</title>"));
        assert!(resources.find("second.html").unwrap() < resources.find("first.html").unwrap());
    }

    #[test]
    fn test_converted_page_content() {
        let (_dir, config) = setup();
        write_wadl(&config.input_dir, "orders.wadl", "Orders API");

        Report::new(config.clone()).run().unwrap();
        let html = read(config.output_dir.join("orders.html"));
        assert!(html.contains("<title>Orders API</title>"));
        assert!(html.contains("<h3>p</h3>"));
    }

    #[test]
    fn test_discovery_ignores_other_files() {
        let (_dir, config) = setup();
        write_wadl(&config.input_dir, "b.WADL", "b");
        write_wadl(&config.input_dir, "a.xml", "a");
        fs::write(config.input_dir.join("notes.txt"), "x").unwrap();
        fs::create_dir(config.input_dir.join("nested.xml")).unwrap();

        let inputs = discover_inputs(&config.input_dir).unwrap();
        let names: Vec<_> = inputs.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, vec!["a.xml", "b.WADL"]);
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(Path::new("dir/orders.v2.wadl")), "orders.v2.html");
    }

    #[test]
    fn test_skip_touches_nothing() {
        let (_dir, mut config) = setup();
        write_wadl(&config.input_dir, "a.wadl", "A");
        config.skip = true;

        assert_eq!(Report::new(config.clone()).run().unwrap(), ReportSummary::default());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_empty_input_writes_no_index() {
        let (_dir, config) = setup();
        assert_eq!(Report::new(config.clone()).run().unwrap(), ReportSummary::default());
        assert!(!config.output_dir.join(INDEX_PAGE).exists());
    }

    #[test]
    fn test_missing_input_dir_is_nothing_to_do() {
        let (dir, mut config) = setup();
        config.input_dir = dir.path().join("absent");
        assert!(Report::new(config).run().unwrap().documents.is_empty());
    }

    #[test]
    fn test_stylesheet_is_copied_and_linked_by_name() {
        let (dir, mut config) = setup();
        write_wadl(&config.input_dir, "a.wadl", "A");
        let css = dir.path().join("styles").join("site.css");
        fs::create_dir(css.parent().unwrap()).unwrap();
        fs::write(&css, "body {}").unwrap();
        config.stylesheet = Some(css);

        Report::new(config.clone()).run().unwrap();
        let out = &config.output_dir;
        assert_eq!(read(out.join("site.css")), "body {}");
        assert!(read(out.join("a.html")).contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"site.css\">"));
        assert!(read(out.join(RESOURCES_PAGE)).contains("href=\"site.css\""));
    }

    #[test]
    fn test_missing_stylesheet_is_an_error() {
        let (dir, mut config) = setup();
        write_wadl(&config.input_dir, "a.wadl", "A");
        config.stylesheet = Some(dir.path().join("absent.css"));

        let err = Report::new(config).run().unwrap_err();
        assert!(matches!(err, ReportError::MissingStylesheet { .. }));
    }

    #[test]
    fn test_failure_aborts_by_default() {
        let (_dir, config) = setup();
        write_wadl(&config.input_dir, "good.wadl", "Good");
        fs::write(config.input_dir.join("bad.wadl"), "<application>").unwrap();

        let err = Report::new(config.clone()).run().unwrap_err();
        match err {
            ReportError::Document { path, source } => {
                assert!(path.ends_with("bad.wadl"));
                assert_eq!(source.stage, StageKind::Source);
                assert!(!source.is_batch_fatal());
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!config.output_dir.join(INDEX_PAGE).exists());
    }

    #[test]
    fn test_keep_going_skips_failed_documents() {
        let (_dir, mut config) = setup();
        write_wadl(&config.input_dir, "good.wadl", "Good");
        fs::write(config.input_dir.join("bad.wadl"), "<application>").unwrap();
        config.fail_on_error = false;

        let summary = Report::new(config.clone()).run().unwrap();
        assert_eq!(summary.documents, vec![HtmlDocument::new("Good", "good.html")]);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].ends_with("bad.wadl"));
        assert!(config.output_dir.join(INDEX_PAGE).is_file());
    }

    #[test]
    fn test_custom_title_and_no_escaping() {
        let (_dir, mut config) = setup();
        let xml = format!(
            "<application xmlns=\"{}\"><representation mediaType=\"text/html\"><doc><p xmlns=\"http://www.w3.org/1999/xhtml\">x</p></doc></representation></application>",
            ns::WADL
        );
        fs::write(config.input_dir.join("a.wadl"), xml).unwrap();
        config.title = "My API".to_owned();
        config.escape_html_representations = false;

        let summary = Report::new(config.clone()).run().unwrap();
        assert_eq!(summary.documents, vec![HtmlDocument::new("", "a.html")]);
        assert!(read(config.output_dir.join(RESOURCES_PAGE)).contains("<h1>My API</h1>"));
        assert!(read(config.output_dir.join("a.html")).contains("<p>x</p>"));
    }
}
