//! wadldoc: generate browsable HTML documentation from WADL files
//!
//! ```bash
//! wadldoc --input-dir src/main/wadl --output-dir target/restapidocs
//! wadldoc --stylesheet docs/site.css --title "Orders service" --keep-going
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use wadldoc::report::{Report, ReportConfig, DEFAULT_TITLE};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "wadldoc", version)]
#[command(about = "Generate HTML documentation from WADL files")]
struct Cli {
    /// Directory holding the .wadl / .xml inputs
    #[arg(long, default_value = "src/main/wadl", env = "WADLDOC_INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory the documentation is written to
    #[arg(long, default_value = "target/restapidocs", env = "WADLDOC_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// CSS file copied next to the pages and linked instead of the inline styles
    #[arg(long, env = "WADLDOC_STYLESHEET")]
    stylesheet: Option<PathBuf>,

    /// Title of the index page
    #[arg(long, default_value = DEFAULT_TITLE, env = "WADLDOC_TITLE")]
    title: String,

    /// Render HTML representation docs as markup instead of as literal source
    #[arg(long, env = "WADLDOC_NO_ESCAPE_HTML_REPRESENTATIONS")]
    no_escape_html_representations: bool,

    /// Do nothing
    #[arg(long, env = "WADLDOC_SKIP")]
    skip: bool,

    /// Carry on with the remaining documents when one fails
    #[arg(long, env = "WADLDOC_KEEP_GOING")]
    keep_going: bool,
}

impl From<Cli> for ReportConfig {
    fn from(cli: Cli) -> Self {
        ReportConfig {
            input_dir: cli.input_dir,
            output_dir: cli.output_dir,
            stylesheet: cli.stylesheet,
            title: cli.title,
            escape_html_representations: !cli.no_escape_html_representations,
            skip: cli.skip,
            fail_on_error: !cli.keep_going,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let report = Report::new(cli.into());
    match report.run() {
        Ok(summary) => {
            if !summary.documents.is_empty() {
                log::info!(
                    "Wrote {} document(s) to {}",
                    summary.documents.len(),
                    report.config().output_dir.display()
                );
            }
            if summary.failed.is_empty() {
                ExitCode::SUCCESS
            } else {
                log::error!("{} document(s) failed", summary.failed.len());
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
