use clap::{Parser, ValueEnum};
use page_metrics::Source;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-metrics")]
#[command(about = "Records word, link and image metrics for visited pages")]
#[command(version)]
pub struct Args {
    /// Pages to open (web), or the saved HTML file to analyze (file)
    pub uri: Vec<String>,

    /// Source type (web, file)
    #[arg(short = 't', long = "type", value_enum, default_value_t = SourceTypeArg::Web)]
    pub source_type: SourceTypeArg,

    /// Address a saved HTML file was captured from (file sources)
    #[arg(long)]
    pub page_url: Option<String>,

    /// Path to a JSON source configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint (defaults to WEBDRIVER_URL or http://localhost:4444)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Backend base URL to post visits to (defaults to BACKEND_URL)
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Quiet period before a URL change counts, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Idle timeout in seconds (watcher stops if no new visits for this duration)
    #[arg(long)]
    pub idle_timeout: Option<u64>,

    /// Total timeout in seconds (maximum runtime)
    #[arg(long)]
    pub total_timeout: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceTypeArg {
    Web,
    File,
}

/// Convert the positional arguments into a source, if any were given
pub fn convert_source(args: &Args) -> Result<Option<Source>, String> {
    if args.uri.is_empty() {
        return Ok(None);
    }
    match args.source_type {
        SourceTypeArg::Web => Ok(Some(Source::Web(args.uri.clone()))),
        SourceTypeArg::File => {
            let [path] = args.uri.as_slice() else {
                return Err("file sources take exactly one path".to_string());
            };
            let page_url = args
                .page_url
                .clone()
                .ok_or_else(|| "--page-url is required for file sources".to_string())?;
            Ok(Some(Source::File {
                path: PathBuf::from(path),
                page_url,
            }))
        }
    }
}
