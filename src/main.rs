use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use rent_scrape::access::DEFAULT_STATION_LIMIT;
use rent_scrape::images::DEFAULT_IMAGE_LIMIT;
use rent_scrape::output::render;
use rent_scrape::{
    CoordinatePolicy, ExtractOptions, Extractor, FetchConfig, Format, PageClient, Romanizer,
};

#[derive(Parser)]
#[command(name = "rent-scrape")]
#[command(about = "Extract structured data from a rental listing detail page")]
#[command(
    after_help = "Example:\n  rent-scrape https://rent.tokyu-housing-lease.co.jp/rent/8034884/117024"
)]
struct Cli {
    /// Listing detail page URL
    #[arg(value_name = "URL")]
    url: String,

    /// Read the page from a saved file instead of fetching URL
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json, env = "RENT_SCRAPE_FORMAT")]
    format: Format,

    /// Record output file (default: out.json or out.csv)
    #[arg(short, long, env = "RENT_SCRAPE_OUTPUT")]
    output: Option<PathBuf>,

    /// Where to save the fetched page
    #[arg(long, default_value = "page.html", env = "RENT_SCRAPE_HTML_OUT")]
    html_out: PathBuf,

    /// Print the record without writing any files
    #[arg(long)]
    no_save: bool,

    /// Maximum number of stations to extract
    #[arg(long, default_value_t = DEFAULT_STATION_LIMIT, env = "RENT_SCRAPE_STATIONS")]
    stations: usize,

    /// Maximum number of images to extract
    #[arg(long, default_value_t = DEFAULT_IMAGE_LIMIT, env = "RENT_SCRAPE_IMAGES")]
    images: usize,

    /// Keep structured-data coordinates unless they're missing
    #[arg(long)]
    first_found_coords: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 20, env = "RENT_SCRAPE_TIMEOUT")]
    timeout: u64,

    /// Fetch attempts before giving up
    #[arg(long, default_value_t = 3, env = "RENT_SCRAPE_ATTEMPTS")]
    attempts: u32,

    /// Quiet mode - don't print the record to stdout
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_page(cli: &Cli) -> Result<Vec<u8>> {
    if let Some(path) = &cli.input {
        return fs::read(path).with_context(|| format!("Failed to read page file: {:?}", path));
    }

    let client = PageClient::new(FetchConfig {
        timeout: Duration::from_secs(cli.timeout),
        max_attempts: cli.attempts,
        ..Default::default()
    })?;

    match client.fetch(&cli.url) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            println!("{}", failure_payload(&e)?);
            std::process::exit(2);
        }
    }
}

/// One-line JSON error printed in place of a record when the page can't be fetched
fn failure_payload(error: &dyn std::fmt::Display) -> serde_json::Result<String> {
    let payload = serde_json::json!({ "error": format!("request_failed: {error}") });
    serde_json::to_string(&payload)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let html = load_page(&cli)?;
    info!(url = %cli.url, bytes = html.len(), "page loaded");

    let options = ExtractOptions {
        station_limit: cli.stations,
        image_limit: cli.images,
        coordinate_policy: if cli.first_found_coords {
            CoordinatePolicy::FirstFound
        } else {
            CoordinatePolicy::Overwrite
        },
    };
    let romanizer = Romanizer::detect();
    if !romanizer.is_available() {
        info!("romanization engine unavailable, building names pass through");
    }
    let extractor = Extractor::new(options, romanizer);

    let record = extractor.extract(&cli.url, &html);
    let rendered = render(&record, cli.format)?;

    if !cli.quiet {
        println!("{}", rendered);
    }

    if cli.no_save {
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("out.{}", cli.format.extension())));
    fs::write(&output, &rendered)
        .with_context(|| format!("Failed to write record: {:?}", output))?;

    if cli.input.is_none() {
        fs::write(&cli.html_out, &html)
            .with_context(|| format!("Failed to write page: {:?}", cli.html_out))?;
        eprintln!("Wrote {} & {}", output.display(), cli.html_out.display());
    } else {
        eprintln!("Wrote {}", output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_scrape::FetchError;

    #[test]
    fn failure_payload_is_single_line_json() {
        let error = FetchError::Status {
            url: "https://example.com/rent/1/2".to_string(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        };
        let line = failure_payload(&error).unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("request_failed: "));
        assert!(message.contains("503"));
    }

    #[test]
    fn failure_payload_keeps_native_text() {
        let line = failure_payload(&"接続できません").unwrap();
        assert_eq!(line, r#"{"error":"request_failed: 接続できません"}"#);
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["rent-scrape", "https://example.com/rent/1/2"]).unwrap();
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.timeout, 20);
        assert_eq!(cli.attempts, 3);
        assert!(!cli.first_found_coords);
    }
}
