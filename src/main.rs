mod export;
mod fetch;
mod input;
mod model;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scraper::Html;

use input::OutputFormat;

#[derive(Parser)]
#[command(name = "amz_orders", about = "Amazon.co.jp order history exporter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one year's order history and save it as CSV or JSON
    Export {
        /// Target year with optional format suffix, e.g. "2021", "2020json",
        /// "1999csv" (default: current year, csv)
        target: Option<String>,
        /// Directory the export file is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Orders per history page
        #[arg(long, default_value_t = fetch::PAGE_SIZE)]
        page_size: usize,
        /// Pause between page fetches, in milliseconds
        #[arg(long, default_value_t = fetch::PAGE_DELAY_MS)]
        delay_ms: u64,
        /// Safety cap on fetched pages (default: none)
        #[arg(long)]
        max_pages: Option<usize>,
        /// Origin to fetch from
        #[arg(long, default_value = fetch::URL_BASE)]
        base_url: String,
    },
    /// Extract orders from a saved history page and print them to stdout
    Parse {
        /// Path to an HTML file
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            target,
            out,
            page_size,
            delay_ms,
            max_pages,
            base_url,
        } => {
            let (year, format) = input::parse_target(target.as_deref())?;
            println!("Exporting {year} as {format}");

            let opts = fetch::FetchOptions::new(&base_url, page_size, delay_ms, max_pages);
            let orders = fetch::fetch_orders(&year, &opts).await?;
            let path = export::write_export(&out, &year, format, &orders)?;
            println!("Saved {} orders to {}", orders.len(), path.display());
        }
        Commands::Parse { file, format } => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let doc = Html::parse_document(&body);
            let orders = parser::extract_orders(&doc, fetch::URL_BASE);
            let (_, payload) = export::serialize(&orders, format)?;
            println!("{payload}");
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}
