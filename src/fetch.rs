use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::{info, warn};

use crate::model::Order;
use crate::parser;

pub const URL_BASE: &str = "https://www.amazon.co.jp";
pub const PAGE_SIZE: usize = 10;
pub const PAGE_DELAY_MS: u64 = 1200;

pub struct FetchOptions {
    pub base_url: String,
    pub page_size: usize,
    pub delay_ms: u64,
    /// Safety cap on fetched pages; `None` trusts the empty-page terminator.
    pub max_pages: Option<usize>,
}

impl FetchOptions {
    /// A trailing slash on the base would leak a double slash into every
    /// joined URL, so it is stripped once here.
    pub fn new(base_url: &str, page_size: usize, delay_ms: u64, max_pages: Option<usize>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
            delay_ms,
            max_pages,
        }
    }
}

/// Walk the order-history pages for one year, offset 0 upward, until a page
/// yields zero orders. Any fetch or HTTP error aborts the whole run: no
/// retries, no partial output.
pub async fn fetch_orders(year: &str, opts: &FetchOptions) -> Result<Vec<Order>> {
    let client = reqwest::Client::new();

    let fetch_page = |start_index: usize| {
        let client = client.clone();
        let url = page_url(&opts.base_url, year, start_index);
        async move {
            let response = client
                .get(&url)
                .send()
                .await
                .with_context(|| format!("Failed to fetch order page at offset {start_index}"))?;
            Ok(response.error_for_status()?.text().await?)
        }
    };

    walk_pages(opts, fetch_page).await
}

/// The offset/accumulate/stop loop, driven by any page fetcher so the
/// pagination rules can be exercised with canned bodies.
async fn walk_pages<F, Fut>(opts: &FetchOptions, mut fetch_page: F) -> Result<Vec<Order>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    let mut orders: Vec<Order> = Vec::new();
    let mut pages = 0usize;

    loop {
        if let Some(cap) = opts.max_pages {
            if pages >= cap {
                warn!("Stopping at page cap {cap}; the history may be truncated");
                break;
            }
        }

        let start_index = pages * opts.page_size;
        pb.set_message(format!("page {} (offset {})", pages + 1, start_index));
        info!("Start offset {start_index}-");

        let body = fetch_page(start_index).await?;

        // The document tree is not Send, so it is parsed and dropped in a
        // sync scope and never held across the sleep below.
        let page_orders = {
            let doc = Html::parse_document(&body);
            parser::extract_orders(&doc, &opts.base_url)
        };

        if page_orders.is_empty() {
            info!("Finished: {} orders", orders.len());
            break;
        }

        info!("Offset {start_index}: {} orders", page_orders.len());
        orders.extend(page_orders);
        pages += 1;

        // Courtesy pause between pages, not a correctness requirement.
        tokio::time::sleep(Duration::from_millis(opts.delay_ms)).await;
    }

    pb.finish_and_clear();
    Ok(orders)
}

fn page_url(base: &str, year: &str, start_index: usize) -> String {
    format!(
        "{base}/gp/css/order-history?disableCsd=no-js&orderFilter=year-{year}&startIndex={start_index}"
    )
}

// ── Tests ──
