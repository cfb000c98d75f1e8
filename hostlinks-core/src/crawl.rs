use hostlinks_scanner::result::{Completion, CrawlReport};
use hostlinks_scanner::{CancellationToken, Crawler};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Crawled when no seed is given on the command line.
pub const DEFAULT_SEED_URL: &str = "https://ecosio.com";

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub seed: String,
    pub threads: usize,
    pub request_timeout: Duration,
    pub drain_timeout: Duration,
    pub cancel_timeout: Duration,
    pub show_progress_bars: bool,
    /// Cancelled by the front-end to cut the crawl short.
    pub interrupt: Option<CancellationToken>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED_URL.to_string(),
            threads: hostlinks_scanner::crawler::DEFAULT_MAX_CONCURRENCY,
            request_timeout: hostlinks_scanner::crawler::DEFAULT_REQUEST_TIMEOUT,
            drain_timeout: hostlinks_scanner::crawler::DEFAULT_DRAIN_TIMEOUT,
            cancel_timeout: hostlinks_scanner::crawler::DEFAULT_CANCEL_TIMEOUT,
            show_progress_bars: false,
            interrupt: None,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a crawl with the given options
/// Returns the crawl report
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlReport, String> {
    let CrawlOptions {
        seed,
        threads,
        request_timeout,
        drain_timeout,
        cancel_timeout,
        show_progress_bars,
        interrupt,
    } = options;

    // Single spinner for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Starting crawl...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));
    let count_clone = processed_count.clone();
    let pb_clone = progress_bar.clone();
    let page_callback: hostlinks_scanner::ProgressCallback = Arc::new(move |url: String| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Dispatched page {}: {}", count, url);
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("Crawling... {} pages visited", count));
        }
    });

    let mut crawler = Crawler::new()
        .with_max_concurrency(threads)
        .with_timeout(request_timeout)
        .with_drain_timeout(drain_timeout)
        .with_cancel_timeout(cancel_timeout)
        .with_progress_callback(page_callback);
    if let Some(interrupt) = interrupt {
        crawler = crawler.with_interrupt(interrupt);
    }

    if let Some(ref callback) = progress_callback {
        callback(format!("Crawling {} with {} workers", seed, threads));
    }

    let result = crawler.crawl(&seed).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Crawl complete! {} pages visited",
            processed_count.load(Ordering::Relaxed)
        ));
    }

    let report = result.map_err(|e| e.to_string())?;

    if let Some(ref callback) = progress_callback
        && let Some(notice) = completion_notice(report.completion)
    {
        callback(notice.to_string());
    }

    Ok(report)
}

/// Explains a crawl that did not drain on its own; `None` for a full crawl.
pub fn completion_notice(completion: Completion) -> Option<&'static str> {
    match completion {
        Completion::Drained => None,
        Completion::Cancelled => Some("[!] Crawl timed out; remaining pages were cancelled"),
        Completion::Abandoned => {
            Some("[!] Crawl timed out and did not shut down cleanly; results may be partial")
        }
        Completion::Interrupted => Some("[!] Crawl interrupted; results are partial"),
    }
}

/// Render the final listing: the seed, then the hosts ordered by label.
pub fn generate_host_listing(report: &CrawlReport) -> String {
    let mut listing = String::new();
    listing.push_str(&format!("Collection of links for: {}\n", report.seed));
    listing.push_str(&format!("[{}]\n", report.hosts().join(", ")));
    listing
}
