use crate::error::{Result, ScanError};
use crate::extractor::{DEFAULT_USER_AGENT, LinkExtractor};
use crate::frontier::Frontier;
use crate::result::{Completion, CrawlReport};
use crate::result_map::ResultMap;
use crate::scheduler::{ProgressCallback, Scheduler};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_CANCEL_TIMEOUT: Duration = Duration::from_secs(20);

/// Runs one crawl from a seed URL to a sorted host listing.
///
/// Every call to [`Crawler::crawl`] builds its own frontier, result map and
/// task group, so nothing carries over between runs.
pub struct Crawler {
    user_agent: String,
    timeout: Duration,
    max_concurrency: usize,
    drain_timeout: Duration,
    cancel_timeout: Duration,
    progress_callback: Option<ProgressCallback>,
    interrupt: CancellationToken,
}

impl Crawler {
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            cancel_timeout: DEFAULT_CANCEL_TIMEOUT,
            progress_callback: None,
            interrupt: CancellationToken::new(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Maximum number of pages fetched at the same time.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_cancel_timeout(mut self, timeout: Duration) -> Self {
        self.cancel_timeout = timeout;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Uses an externally owned token as the interrupt signal, e.g. one
    /// cancelled from a Ctrl-C handler.
    pub fn with_interrupt(mut self, interrupt: CancellationToken) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Token that, once cancelled, makes a running [`Crawler::crawl`] stop
    /// waiting and return what it has. A cancelled token stays cancelled, so
    /// later runs on the same crawler return immediately.
    pub fn interrupt_handle(&self) -> CancellationToken {
        self.interrupt.clone()
    }

    pub async fn crawl(&self, seed: &str) -> Result<CrawlReport> {
        let started = Instant::now();
        let (seed_url, base_domain) = parse_seed(seed)?;

        info!(
            "Starting crawl of {} (base domain {}) with {} concurrent fetches",
            seed_url, base_domain, self.max_concurrency
        );

        let extractor = LinkExtractor::new(base_domain.clone(), &self.user_agent, self.timeout)?;
        let frontier = Arc::new(Frontier::new());
        let results = Arc::new(ResultMap::new());
        let cancel = CancellationToken::new();

        let mut scheduler = Scheduler::new(
            extractor,
            frontier.clone(),
            results.clone(),
            self.max_concurrency,
            cancel.clone(),
        );
        if let Some(ref callback) = self.progress_callback {
            scheduler = scheduler.with_progress_callback(callback.clone());
        }
        let scheduler = Arc::new(scheduler);

        scheduler.schedule(seed_url.clone());
        let completion = self.await_completion(scheduler.tracker(), &cancel).await;

        let observations = results.snapshot();
        let elapsed = started.elapsed();
        info!(
            "Crawl complete. Visited {} pages, found {} hosts in {:.2?} ({:?})",
            frontier.len(),
            observations.len(),
            elapsed,
            completion
        );

        Ok(CrawlReport {
            seed: seed_url,
            base_domain,
            observations,
            pages_visited: frontier.len(),
            completion,
            elapsed,
        })
    }

    /// Waits for every unit, including units spawned by other units.
    ///
    /// Past the drain timeout the run is cancelled and given the cancel
    /// timeout to wind down; after that the wait is given up with a warning.
    async fn await_completion(&self, tracker: &TaskTracker, cancel: &CancellationToken) -> Completion {
        tracker.close();

        let drained = tokio::select! {
            waited = tokio::time::timeout(self.drain_timeout, tracker.wait()) => waited.is_ok(),
            _ = self.interrupt.cancelled() => {
                warn!("Crawl interrupted with {} units still running", tracker.len());
                cancel.cancel();
                return Completion::Interrupted;
            }
        };
        if drained {
            return Completion::Drained;
        }

        warn!(
            "Crawl did not finish within {:?}, cancelling {} running units",
            self.drain_timeout,
            tracker.len()
        );
        cancel.cancel();

        let wound_down = tokio::select! {
            waited = tokio::time::timeout(self.cancel_timeout, tracker.wait()) => waited.is_ok(),
            _ = self.interrupt.cancelled() => {
                warn!("Crawl interrupted while {} units were winding down", tracker.len());
                return Completion::Interrupted;
            }
        };
        if wound_down {
            Completion::Cancelled
        } else {
            warn!(
                "Crawl units did not terminate within {:?}, continuing without them",
                self.cancel_timeout
            );
            Completion::Abandoned
        }
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes the seed and extracts the base domain from it.
pub fn parse_seed(seed: &str) -> Result<(String, String)> {
    let mut url = Url::parse(seed.trim())
        .map_err(|e| ScanError::InvalidSeed(format!("{}: {}", seed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScanError::InvalidSeed(format!(
            "{}: unsupported scheme '{}'",
            seed,
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ScanError::InvalidSeed(format!("{}: missing host", seed)))?
        .to_string();

    url.set_fragment(None);
    Ok((url.to_string(), host))
}
