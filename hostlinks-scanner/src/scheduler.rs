use crate::error::ScanError;
use crate::extractor::LinkExtractor;
use crate::frontier::Frontier;
use crate::result_map::ResultMap;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Dispatches one crawl unit per newly discovered URL.
///
/// Units run on a shared [`TaskTracker`]; each one fetches its page, records
/// the observations and schedules the internal links it found. The frontier
/// guarantees a URL is dispatched at most once, which is what bounds the
/// recursion.
pub struct Scheduler {
    extractor: LinkExtractor,
    frontier: Arc<Frontier>,
    results: Arc<ResultMap>,
    tracker: TaskTracker,
    cancel: CancellationToken,
    permits: Arc<Semaphore>,
    progress_callback: Option<ProgressCallback>,
}

impl Scheduler {
    pub fn new(
        extractor: LinkExtractor,
        frontier: Arc<Frontier>,
        results: Arc<ResultMap>,
        max_concurrency: usize,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            extractor,
            frontier,
            results,
            tracker: TaskTracker::new(),
            cancel,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Dispatches `url` unless it was seen before or the run is cancelled.
    pub fn schedule(self: &Arc<Self>, url: String) {
        if !self.frontier.try_visit(&url) {
            debug!("Already visited {}", url);
            return;
        }
        if self.cancel.is_cancelled() {
            debug!("Crawl cancelled, not dispatching {}", url);
            return;
        }

        let scheduler = Arc::clone(self);
        self.tracker.spawn(async move {
            let unit = AssertUnwindSafe(scheduler.crawl_unit(&url)).catch_unwind();
            if let Err(payload) = unit.await {
                let error = ScanError::Panic(panic_message(payload.as_ref()));
                warn!("Error crawling URL {}: {}", url, error);
            }
        });
    }

    async fn crawl_unit(self: &Arc<Self>, url: &str) {
        let permit = tokio::select! {
            _ = self.cancel.cancelled() => return,
            permit = self.permits.acquire() => match permit {
                Ok(permit) => permit,
                Err(_) => return,
            },
        };

        if let Some(ref callback) = self.progress_callback {
            callback(url.to_string());
        }

        let links = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("Abandoning in-flight fetch of {}", url);
                return;
            }
            links = self.extractor.extract(url) => links,
        };
        drop(permit);

        self.results.record_all(&links.observations);

        if self.cancel.is_cancelled() {
            return;
        }
        for link in links.internal {
            self.schedule(link);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
