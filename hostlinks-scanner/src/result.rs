use std::collections::HashSet;
use std::time::Duration;

/// A link seen on a crawled page, reduced to its host and anchor text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    pub host: String,
    pub label: String,
}

impl Observation {
    pub fn new(host: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            label: label.into(),
        }
    }
}

/// Everything the link extractor learned from one page.
#[derive(Debug, Clone, Default)]
pub struct PageLinks {
    /// Absolute URLs on the base domain, candidates for crawling.
    pub internal: HashSet<String>,
    /// One entry per anchor, internal or external, in document order.
    pub observations: Vec<Observation>,
}

impl PageLinks {
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.observations.is_empty()
    }
}

/// How the run controller's wait for outstanding work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every crawl unit finished within the drain timeout.
    Drained,
    /// The drain timeout elapsed and cancelled units wound down in time.
    Cancelled,
    /// Units were still running after the cancel timeout.
    Abandoned,
    /// The caller interrupted the wait.
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: String,
    pub base_domain: String,
    /// Sorted by label, then host.
    pub observations: Vec<Observation>,
    pub pages_visited: usize,
    pub completion: Completion,
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Hosts in snapshot order.
    pub fn hosts(&self) -> Vec<&str> {
        self.observations.iter().map(|o| o.host.as_str()).collect()
    }
}
