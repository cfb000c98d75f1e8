use dashmap::DashSet;

/// Set of URLs already handed to a crawl unit.
///
/// Entries are never removed, so a URL admitted once can never be crawled
/// again during the same run.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: DashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited. Returns `true` only for the first caller.
    ///
    /// The check and the insert happen under the same shard lock, so
    /// concurrent callers racing on one URL see exactly one `true`.
    pub fn try_visit(&self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
