use crate::result::Observation;
use dashmap::DashMap;

/// Host → most recently observed label.
///
/// Concurrent crawl units race on the same host; whichever write lands last
/// wins.
#[derive(Debug, Default)]
pub struct ResultMap {
    entries: DashMap<String, String>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, host: &str, label: &str) {
        self.entries.insert(host.to_string(), label.to_string());
    }

    pub fn record_all<'a>(&self, observations: impl IntoIterator<Item = &'a Observation>) {
        for observation in observations {
            self.record(&observation.host, &observation.label);
        }
    }

    pub fn get(&self, host: &str) -> Option<String> {
        self.entries.get(host).map(|label| label.value().clone())
    }

    /// Copies the map out, sorted by label ascending with host breaking ties.
    pub fn snapshot(&self) -> Vec<Observation> {
        let mut observations: Vec<Observation> = self
            .entries
            .iter()
            .map(|entry| Observation::new(entry.key().clone(), entry.value().clone()))
            .collect();
        sort_by_label(&mut observations);
        observations
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn sort_by_label(observations: &mut [Observation]) {
    observations.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.host.cmp(&b.host)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_last_write_wins() {
        let map = ResultMap::new();
        map.record("example.com", "Home");
        map.record("example.com", "About");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("example.com").as_deref(), Some("About"));
    }

    #[test]
    fn test_snapshot_sorted_by_label() {
        let map = ResultMap::new();
        map.record("zeta.org", "Alpha");
        map.record("alpha.org", "Zulu");
        map.record("mid.org", "Mike");

        let hosts: Vec<String> = map.snapshot().into_iter().map(|o| o.host).collect();
        assert_eq!(hosts, vec!["zeta.org", "mid.org", "alpha.org"]);
    }

    #[test]
    fn test_snapshot_ties_ordered_by_host() {
        let map = ResultMap::new();
        map.record("b.org", "Same");
        map.record("a.org", "Same");
        map.record("c.org", "");

        let snapshot = map.snapshot();
        assert_eq!(snapshot[0], Observation::new("c.org", ""));
        assert_eq!(snapshot[1], Observation::new("a.org", "Same"));
        assert_eq!(snapshot[2], Observation::new("b.org", "Same"));
    }

    #[test]
    fn test_resorting_snapshot_is_idempotent() {
        let map = ResultMap::new();
        for (host, label) in [("x.io", "Docs"), ("y.io", "Blog"), ("z.io", "Careers")] {
            map.record(host, label);
        }

        let snapshot = map.snapshot();
        let mut resorted = snapshot.clone();
        sort_by_label(&mut resorted);
        assert_eq!(snapshot, resorted);
        assert_eq!(snapshot, map.snapshot());
    }

    #[test]
    fn test_concurrent_records_keep_every_host() {
        let map = Arc::new(ResultMap::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let map = map.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        map.record(&format!("host{}.test", i), &format!("label{}", t));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.len(), 100);
    }
}
