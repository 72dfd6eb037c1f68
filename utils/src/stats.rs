//! Named event counters.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A fixed set of named counters, safe to bump through a shared reference.
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names.iter().map(|&name| (name, AtomicU64::new(0))).collect();
        Self { counters }
    }

    /// Unknown names are ignored.
    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Counter values in name order.
    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        self.counters
            .iter()
            .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
            .collect()
    }

    /// `name=value` pairs joined by spaces, for a single log line.
    pub fn summary(&self) -> String {
        self.snapshot()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_registered_names() {
        let stats = StatsCounter::new(&["blocks", "reveals"]);
        stats.increment("blocks");
        stats.add("blocks", 2);
        stats.increment("unknown");
        assert_eq!(stats.get("blocks"), 3);
        assert_eq!(stats.get("reveals"), 0);
        assert_eq!(stats.get("unknown"), 0);
    }

    #[test]
    fn summary_is_sorted() {
        let stats = StatsCounter::new(&["prevotes", "blocks"]);
        stats.increment("prevotes");
        assert_eq!(stats.summary(), "blocks=0 prevotes=1");
    }
}
