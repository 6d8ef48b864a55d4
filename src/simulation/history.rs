//! Bounded routing history and request log.

use std::collections::VecDeque;

use serde::Serialize;

use crate::load_balancer::ServerId;

/// One successful routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingHistoryEntry {
    pub timestamp_ms: u64,
    pub server_id: ServerId,
    pub server_index: usize,
}

/// Most recent routing decisions, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RoutingHistory {
    entries: VecDeque<RoutingHistoryEntry>,
    capacity: usize,
}

impl RoutingHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, entry: RoutingHistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Drop entries that point past the end of a pool of `pool_len` servers.
    pub fn prune(&mut self, pool_len: usize) {
        self.entries.retain(|e| e.server_index < pool_len);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutingHistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Human-readable request log, oldest line evicted first.
#[derive(Debug, Clone)]
pub struct RequestLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RequestLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: u64, index: usize) -> RoutingHistoryEntry {
        RoutingHistoryEntry {
            timestamp_ms: ts,
            server_id: ServerId::from_ordinal(index),
            server_index: index,
        }
    }

    #[test]
    fn test_fifo_eviction() {
        let mut history = RoutingHistory::new(3);
        for ts in 0..5 {
            history.push(entry(ts, 0));
        }
        let stamps: Vec<u64> = history.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps, vec![2, 3, 4]);
    }

    #[test]
    fn test_prune_past_pool_end() {
        let mut history = RoutingHistory::new(10);
        history.push(entry(1, 0));
        history.push(entry(2, 2));
        history.push(entry(3, 1));
        history.prune(2);
        let indices: Vec<usize> = history.iter().map(|e| e.server_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_log_cap() {
        let mut log = RequestLog::new(2);
        log.push("one");
        log.push("two");
        log.push("three");
        assert_eq!(log.iter().collect::<Vec<_>>(), vec!["two", "three"]);
    }
}
