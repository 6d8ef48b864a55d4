//! Logical clock and deferred task queue.
//!
//! The queue is a min-heap keyed by `(due_ms, sequence)`, so tasks due at the
//! same instant run in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::load_balancer::ServerId;

/// Simulated wall clock in milliseconds since the simulation started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    now_ms: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock forward to `ms`. The clock never runs backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

/// Format simulated time as `HH:MM:SS.mmm`.
pub fn format_clock(ms: u64) -> String {
    let millis = ms % 1000;
    let secs = ms / 1000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        millis
    )
}

/// Deferred work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Dispatch one request (spaced batch submissions).
    Request { client_ip: Option<String> },
    /// Release a connection held on the identified server.
    Complete { server_id: ServerId, serial: u64 },
    /// One evaluation of the autoscale policy.
    AutoscaleTick { generation: u64 },
}

/// A task together with the time it becomes due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due_ms: u64,
    sequence: u64,
    pub task: Task,
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert for earliest-first
        other
            .due_ms
            .cmp(&self.due_ms)
            .then(other.sequence.cmp(&self.sequence))
    }
}

/// Pending tasks ordered by due time.
#[derive(Debug, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<ScheduledTask>,
    sequence: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, task: Task) {
        let sequence = self.sequence;
        self.sequence += 1;
        self.heap.push(ScheduledTask {
            due_ms,
            sequence,
            task,
        });
    }

    /// Pop the earliest task if it is due at or before `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<ScheduledTask> {
        if self.heap.peek()?.due_ms <= until_ms {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|t| t.due_ms)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
