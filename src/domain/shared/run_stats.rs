use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Run-wide counters shared by every synthesis worker.
#[derive(Debug, Default)]
pub struct RunStatistics {
    api_calls: AtomicU64,
    synthesized_ms: AtomicU64,
    characters_sent: AtomicU64,
    segments_produced: AtomicU64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one successful synthesis call.
    pub fn record_synthesis(&self, characters: usize, duration_ms: u64) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        self.characters_sent
            .fetch_add(characters as u64, Ordering::Relaxed);
        self.synthesized_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    pub fn record_segments(&self, count: usize) {
        self.segments_produced
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            api_calls: self.api_calls.load(Ordering::Relaxed),
            synthesized_ms: self.synthesized_ms.load(Ordering::Relaxed),
            characters_sent: self.characters_sent.load(Ordering::Relaxed),
            segments_produced: self.segments_produced.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub api_calls: u64,
    pub synthesized_ms: u64,
    pub characters_sent: u64,
    pub segments_produced: u64,
}

impl UsageSnapshot {
    pub fn synthesized_minutes(&self) -> f64 {
        self.synthesized_ms as f64 / 60_000.0
    }
}
