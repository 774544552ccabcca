//! The metric sink collaborator.
//!
//! `clean` reports the number of slots it dropped on each call. The sink's
//! address/identity is injected at construction via [`crate::ChunkSet::with_metric_sink`];
//! a no-op default means callers who don't care about the counter pay nothing.

use std::sync::atomic::{AtomicU64, Ordering};

pub trait MetricSink: Send + Sync {
    /// `inmemory.chunks.dropped += count`.
    fn record_chunks_dropped(&self, count: u64);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricSink;

impl MetricSink for NoopMetricSink {
    fn record_chunks_dropped(&self, _count: u64) {}
}

/// A simple atomic counter, useful both in tests and as a minimal sink for
/// callers who just want to poll a number.
#[derive(Debug, Default)]
pub struct CountingMetricSink {
    dropped: AtomicU64,
}

impl CountingMetricSink {
    pub fn total_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl MetricSink for CountingMetricSink {
    fn record_chunks_dropped(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }
}
