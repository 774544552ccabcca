use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::codec::Encoder;
use crate::metrics::{MetricSink, NoopMetricSink};

/// A fixed-size ring of chunk slots covering a total window of `chunk_count *
/// chunk_length` ticks for a single geo time series.
///
/// See the crate-level documentation for the full design. In short: writes
/// bucket each incoming timestamp into one of `chunk_count` slots via
/// [`crate::time::slot`], each slot accumulating datapoints in an
/// [`Encoder`]; reads walk the ring from the slot nearest `now` backwards.
pub struct ChunkSet<E: Encoder> {
    pub(crate) chunk_count: u32,
    pub(crate) chunk_length: i64,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) metric_sink: Arc<dyn MetricSink>,
    pub(crate) ring: Mutex<Ring<E>>,
}

/// The metadata arrays guarded by the ring mutex, plus the encoders themselves.
///
/// Encoders are reference-counted so that a read can clone the handle out
/// from under the mutex and decode it without holding the lock for the
/// duration of the scan.
pub(crate) struct Ring<E: Encoder> {
    pub chunks: Vec<Option<Arc<E>>>,
    pub chunk_ends: Vec<i64>,
    pub chronological: Vec<bool>,
    pub last_ts: Vec<i64>,
}

impl<E: Encoder> Ring<E> {
    fn new(chunk_count: u32) -> Self {
        let n = chunk_count as usize;
        Self {
            chunks: (0..n).map(|_| None).collect(),
            chunk_ends: vec![0; n],
            chronological: vec![true; n],
            last_ts: vec![0; n],
        }
    }
}

impl<E: Encoder> ChunkSet<E> {
    /// Creates an empty chunk set covering `chunk_count * chunk_length` ticks.
    ///
    /// Both dimensions are immutable for the lifetime of the set. Uses a
    /// [`SystemClock`] and a no-op metric sink by default; chain
    /// [`Self::with_clock`] / [`Self::with_metric_sink`] to override either.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_count == 0` or `chunk_length < 1`.
    pub fn new(chunk_count: u32, chunk_length: i64) -> Self {
        assert!(chunk_count >= 1, "a chunk set needs at least one slot");
        assert!(chunk_length >= 1, "chunk_length must be positive");
        Self {
            chunk_count,
            chunk_length,
            clock: Arc::new(SystemClock),
            metric_sink: Arc::new(NoopMetricSink),
            ring: Mutex::new(Ring::new(chunk_count)),
        }
    }

    /// Overrides the wall clock used internally by `store` and `fetch_span`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Overrides the sink that `clean` reports dropped-slot counts to.
    #[must_use]
    pub fn with_metric_sink(mut self, sink: Arc<dyn MetricSink>) -> Self {
        self.metric_sink = sink;
        self
    }

    #[inline]
    pub fn chunk_count(&self) -> u32 {
        self.chunk_count
    }

    #[inline]
    pub fn chunk_length(&self) -> i64 {
        self.chunk_length
    }

    #[inline]
    pub(crate) fn window_ticks(&self) -> i64 {
        i64::from(self.chunk_count) * self.chunk_length
    }
}
