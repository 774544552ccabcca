use crate::codec::Encoder;
use crate::store::ChunkSet;
use crate::time::chunk_end;

impl<E: Encoder> ChunkSet<E> {
    /// Drops every slot whose window has aged out of the live range
    /// `(chunk_end(now) - chunk_count * chunk_length, chunk_end(now)]`.
    ///
    /// Returns the number of slots dropped. Reports the same count to the
    /// injected [`crate::metrics::MetricSink`] on every call, including a
    /// `0` update when nothing aged out. Idempotent: calling `clean` twice
    /// with the same (or a later) `now` drops zero the second time.
    pub fn clean(&self, now: i64) -> u64 {
        let cutoff = chunk_end(now, self.chunk_length) - self.window_ticks();

        let dropped = {
            let mut ring = self.ring.lock();
            let mut dropped = 0u64;
            for i in 0..self.chunk_count as usize {
                if ring.chunks[i].is_some() && ring.chunk_ends[i] <= cutoff {
                    ring.chunks[i] = None;
                    dropped += 1;
                }
            }
            dropped
        };

        if dropped > 0 {
            tracing::debug!(dropped, cutoff, "clean: dropped stale chunks");
        }
        self.metric_sink.record_chunks_dropped(dropped);

        dropped
    }
}
