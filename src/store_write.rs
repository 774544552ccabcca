use std::sync::Arc;

use crate::codec::{CodecError, Decoder as _, Encoder};
use crate::store::ChunkSet;
use crate::time::{chunk_end, slot};

impl<E: Encoder> ChunkSet<E> {
    /// Decodes every tuple in `encoder_in` and appends the ones that fall
    /// within the live window to their target slot, re-initialising any slot
    /// that has aged out of a previous revolution of the ring.
    ///
    /// Out-of-window tuples are silently dropped, matching the behaviour of
    /// a real ingestion path where late/early data for a GTS is simply not
    /// representable in a bounded ring.
    pub fn store(&self, encoder_in: &E) -> Result<(), CodecError> {
        let now = self.clock.now();
        let last_end = chunk_end(now, self.chunk_length);
        let first_start = last_end - self.window_ticks() + 1;

        let mut decoder = encoder_in.decoder_view(true);
        let mut accepted = 0u64;
        let mut dropped = 0u64;

        while decoder.advance() {
            let ts = decoder.timestamp();
            if ts < first_start || ts > last_end {
                dropped += 1;
                continue;
            }

            let id = slot(ts, self.chunk_length, self.chunk_count) as usize;
            let encoder = {
                let mut ring = self.ring.lock();

                let needs_reinit = match &ring.chunks[id] {
                    None => true,
                    Some(_) => ring.chunk_ends[id] < first_start,
                };
                if needs_reinit {
                    let end = chunk_end(ts, self.chunk_length);
                    tracing::trace!(slot = id, old_end = ring.chunk_ends[id], new_end = end, "re-initialising stale slot");
                    ring.chunks[id] = Some(Arc::new(E::new(0)));
                    ring.chunk_ends[id] = end;
                    ring.last_ts[id] = end - self.chunk_length;
                    ring.chronological[id] = true;
                }

                if ts < ring.last_ts[id] {
                    ring.chronological[id] = false;
                }
                ring.last_ts[id] = ts;

                Arc::clone(ring.chunks[id].as_ref().expect("just initialised above"))
            };

            encoder.append(ts, decoder.location(), decoder.elevation(), decoder.value())?;
            accepted += 1;
        }

        tracing::trace!(accepted, dropped, "store: applied incoming tuples");
        Ok(())
    }
}
