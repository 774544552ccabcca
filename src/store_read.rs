use std::sync::Arc;

use smallvec::SmallVec;

use crate::codec::{CodecError, Decoder as _, Encoder};
use crate::store::ChunkSet;
use crate::time::slot;

/// Most rings are small (single digits to low hundreds of slots); a handful
/// of candidates fit inline before `SmallVec` spills to the heap.
type Candidates<E> = SmallVec<[(Arc<E>, i64, bool); 8]>;

impl<E: Encoder> ChunkSet<E> {
    /// Returns every stored tuple with `now - span + 1 <= ts <= now`, in the
    /// order the slots happen to be visited (newest slot first; not globally
    /// sorted by timestamp).
    ///
    /// A negative `span` is treated as a count query: `fetch_span(now, -n)`
    /// is equivalent to `fetch_count(now, n)`.
    pub fn fetch_span(&self, now: i64, span: i64) -> Result<E, CodecError> {
        if span < 0 {
            return self.fetch_count(now, span.unsigned_abs());
        }

        self.clean(self.clock.now());

        let first_ts = now.saturating_sub(span).saturating_add(1);
        let candidates = self.collect_candidates(now, |end| end < first_ts);

        let out = E::new(0);
        for (encoder, _end, _in_order) in candidates {
            let mut decoder = encoder.decoder_view(true);
            while decoder.advance() {
                let ts = decoder.timestamp();
                if ts >= first_ts && ts <= now {
                    out.append(ts, decoder.location(), decoder.elevation(), decoder.value())?;
                }
            }
        }
        Ok(out)
    }

    /// Returns the `min(n, available)` most-recent tuples with `ts <= now`.
    ///
    /// Unlike [`Self::fetch_span`], this does not run `clean` first.
    pub fn fetch_count(&self, now: i64, n: u64) -> Result<E, CodecError> {
        let candidates = self.collect_candidates(now, |_end| false);

        let out = E::new(0);
        let mut remaining: i64 = n.min(i64::MAX as u64) as i64;

        for (encoder, end, in_order) in candidates {
            if remaining <= 0 {
                break;
            }
            let slot_after_now = end > now;
            let emitted = match (in_order, slot_after_now) {
                (true, false) => emit_newest_prefix(&*encoder, remaining as u64, &out)?,
                (true, true) => emit_chronological_tail(&*encoder, now, remaining as u64, &out)?,
                // Case C and D both need the sort-based cutoff: skipping a
                // storage-order prefix only yields the newest tuples when
                // the slot is already ascending (Case A). When the window
                // lies entirely at or before `now`, every tuple already
                // satisfies `ts <= now`, so the `ts <= now` filter inside
                // `emit_unordered_tail` is a no-op and this degrades to a
                // plain sort-and-cutoff over the whole slot.
                (false, _) => emit_unordered_tail(&*encoder, now, remaining as u64, &out)?,
            };
            remaining -= emitted as i64;
        }

        Ok(out)
    }

    /// Walks the ring from the slot nearest `now` backwards, collecting the
    /// `(encoder, chunk_end, chronological)` of every populated slot whose
    /// window is not strictly after `now`, skipping any slot for which
    /// `skip_if` returns true given its `chunk_end`.
    ///
    /// Cloning the `Arc` handles out from under the ring mutex lets the
    /// (potentially slow) decoder scans run lock-free.
    fn collect_candidates(&self, now: i64, skip_if: impl Fn(i64) -> bool) -> Candidates<E> {
        let c = i64::from(self.chunk_count);
        let now_slot = i64::from(slot(now, self.chunk_length, self.chunk_count)) + c;

        let ring = self.ring.lock();
        let mut candidates = Candidates::<E>::new();
        for i in 0..c {
            let s = (now_slot - i).rem_euclid(c) as usize;
            let Some(encoder) = &ring.chunks[s] else {
                continue;
            };
            let end = ring.chunk_ends[s];
            if end - self.chunk_length >= now {
                // Slot's window lies entirely after `now`.
                continue;
            }
            if skip_if(end) {
                continue;
            }
            candidates.push((Arc::clone(encoder), end, ring.chronological[s]));
        }
        candidates
    }
}

/// Case A: in-order, window entirely `<= now`.
///
/// A single forward pass: advance past the first `k - remaining` tuples
/// without emitting them, then emit everything after that. When `k <=
/// remaining` the skip count is zero and the whole slot is emitted. Only
/// correct because ascending order means the skipped prefix is exactly the
/// oldest tuples; see [`emit_unordered_tail`] for the out-of-order sibling
/// (Case C) that needs a sort instead.
fn emit_newest_prefix<E: Encoder>(
    encoder: &E,
    remaining: u64,
    out: &E,
) -> Result<u64, CodecError> {
    let k = encoder.count();
    let skip = k.saturating_sub(remaining);

    let mut decoder = encoder.decoder_view(true);
    for _ in 0..skip {
        if !decoder.advance() {
            break;
        }
    }

    let mut emitted = 0u64;
    while decoder.advance() {
        out.append(
            decoder.timestamp(),
            decoder.location(),
            decoder.elevation(),
            decoder.value(),
        )?;
        emitted += 1;
    }
    Ok(emitted)
}

/// Case B: in-order, window extends past `now`. The ascending order lets us
/// count (and, on the fast path, emit) the `ts <= now` prefix with a single
/// early-exit scan instead of materialising anything.
fn emit_chronological_tail<E: Encoder>(
    encoder: &E,
    now: i64,
    remaining: u64,
    out: &E,
) -> Result<u64, CodecError> {
    let count_le = {
        let mut decoder = encoder.decoder_view(true);
        let mut count = 0u64;
        while decoder.advance() {
            if decoder.timestamp() > now {
                break;
            }
            count += 1;
        }
        count
    };

    if count_le <= remaining {
        let mut decoder = encoder.decoder_view(true);
        let mut emitted = 0u64;
        while decoder.advance() {
            let ts = decoder.timestamp();
            if ts > now {
                break;
            }
            out.append(ts, decoder.location(), decoder.elevation(), decoder.value())?;
            emitted += 1;
        }
        Ok(emitted)
    } else {
        let intermediate = E::new(0);
        let mut decoder = encoder.decoder_view(true);
        while decoder.advance() {
            let ts = decoder.timestamp();
            if ts > now {
                break;
            }
            intermediate.append(ts, decoder.location(), decoder.elevation(), decoder.value())?;
        }
        // The intermediate is itself chronological (we just appended it in
        // ascending order), so the same skip-then-emit logic applies.
        emit_newest_prefix(&intermediate, remaining, out)
    }
}

/// Case C / D: out-of-order. No early exit is possible without an assumed
/// order, so the `ts <= now` subset is always materialised; when it overflows
/// `remaining`, a cutoff timestamp is derived by sorting. For Case C (window
/// entirely `<= now`) every tuple already satisfies `ts <= now`, so the
/// materialisation step is effectively a full copy of the slot.
fn emit_unordered_tail<E: Encoder>(
    encoder: &E,
    now: i64,
    remaining: u64,
    out: &E,
) -> Result<u64, CodecError> {
    let intermediate = E::new(0);
    {
        let mut decoder = encoder.decoder_view(true);
        while decoder.advance() {
            let ts = decoder.timestamp();
            if ts <= now {
                intermediate.append(ts, decoder.location(), decoder.elevation(), decoder.value())?;
            }
        }
    }

    let count_le = intermediate.count();
    if count_le <= remaining {
        let mut decoder = intermediate.decoder_view(true);
        let mut emitted = 0u64;
        while decoder.advance() {
            out.append(
                decoder.timestamp(),
                decoder.location(),
                decoder.elevation(),
                decoder.value(),
            )?;
            emitted += 1;
        }
        Ok(emitted)
    } else {
        let mut ticks: Vec<i64> = Vec::with_capacity(count_le as usize);
        let mut decoder = intermediate.decoder_view(true);
        while decoder.advance() {
            ticks.push(decoder.timestamp());
        }
        ticks.sort_unstable();
        // Ties at the cutoff may cause more than `remaining` to be emitted;
        // accepted per the documented "at least the newest n" contract.
        let cutoff = ticks[(count_le - remaining) as usize];

        let mut decoder = intermediate.decoder_view(true);
        let mut emitted = 0u64;
        while decoder.advance() {
            if decoder.timestamp() >= cutoff {
                out.append(
                    decoder.timestamp(),
                    decoder.location(),
                    decoder.elevation(),
                    decoder.value(),
                )?;
                emitted += 1;
            }
        }
        Ok(emitted)
    }
}
