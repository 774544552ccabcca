mod common;

use std::sync::Arc;

use anyhow::Result;
use gts_chunk_store::testing::{collect_timestamps, VecEncoder};
use gts_chunk_store::ChunkSet;

use common::{elev, loc, val, FakeClock};

fn store_one(store: &ChunkSet<VecEncoder>, ts: i64) -> Result<()> {
    let input = VecEncoder::from_tuples([(ts, loc(1), elev(0), val(ts))]);
    store.store(&input)?;
    Ok(())
}

fn store_many(store: &ChunkSet<VecEncoder>, tuples: &[i64]) -> Result<()> {
    let input = VecEncoder::from_tuples(tuples.iter().map(|&ts| (ts, loc(1), elev(0), val(ts))));
    store.store(&input)?;
    Ok(())
}

/// Sequential fill followed by a span query covering the whole live window
/// and a count query confined to a single slot.
#[test]
fn sequential_fill() -> Result<()> {
    let clock = Arc::new(FakeClock::new(3999));
    let store = ChunkSet::<VecEncoder>::new(4, 1000).with_clock(clock);

    let tuples: Vec<i64> = (100..=3900).step_by(100).collect();
    store_many(&store, &tuples)?;

    let span = store.fetch_span(3999, 4000)?;
    let mut got = collect_timestamps(span.decoder_view(true));
    got.sort_unstable();
    assert_eq!(got, tuples);

    let count = store.fetch_count(3999, 5)?;
    let got = collect_timestamps(count.decoder_view(true));
    assert_eq!(got, vec![3500, 3600, 3700, 3800, 3900]);

    Ok(())
}

/// Three tuples appended out of order into the same slot: the slot's
/// `chronological` flag must end false, and a count query confined to that
/// slot must still return the two tuples with the largest timestamps, not an
/// arbitrary storage-order suffix.
#[test]
fn out_of_order_within_slot() -> Result<()> {
    let clock = Arc::new(FakeClock::new(1999));
    let store = ChunkSet::<VecEncoder>::new(4, 1000).with_clock(clock);

    store_one(&store, 1500)?;
    store_one(&store, 1200)?;
    store_one(&store, 1700)?;

    let count = store.fetch_count(1999, 2)?;
    let mut got = collect_timestamps(count.decoder_view(true));
    got.sort_unstable();
    assert_eq!(got, vec![1500, 1700]);

    Ok(())
}

/// A later write that lands in a slot whose previous occupant has aged out
/// of the live window re-initialises that slot from scratch.
#[test]
fn window_roll_over_reinitialises_stale_slot() -> Result<()> {
    let clock = Arc::new(FakeClock::new(999));
    let store = ChunkSet::<VecEncoder>::new(2, 1000).with_clock(Arc::clone(&clock));

    store_one(&store, 500)?;

    clock.set(2999);
    store_one(&store, 2500)?;

    let span = store.fetch_span(2999, 3000)?;
    let got = collect_timestamps(span.decoder_view(true));
    assert_eq!(got, vec![2500]);

    Ok(())
}

/// Negative timestamps map to distinct windows/slots from `0` and positive
/// timestamps straddling the origin, and both are retrievable together.
#[test]
fn negative_timestamps() -> Result<()> {
    use gts_chunk_store::time::{chunk_end, slot};

    assert_eq!(chunk_end(-1, 1000), -1);
    assert_eq!(chunk_end(0, 1000), 999);
    assert_ne!(slot(-1, 1000, 4), slot(0, 1000, 4));

    let clock = Arc::new(FakeClock::new(999));
    let store = ChunkSet::<VecEncoder>::new(4, 1000).with_clock(clock);

    store_many(&store, &[-500, 400])?;

    let span = store.fetch_span(999, 2000)?;
    let mut got = collect_timestamps(span.decoder_view(true));
    got.sort_unstable();
    assert_eq!(got, vec![-500, 400]);

    Ok(())
}

/// `clean` drops exactly the slots whose window has aged out of the live
/// range, reports the count to the metric sink, and is idempotent.
#[test]
fn eviction() -> Result<()> {
    use gts_chunk_store::CountingMetricSink;

    let clock = Arc::new(FakeClock::new(1999));
    let sink = Arc::new(CountingMetricSink::default());
    let store = ChunkSet::<VecEncoder>::new(2, 1000)
        .with_clock(Arc::clone(&clock))
        .with_metric_sink(Arc::clone(&sink));

    store_many(&store, &[500, 1500])?;
    assert_eq!(store.count(), 2);

    let dropped = store.clean(2999);
    assert_eq!(dropped, 1);
    assert_eq!(store.count(), 1);
    assert_eq!(sink.total_dropped(), 1);

    // Idempotent: nothing left to drop at the same cutoff.
    assert_eq!(store.clean(2999), 0);
    assert_eq!(sink.total_dropped(), 1);

    Ok(())
}

/// A count query spanning multiple slots visits the ring newest-slot-first,
/// draining each slot's contribution before moving to the next, without
/// globally sorting the result.
#[test]
fn count_query_spanning_slots() -> Result<()> {
    let clock = Arc::new(FakeClock::new(299));
    let store = ChunkSet::<VecEncoder>::new(3, 100).with_clock(clock);

    store_many(&store, &[0, 50, 100, 150, 200, 250])?;

    let count = store.fetch_count(299, 4)?;
    let got = collect_timestamps(count.decoder_view(true));
    assert_eq!(got, vec![200, 250, 100, 150]);

    Ok(())
}

/// `fetch_span` with a negative span delegates to `fetch_count`.
#[test]
fn negative_span_delegates_to_fetch_count() -> Result<()> {
    let clock = Arc::new(FakeClock::new(3999));
    let store = ChunkSet::<VecEncoder>::new(4, 1000).with_clock(clock);

    let tuples: Vec<i64> = (100..=3900).step_by(100).collect();
    store_many(&store, &tuples)?;

    let via_span = collect_timestamps(store.fetch_span(3999, -5)?.decoder_view(true));
    let via_count = collect_timestamps(store.fetch_count(3999, 5)?.decoder_view(true));
    assert_eq!(via_span, via_count);

    Ok(())
}
