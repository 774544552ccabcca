//! An in-memory rolling chunk store for a single geo time series.
//!
//! A [`ChunkSet`] owns a fixed-size ring of `chunk_count` slots, each
//! covering `chunk_length` ticks of the timeline, for a total live window of
//! `chunk_count * chunk_length` ticks. Incoming datapoints are bucketed by
//! timestamp into a slot (see [`time::slot`]), appended to that slot's
//! [`codec::Encoder`], and aged out a whole slot at a time once the window
//! moves past them.
//!
//! * See [`ChunkSet::store`] for the write path.
//! * See [`ChunkSet::fetch_span`] and [`ChunkSet::fetch_count`] for the two
//!   bounded read paths.
//! * See [`codec`] for the encoder/decoder trait boundary this crate
//!   consumes but does not implement (beyond the [`testing`] reference
//!   codec).

mod clock;
mod codec;
mod metrics;
mod store;
mod store_gc;
mod store_read;
mod store_stats;
mod store_write;
pub mod time;

#[doc(hidden)]
pub mod testing;

pub use self::clock::{Clock, SystemClock};
pub use self::codec::{CodecError, Decoder, Elevation, Encoder, Location, Value};
pub use self::metrics::{CountingMetricSink, MetricSink, NoopMetricSink};
pub use self::store::ChunkSet;
pub use self::store_stats::ChunkSetStats;
