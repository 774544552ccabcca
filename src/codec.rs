//! The codec interface the [`crate::ChunkSet`] consumes but never implements.
//!
//! The wire format — variable-length integer packing, value-type discrimination,
//! actual compression — lives entirely on the other side of this trait boundary,
//! in whatever collaborator the enclosing per-GTS storage map chooses to wire up.
//! See [`crate::testing`] for a minimal in-memory implementation used by this
//! crate's own tests.

use std::fmt;

/// An opaque geolocation, typically a packed geohash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location(pub u64);

/// An opaque elevation, typically a signed altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Elevation(pub i64);

/// An opaque, discriminated scalar measurement.
///
/// The [`crate::ChunkSet`] never inspects the payload of a [`Value`]; it only
/// ever moves one through from an input decoder to an output encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Long(i64),
    Double(f64),
    Boolean(bool),
}

/// The error surfaced when a codec fails to append or otherwise hits an
/// internal I/O problem.
///
/// `advance` on a [`Decoder`] is infallible by contract (it returns `bool`);
/// codecs that hit a read error are expected to behave as exhausted and
/// report the problem through their own side channel, since there is no
/// error path for a failed `advance`.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("codec append failed: {0}")]
    Append(String),
}

impl CodecError {
    pub fn append(msg: impl fmt::Display) -> Self {
        Self::Append(msg.to_string())
    }
}

/// An append-only, compressed buffer of `(timestamp, location, elevation, value)`
/// tuples.
///
/// Implementations must allow `append` to be called from multiple threads
/// concurrently on the same encoder and have those appends linearise (the
/// [`crate::ChunkSet`] ring mutex only ever protects the slot metadata, never
/// the append itself, see the crate's concurrency notes). A [`Decoder`]
/// obtained via [`Encoder::decoder_view`] while concurrent appends are
/// in flight must observe a consistent prefix of the buffer.
pub trait Encoder: Send + Sync + Sized {
    type Decoder: Decoder;

    /// Construct an empty encoder. `base_timestamp = 0` is the only value the
    /// chunk store ever passes.
    fn new(base_timestamp: i64) -> Self;

    /// Append one tuple. Fails only on an internal I/O problem.
    fn append(
        &self,
        ts: i64,
        location: Location,
        elevation: Elevation,
        value: Value,
    ) -> Result<(), CodecError>;

    /// Number of tuples appended so far.
    fn count(&self) -> u64;

    /// Current buffer size in bytes.
    fn size(&self) -> u64;

    /// Obtain a decoder over the encoder's current prefix.
    ///
    /// `copy = false` requests a zero-copy view sharing the buffer with the
    /// encoder, valid for as long as the encoder is not truncated. Codecs
    /// that cannot safely share their buffer while being appended to may
    /// always return an owned copy regardless of the flag.
    fn decoder_view(&self, copy: bool) -> Self::Decoder;
}

/// A forward-only cursor over an [`Encoder`]'s buffer.
pub trait Decoder {
    /// Move to the next tuple. Returns `false` once past the end.
    fn advance(&mut self) -> bool;

    fn timestamp(&self) -> i64;
    fn location(&self) -> Location;
    fn elevation(&self) -> Elevation;
    fn value(&self) -> Value;

    /// Total number of tuples in the underlying buffer, independent of the
    /// cursor's current position.
    fn count(&self) -> u64;
}
