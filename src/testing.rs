//! A minimal in-memory [`Encoder`]/[`Decoder`] pair used to exercise the
//! [`crate::ChunkSet`] end-to-end without a real wire-format codec.
//!
//! This is test tooling, not a recommended production codec: no
//! compression, and `decoder_view` always returns an owned copy regardless
//! of the `copy` flag, sidestepping the zero-copy-during-append race
//! discussed in the crate's design notes.

use parking_lot::RwLock;

use crate::codec::{CodecError, Decoder, Elevation, Encoder, Location, Value};

type Tuple = (i64, Location, Elevation, Value);

#[derive(Debug, Default)]
pub struct VecEncoder {
    buf: RwLock<Vec<Tuple>>,
}

impl VecEncoder {
    /// Builds an encoder pre-populated with `tuples`, in the given order —
    /// handy for constructing out-of-order test fixtures.
    pub fn from_tuples(tuples: impl IntoIterator<Item = Tuple>) -> Self {
        Self {
            buf: RwLock::new(tuples.into_iter().collect()),
        }
    }
}

impl Encoder for VecEncoder {
    type Decoder = VecDecoder;

    fn new(_base_timestamp: i64) -> Self {
        Self::default()
    }

    fn append(
        &self,
        ts: i64,
        location: Location,
        elevation: Elevation,
        value: Value,
    ) -> Result<(), CodecError> {
        self.buf.write().push((ts, location, elevation, value));
        Ok(())
    }

    fn count(&self) -> u64 {
        self.buf.read().len() as u64
    }

    fn size(&self) -> u64 {
        (self.buf.read().len() * std::mem::size_of::<Tuple>()) as u64
    }

    fn decoder_view(&self, _copy: bool) -> VecDecoder {
        VecDecoder {
            data: self.buf.read().clone(),
            pos: None,
        }
    }
}

pub struct VecDecoder {
    data: Vec<Tuple>,
    pos: Option<usize>,
}

impl Decoder for VecDecoder {
    fn advance(&mut self) -> bool {
        let next = match self.pos {
            None => 0,
            Some(p) => p + 1,
        };
        if next < self.data.len() {
            self.pos = Some(next);
            true
        } else {
            false
        }
    }

    fn timestamp(&self) -> i64 {
        self.data[self.current()].0
    }

    fn location(&self) -> Location {
        self.data[self.current()].1
    }

    fn elevation(&self) -> Elevation {
        self.data[self.current()].2
    }

    fn value(&self) -> Value {
        self.data[self.current()].3
    }

    fn count(&self) -> u64 {
        self.data.len() as u64
    }
}

impl VecDecoder {
    fn current(&self) -> usize {
        self.pos.expect("timestamp()/location()/elevation()/value() called before advance()")
    }
}

/// Drains every remaining tuple from `decoder`'s current position, mostly
/// useful for asserting on the full contents of a `fetch_*` result in tests.
pub fn collect_timestamps<D: Decoder>(mut decoder: D) -> Vec<i64> {
    let mut out = Vec::new();
    while decoder.advance() {
        out.push(decoder.timestamp());
    }
    out
}
