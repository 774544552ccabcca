use crate::codec::Encoder;
use crate::store::ChunkSet;

/// A point-in-time snapshot of a [`ChunkSet`]'s occupancy, cheap enough to
/// compute on a polling interval.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSetStats {
    pub populated_chunks: u32,
    pub total_datapoints: u64,
    pub total_size_bytes: u64,
}

impl<E: Encoder> ChunkSet<E> {
    /// The total number of datapoints stored across all populated slots.
    ///
    /// Does not hold the ring mutex for the full duration: the encoder
    /// handles are cloned out under the lock, then summed lock-free, so the
    /// result is a point-in-time approximation under concurrent writes.
    pub fn count(&self) -> u64 {
        self.snapshot_encoders().iter().map(|e| e.count()).sum()
    }

    /// The total encoder size, in bytes, across all populated slots.
    pub fn size(&self) -> u64 {
        self.snapshot_encoders().iter().map(|e| e.size()).sum()
    }

    /// Bundles [`Self::count`], [`Self::size`], and the populated slot count
    /// into a single snapshot.
    pub fn stats(&self) -> ChunkSetStats {
        let encoders = self.snapshot_encoders();
        ChunkSetStats {
            populated_chunks: encoders.len() as u32,
            total_datapoints: encoders.iter().map(|e| e.count()).sum(),
            total_size_bytes: encoders.iter().map(|e| e.size()).sum(),
        }
    }

    fn snapshot_encoders(&self) -> Vec<std::sync::Arc<E>> {
        self.ring.lock().chunks.iter().flatten().cloned().collect()
    }
}
