//! Authoritative cache of generated chunks.

use rustc_hash::FxHashMap;

use crate::core::chunk::{ChunkCoord, ChunkData};

/// Owns every generated chunk, keyed by coordinate. An entry is created on
/// first generation and lives until the stream window evicts it.
#[derive(Default)]
pub struct ChunkStore {
    chunks: FxHashMap<ChunkCoord, ChunkData>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkData> {
        self.chunks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkData> {
        self.chunks.get_mut(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Installs a freshly generated chunk.
    ///
    /// # Panics
    ///
    /// Panics if an entry already exists: a coordinate is generated at most
    /// once between an insert and its eviction, so a duplicate insert is a
    /// programming error, not a recoverable condition.
    pub fn insert(&mut self, coord: ChunkCoord, data: ChunkData) {
        let previous = self.chunks.insert(coord, data);
        assert!(previous.is_none(), "duplicate chunk insert at {coord}");
    }

    /// Removes and returns the chunk at `coord`; no-op when absent.
    pub fn evict(&mut self, coord: ChunkCoord) -> Option<ChunkData> {
        self.chunks.remove(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_and_evict() {
        let mut store = ChunkStore::new();
        let coord = ChunkCoord::new(2, -3);
        assert!(store.get(coord).is_none());

        store.insert(coord, ChunkData::new());
        assert!(store.contains(coord));
        assert_eq!(store.len(), 1);

        assert!(store.evict(coord).is_some());
        assert!(store.is_empty());
        // Eviction of an absent coordinate is a safe no-op.
        assert!(store.evict(coord).is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate chunk insert")]
    fn duplicate_insert_is_fatal() {
        let mut store = ChunkStore::new();
        let coord = ChunkCoord::new(0, 0);
        store.insert(coord, ChunkData::new());
        store.insert(coord, ChunkData::new());
    }
}
