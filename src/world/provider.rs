//! On-demand chunk acquisition in front of the store.
//!
//! Every chunk enters the store through the provider: `ensure_loaded` is the
//! inline path, `install` is the completion half used by the startup
//! preloader. Holding the store lock across generation is what serializes
//! concurrent `ensure_loaded` calls for the same coordinate: the first
//! caller generates, everyone else observes the cache hit.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::sync::Arc;
use tracing::debug;

use crate::core::chunk::{ChunkCoord, ChunkData};
use crate::world::WorldError;
use crate::world::generator::WorldGenerator;
use crate::world::store::ChunkStore;

pub struct ChunkProvider {
    store: Mutex<ChunkStore>,
    generator: Arc<dyn WorldGenerator>,
}

impl ChunkProvider {
    pub fn new(generator: Arc<dyn WorldGenerator>) -> Self {
        ChunkProvider {
            store: Mutex::new(ChunkStore::new()),
            generator,
        }
    }

    pub fn generator(&self) -> Arc<dyn WorldGenerator> {
        Arc::clone(&self.generator)
    }

    /// Returns a handle to the chunk at `coord`, generating and installing it
    /// first on a store miss. Repeated or concurrent calls for the same
    /// coordinate trigger at most one generation.
    pub fn ensure_loaded(
        &self,
        coord: ChunkCoord,
    ) -> Result<MappedMutexGuard<'_, ChunkData>, WorldError> {
        let mut store = self.store.lock();
        if !store.contains(coord) {
            let data = self.generator.generate(coord)?;
            store.insert(coord, data);
        }
        Ok(MutexGuard::map(store, |store| {
            store.get_mut(coord).expect("chunk installed above")
        }))
    }

    /// Installs a chunk generated off-thread. Returns `false` when the
    /// coordinate is already resident; the superseded result is discarded
    /// rather than double-inserted.
    pub fn install(&self, coord: ChunkCoord, data: ChunkData) -> bool {
        let mut store = self.store.lock();
        if store.contains(coord) {
            debug!(chunk = %coord, "discarding chunk result for resident coordinate");
            return false;
        }
        store.insert(coord, data);
        true
    }

    /// Releases the chunk at `coord`, returning its data for teardown.
    pub fn evict(&self, coord: ChunkCoord) -> Option<ChunkData> {
        self.store.lock().evict(coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.store.lock().contains(coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.store.lock().len()
    }

    /// Runs `f` against the chunk at `coord`, if resident.
    pub fn read_chunk<T>(&self, coord: ChunkCoord, f: impl FnOnce(&ChunkData) -> T) -> Option<T> {
        self.store.lock().get(coord).map(f)
    }

    /// Runs `f` against the chunk at `coord` mutably, if resident.
    pub fn write_chunk<T>(
        &self,
        coord: ChunkCoord,
        f: impl FnOnce(&mut ChunkData) -> T,
    ) -> Option<T> {
        self.store.lock().get_mut(coord).map(f)
    }
}
