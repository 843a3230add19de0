//! Background chunk generation for the startup preload.
//!
//! A small pool of worker threads pulls coordinates off a crossbeam channel,
//! generates them, and sends the results back to the owning thread. The pool
//! is only used behind the startup barrier: per-tick streaming generates
//! inline, and the two disciplines never mix on the same path.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use rustc_hash::FxHashSet;

use crate::constants::*;
use crate::core::chunk::{ChunkCoord, ChunkData};
use crate::world::WorldError;
use crate::world::generator::WorldGenerator;

/// Outcome of one background generation. Failures are reported rather than
/// swallowed so the pending bookkeeping stays exact.
pub struct PreloadResult {
    pub coord: ChunkCoord,
    pub chunk: Result<ChunkData, WorldError>,
}

/// Worker pool generating chunks off the owning thread.
pub struct ChunkPreloader {
    request_tx: Sender<ChunkCoord>,
    result_rx: Receiver<PreloadResult>,
    pending: FxHashSet<ChunkCoord>,
    worker_count: usize,
}

impl ChunkPreloader {
    pub fn new(generator: Arc<dyn WorldGenerator>) -> Self {
        Self::with_worker_count(default_worker_count(), generator)
    }

    /// Create a preloader with a specific number of workers.
    pub fn with_worker_count(num_workers: usize, generator: Arc<dyn WorldGenerator>) -> Self {
        // Requests are unbounded: the startup barrier must never drop a
        // coordinate. The result channel stays bounded so workers pace
        // themselves against the draining thread.
        let (request_tx, request_rx) = unbounded::<ChunkCoord>();
        let (result_tx, result_rx) = bounded::<PreloadResult>(PRELOAD_RESULT_CAPACITY);

        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let generator = Arc::clone(&generator);

            thread::Builder::new()
                .name(format!("chunk-gen-{worker_id}"))
                .spawn(move || {
                    while let Ok(coord) = rx.recv() {
                        let result = PreloadResult {
                            coord,
                            chunk: generator.generate(coord),
                        };
                        if tx.send(result).is_err() {
                            // Owning thread has gone away.
                            break;
                        }
                    }
                })
                .expect("failed to spawn chunk generation worker");
        }

        ChunkPreloader {
            request_tx,
            result_rx,
            pending: FxHashSet::default(),
            worker_count: num_workers,
        }
    }

    /// Queue a coordinate for generation. A coordinate already pending is not
    /// requested a second time.
    pub fn request(&mut self, coord: ChunkCoord) {
        if !self.pending.insert(coord) {
            return;
        }
        let _ = self.request_tx.send(coord);
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Blocking receive of the next finished result. Returns `None` on
    /// timeout or when every worker has exited.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<PreloadResult> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => {
                self.pending.remove(&result.coord);
                Some(result)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(1).clamp(1, MAX_PRELOAD_WORKERS)
}
