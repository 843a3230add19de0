//! Windowed chunk streaming around a tracked center.
//!
//! The window keeps the resident set equal to the Chebyshev ball of radius
//! `view_distance` around the chunk containing the tracked position. Loads
//! register with the renderer only after the chunk's data exists; unloads
//! unregister before evicting, so the renderer is never asked to draw a
//! coordinate without backing data.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::constants::*;
use crate::core::chunk::ChunkCoord;
use crate::render::ChunkRenderer;
use crate::world::generator::GenerationConfig;
use crate::world::loader::{ChunkPreloader, PreloadResult};
use crate::world::provider::ChunkProvider;

pub struct StreamWindow {
    provider: Arc<ChunkProvider>,
    config: Arc<GenerationConfig>,
    resident: FxHashSet<ChunkCoord>,
    center: Option<ChunkCoord>,
}

impl StreamWindow {
    pub fn new(provider: Arc<ChunkProvider>, config: Arc<GenerationConfig>) -> Self {
        StreamWindow {
            provider,
            config,
            resident: FxHashSet::default(),
            center: None,
        }
    }

    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.resident.contains(&coord)
    }

    pub fn resident(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.resident.iter().copied()
    }

    fn target_set(&self, center: ChunkCoord) -> FxHashSet<ChunkCoord> {
        let radius = self.config.view_distance as i32;
        let mut target =
            FxHashSet::with_capacity_and_hasher(((2 * radius + 1).pow(2)) as usize, Default::default());
        for x in (center.x - radius)..=(center.x + radius) {
            for z in (center.z - radius)..=(center.z + radius) {
                target.insert(ChunkCoord::new(x, z));
            }
        }
        target
    }

    /// One-time initial load. Generates the starting target set on the
    /// preloader's worker pool, then registers every chunk nearest-first.
    /// Returns only once the full starting resident set is loaded; this is
    /// the render loop's startup barrier.
    pub fn init(&mut self, pos: Vec3, renderer: &mut dyn ChunkRenderer) {
        assert!(self.center.is_none(), "stream window already initialized");
        let center = ChunkCoord::containing(pos);
        let target = self.target_set(center);

        let mut preloader = ChunkPreloader::new(self.provider.generator());
        let mut to_generate: Vec<ChunkCoord> = target
            .iter()
            .copied()
            .filter(|&coord| !self.provider.contains(coord))
            .collect();
        to_generate.sort_by_key(|coord| coord.distance_sq(center));
        for &coord in &to_generate {
            preloader.request(coord);
        }

        let timeout = Duration::from_secs(PRELOAD_DRAIN_TIMEOUT_SECS);
        while preloader.pending_count() > 0 {
            match preloader.recv_timeout(timeout) {
                Some(PreloadResult {
                    coord,
                    chunk: Ok(chunk),
                }) => {
                    if !target.contains(&coord) {
                        debug!(chunk = %coord, "discarding superseded preload result");
                        continue;
                    }
                    self.provider.install(coord, chunk);
                }
                Some(PreloadResult {
                    coord,
                    chunk: Err(err),
                }) => {
                    warn!(chunk = %coord, error = %err, "chunk generation failed during preload");
                }
                None => {
                    warn!(
                        outstanding = preloader.pending_count(),
                        "preload drain timed out"
                    );
                    break;
                }
            }
        }

        let mut ordered: Vec<ChunkCoord> = target.iter().copied().collect();
        ordered.sort_by_key(|coord| coord.distance_sq(center));
        for coord in ordered {
            match self.provider.ensure_loaded(coord) {
                Ok(chunk) => {
                    renderer.register_chunk(coord, &chunk);
                }
                Err(err) => {
                    warn!(chunk = %coord, error = %err, "chunk unavailable, excluded from resident set");
                    continue;
                }
            }
            self.resident.insert(coord);
        }

        self.center = Some(center);
        info!(
            center = %center,
            resident = self.resident.len(),
            workers = preloader.worker_count(),
            "initial chunk load complete"
        );
    }

    /// Re-targets the window at the chunk containing `pos`: loads every
    /// missing target chunk nearest-first and unloads everything that left
    /// the window. On return the resident set equals the target set, minus
    /// any coordinate whose generation failed (those are retried on the next
    /// call that still wants them).
    pub fn update_center(&mut self, pos: Vec3, renderer: &mut dyn ChunkRenderer) {
        if self.center.is_none() {
            self.init(pos, renderer);
            return;
        }

        let center = ChunkCoord::containing(pos);
        let target = self.target_set(center);

        let mut to_load: Vec<ChunkCoord> = target
            .iter()
            .copied()
            .filter(|coord| !self.resident.contains(coord))
            .collect();
        to_load.sort_by_key(|coord| coord.distance_sq(center));

        let to_unload: Vec<ChunkCoord> = self
            .resident
            .iter()
            .copied()
            .filter(|coord| !target.contains(coord))
            .collect();

        let loaded = to_load.len();
        let unloaded = to_unload.len();

        for coord in to_load {
            match self.provider.ensure_loaded(coord) {
                Ok(chunk) => {
                    renderer.register_chunk(coord, &chunk);
                }
                Err(err) => {
                    warn!(chunk = %coord, error = %err, "chunk unavailable, excluded from resident set");
                    continue;
                }
            }
            self.resident.insert(coord);
        }

        for coord in to_unload {
            renderer.unregister_chunk(coord);
            self.provider.evict(coord);
            self.resident.remove(&coord);
        }

        if self.center != Some(center) {
            debug!(center = %center, loaded, unloaded, "stream window re-targeted");
        }
        self.center = Some(center);
    }

    /// Tears the window down: every resident coordinate is unregistered and
    /// evicted, mirroring an unload of the full resident set.
    pub fn close(&mut self, renderer: &mut dyn ChunkRenderer) {
        for coord in self.resident.drain() {
            renderer.unregister_chunk(coord);
            self.provider.evict(coord);
        }
        self.center = None;
        info!("stream window closed");
    }
}
