//! Renderer collaborator boundary.
//!
//! The streaming core never draws anything itself; it hands resident chunks
//! to a [`ChunkRenderer`] and asks it to present frames. The crate ships a
//! display-less implementation so the full loop can run headless.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::core::chunk::{ChunkCoord, ChunkData};

pub trait ChunkRenderer {
    /// Makes a chunk drawable. Only called once the chunk's data exists; a
    /// coordinate is never registered twice without an unregister in between.
    fn register_chunk(&mut self, coord: ChunkCoord, chunk: &ChunkData);

    /// Removes a chunk from the drawable set. Always precedes the chunk's
    /// eviction from the store.
    fn unregister_chunk(&mut self, coord: ChunkCoord);

    /// Advances renderer-internal animation/interpolation state.
    fn advance(&mut self, dt: f32);

    /// Presents one frame.
    fn present_frame(&mut self);
}

/// Renderer without a display: tracks the registered set and counts frames.
/// Used by the demo binary and as a stand-in wherever no surface exists.
#[derive(Default)]
pub struct HeadlessRenderer {
    registered: FxHashSet<ChunkCoord>,
    frames: u64,
    clock: f32,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl ChunkRenderer for HeadlessRenderer {
    fn register_chunk(&mut self, coord: ChunkCoord, chunk: &ChunkData) {
        debug!(
            chunk = %coord,
            surface = chunk.max_surface,
            "registered chunk"
        );
        self.registered.insert(coord);
    }

    fn unregister_chunk(&mut self, coord: ChunkCoord) {
        debug!(chunk = %coord, "unregistered chunk");
        self.registered.remove(&coord);
    }

    fn advance(&mut self, dt: f32) {
        self.clock += dt;
    }

    fn present_frame(&mut self) {
        self.frames += 1;
        trace!(frame = self.frames, clock = self.clock, "presented frame");
    }
}
