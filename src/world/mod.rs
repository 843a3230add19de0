//! World state: chunk generation, ownership, and streaming.

pub mod generator;
pub mod loader;
pub mod provider;
pub mod store;
pub mod window;

// Re-export commonly used types
pub use generator::{GenerationConfig, ShapeMode, TerrainGenerator, WorldGenerator};
pub use loader::{ChunkPreloader, PreloadResult};
pub use provider::ChunkProvider;
pub use store::ChunkStore;
pub use window::StreamWindow;

use std::sync::Arc;

use thiserror::Error;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::ChunkCoord;

#[derive(Debug, Error)]
pub enum WorldError {
    /// The generator could not produce data for a coordinate. The coordinate
    /// is left out of the resident set and retried on a later window update.
    #[error("chunk generation failed for chunk {0}")]
    GenerationFailure(ChunkCoord),

    /// A block position not covered by any resident chunk.
    #[error("no resident chunk contains block ({x}, {y}, {z})")]
    OutOfRange { x: i32, y: i32, z: i32 },
}

/// Block-level access over the resident chunks.
pub struct World {
    provider: Arc<ChunkProvider>,
}

impl World {
    pub fn new(provider: Arc<ChunkProvider>) -> Self {
        World { provider }
    }

    pub fn provider(&self) -> &Arc<ChunkProvider> {
        &self.provider
    }

    /// Block at a world position; `Air` outside the world or where no chunk
    /// is resident.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if y < 0 || y >= WORLD_HEIGHT {
            return BlockType::Air;
        }
        let coord = ChunkCoord::of_block(x, z);
        self.provider
            .read_chunk(coord, |chunk| {
                chunk.get_block(x.rem_euclid(CHUNK_SIZE), y, z.rem_euclid(CHUNK_SIZE))
            })
            .unwrap_or(BlockType::Air)
    }

    /// Sets one block's state. Fails with [`WorldError::OutOfRange`] when the
    /// position is outside the world's vertical range or no resident chunk
    /// contains it.
    pub fn set_block(&self, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), WorldError> {
        if y < 0 || y >= WORLD_HEIGHT {
            return Err(WorldError::OutOfRange { x, y, z });
        }
        let coord = ChunkCoord::of_block(x, z);
        self.provider
            .write_chunk(coord, |chunk| {
                chunk.set_block(x.rem_euclid(CHUNK_SIZE), y, z.rem_euclid(CHUNK_SIZE), block)
            })
            .ok_or(WorldError::OutOfRange { x, y, z })
    }
}

/// Single-block placement interop: a direct passthrough to the world's
/// chunk-level mutator. No batching, no validation beyond containment.
pub fn place(world: &World, x: i32, y: i32, z: i32, block: BlockType) -> Result<(), WorldError> {
    world.set_block(x, y, z, block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generator::{GenerationConfig, ShapeMode, TerrainGenerator};

    fn resident_world() -> World {
        let config = GenerationConfig::new(9, ShapeMode::VonNeumann, 1);
        let provider = Arc::new(ChunkProvider::new(Arc::new(TerrainGenerator::new(&config))));
        provider.ensure_loaded(ChunkCoord::new(0, 0)).unwrap();
        provider.ensure_loaded(ChunkCoord::new(-1, -1)).unwrap();
        World::new(provider)
    }

    #[test]
    fn place_on_non_resident_chunk_fails_unchanged() {
        let world = resident_world();
        // Chunk (2, 2) was never loaded.
        let err = place(&world, 40, 64, 40, BlockType::Stone).unwrap_err();
        assert!(matches!(err, WorldError::OutOfRange { x: 40, y: 64, z: 40 }));
        assert_eq!(world.get_block(40, 64, 40), BlockType::Air);
    }

    #[test]
    fn place_in_resident_chunk_sets_the_block() {
        let world = resident_world();
        // Well above the terrain surface, previously air.
        assert_eq!(world.get_block(3, 200, 7), BlockType::Air);
        place(&world, 3, 200, 7, BlockType::Stone).unwrap();
        assert_eq!(world.get_block(3, 200, 7), BlockType::Stone);
    }

    #[test]
    fn vertical_range_is_enforced() {
        let world = resident_world();
        assert!(place(&world, 0, -1, 0, BlockType::Stone).is_err());
        assert!(place(&world, 0, WORLD_HEIGHT, 0, BlockType::Stone).is_err());
    }

    #[test]
    fn negative_positions_map_into_their_chunk() {
        let world = resident_world();
        place(&world, -1, 200, -16, BlockType::Grass).unwrap();
        assert_eq!(world.get_block(-1, 200, -16), BlockType::Grass);
        // Same column read through chunk-local coordinates.
        let stored = world
            .provider()
            .read_chunk(ChunkCoord::new(-1, -1), |chunk| chunk.get_block(15, 200, 0))
            .unwrap();
        assert_eq!(stored, BlockType::Grass);
    }
}
