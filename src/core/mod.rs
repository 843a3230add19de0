//! Fundamental voxel types.

pub mod block;
pub mod chunk;

pub use block::BlockType;
pub use chunk::{ChunkCoord, ChunkData};
