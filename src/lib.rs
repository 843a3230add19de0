//! Infinite voxel world streaming.
//!
//! Chunks are generated lazily by a deterministic layered-material terrain
//! generator, owned by a chunk store behind a provider that guarantees one
//! generation per coordinate, and kept resident in a window around a tracked
//! viewpoint. A cooperative render/update loop ties streaming to a renderer
//! collaborator one frame at a time.

// Core module with fundamental types
pub mod core;

// Player module with the camera-control boundary
pub mod player;

// Render module with the renderer-collaborator boundary
pub mod render;

// World module with generation, ownership, and streaming
pub mod world;

// Other modules
pub mod constants;
pub mod game;
pub mod settings;

// Re-exports
pub use constants::*;
pub use self::core::{BlockType, ChunkCoord, ChunkData};
pub use game::{FrameClock, Game};
pub use player::{CameraControls, FreeCamera};
pub use render::{ChunkRenderer, HeadlessRenderer};
pub use settings::{DEFAULT_SETTINGS_FILE, Settings, load_settings, save_settings};
pub use world::{
    ChunkPreloader, ChunkProvider, ChunkStore, GenerationConfig, ShapeMode, StreamWindow,
    TerrainGenerator, World, WorldError, WorldGenerator, place,
};
