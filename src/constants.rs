// World constants
pub const WORLD_HEIGHT: i32 = 256;
pub const CHUNK_SIZE: i32 = 16;
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * WORLD_HEIGHT * CHUNK_SIZE) as usize;
pub const DEFAULT_VIEW_DISTANCE: u32 = 10;
pub const DEFAULT_SEED: u32 = 2147;

// Streaming constants
pub const PRELOAD_RESULT_CAPACITY: usize = 64;
pub const PRELOAD_DRAIN_TIMEOUT_SECS: u64 = 30;
pub const MAX_PRELOAD_WORKERS: usize = 8;
