//! Layered-material terrain generation using FastNoiseLite.
//!
//! A chunk column is built from a warped fractal height field, a stack of
//! stratified rock layers whose thicknesses are sampled from per-stratum
//! noise, and a slope-eroded topsoil pass: the flatter the surface around a
//! column, the thicker the soil that survives on top of it. The neighborhood
//! used for the slope sample is selected by [`ShapeMode`].
//!
//! Generation is pure: the same `(coordinate, config)` pair always produces
//! bit-identical chunk data, so evicted chunks can be regenerated safely.

use std::time::Instant;

use clap::ValueEnum;
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{ChunkCoord, ChunkData};
use crate::world::WorldError;

/// Horizontal displacement applied to height-field samples, in blocks.
const WARP_STRENGTH: f32 = 10.0;

/// Neighbor-connectivity rule for the slope sample around a column.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, ValueEnum)]
pub enum ShapeMode {
    /// All eight surrounding columns.
    Moore,
    /// The four edge-adjacent columns.
    #[default]
    VonNeumann,
    /// The four diagonal columns.
    Diagonal,
}

impl ShapeMode {
    pub fn offsets(&self) -> &'static [(i32, i32)] {
        match self {
            ShapeMode::Moore => &[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ],
            ShapeMode::VonNeumann => &[(-1, 0), (0, -1), (0, 1), (1, 0)],
            ShapeMode::Diagonal => &[(-1, -1), (-1, 1), (1, -1), (1, 1)],
        }
    }
}

/// Immutable generation parameters, fixed at process start. Changing any of
/// them mid-session is not supported; construct a new config instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub seed: u32,
    pub shape_mode: ShapeMode,
    pub view_distance: u32,
}

impl GenerationConfig {
    pub fn new(seed: u32, shape_mode: ShapeMode, view_distance: u32) -> Self {
        GenerationConfig {
            seed,
            shape_mode,
            view_distance,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            seed: DEFAULT_SEED,
            shape_mode: ShapeMode::default(),
            view_distance: DEFAULT_VIEW_DISTANCE,
        }
    }
}

/// Describes how to produce chunk data for a coordinate.
///
/// # Purity
///
/// `generate` must be deterministic: the same coordinate must produce the
/// same chunk for the lifetime of the generator. The shipped
/// [`TerrainGenerator`] never fails; the error kind is reserved for future
/// generator variants.
pub trait WorldGenerator: Send + Sync {
    fn generate(&self, coord: ChunkCoord) -> Result<ChunkData, WorldError>;
}

/// One stratified rock layer. `depth` orders the stack bottom-up; the layer's
/// actual height per column is sampled from its own thickness noise.
struct Stratum {
    block: BlockType,
    depth: f32,
    thickness: f32,
    noise: FastNoiseLite,
}

impl Stratum {
    fn sample_thickness(&self, x: i32, z: i32) -> f32 {
        (self.noise.get_noise_2d(x as f32, z as f32) + 1.0) * self.thickness
    }
}

/// Soil deposited on top of the strata where the surface is flat enough.
/// `max_slope` is the tangent of the steepest angle the soil clings to.
struct Topsoil {
    block: BlockType,
    cap: Option<BlockType>,
    weight: u32,
    thickness: f32,
    max_slope: f32,
}

struct Layer {
    block: BlockType,
    cap: Option<BlockType>,
    height: f32,
}

pub struct TerrainGenerator {
    shape_mode: ShapeMode,
    height_noise: FastNoiseLite,
    warp_x: FastNoiseLite,
    warp_z: FastNoiseLite,
    strata: Vec<Stratum>,
    topsoils: Vec<Topsoil>,
}

impl TerrainGenerator {
    pub fn new(config: &GenerationConfig) -> Self {
        let seed = config.seed;

        let strata_table = [
            (BlockType::Bedrock, 0.0, 5.0, 10.0),
            (BlockType::Blackstone, 4.0, 20.0, 1.0),
            (BlockType::Basalt, 20.0, 20.0, 1.0),
            (BlockType::Deepslate, 40.0, 20.0, 1.0),
            (BlockType::Stone, 60.0, 20.0, 1.0),
        ];

        let mut strata: Vec<Stratum> = strata_table
            .iter()
            .enumerate()
            .map(|(idx, &(block, depth, thickness, roughness))| Stratum {
                block,
                depth,
                thickness,
                noise: Self::fbm_noise(
                    seed.wrapping_add(10 + idx as u32),
                    roughness / 128.0,
                    6,
                    0.5,
                ),
            })
            .collect();
        strata.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        let mut topsoils = vec![Topsoil {
            block: BlockType::Dirt,
            cap: Some(BlockType::Grass),
            weight: 100,
            thickness: 5.0,
            max_slope: 45.0f32.to_radians().tan(),
        }];
        topsoils.sort_by_key(|soil| std::cmp::Reverse(soil.weight));

        TerrainGenerator {
            shape_mode: config.shape_mode,
            height_noise: Self::fbm_noise(seed, 1.0 / 128.0, 8, 0.7),
            warp_x: Self::base_noise(seed.wrapping_add(1), 1.0 / 16.0),
            warp_z: Self::base_noise(seed.wrapping_add(2), 1.0 / 16.0),
            strata,
            topsoils,
        }
    }

    fn base_noise(seed: u32, frequency: f32) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(frequency));
        noise
    }

    fn fbm_noise(seed: u32, frequency: f32, octaves: i32, gain: f32) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(octaves));
        noise.set_fractal_lacunarity(Some(2.0));
        noise.set_fractal_gain(Some(gain));
        noise.set_frequency(Some(frequency));
        noise
    }

    /// Surface height of a column, memoized per generation call so the slope
    /// pass can re-sample neighbors cheaply.
    fn surface_height(&self, heights: &mut FxHashMap<(i32, i32), f32>, x: i32, z: i32) -> f32 {
        if let Some(&height) = heights.get(&(x, z)) {
            return height;
        }
        let fx = x as f32;
        let fz = z as f32;
        let wx = fx + self.warp_x.get_noise_2d(fx, fz) * WARP_STRENGTH;
        let wz = fz + self.warp_z.get_noise_2d(fx, fz) * WARP_STRENGTH;
        let n = self.height_noise.get_noise_2d(wx, wz);
        let height = (((n + 1.4) * 0.5).powi(4) * 60.0 + 40.0).clamp(1.0, (WORLD_HEIGHT - 1) as f32);
        heights.insert((x, z), height);
        height
    }

    /// Steepest height delta to a neighboring column, per the configured
    /// connectivity rule.
    fn slope(&self, heights: &mut FxHashMap<(i32, i32), f32>, x: i32, z: i32) -> f32 {
        let center = self.surface_height(heights, x, z);
        let mut steepest = 0.0f32;
        for &(dx, dz) in self.shape_mode.offsets() {
            let neighbor = self.surface_height(heights, x + dx, z + dz);
            steepest = steepest.max((neighbor - center).abs());
        }
        steepest
    }

    /// Builds the bottom-up layer stack for one column. Stratified layers fill
    /// the column to `total`; topsoil then displaces the top of the stack
    /// wherever the slope allows it, so the stack still sums to `total`.
    fn column_layers(
        &self,
        heights: &mut FxHashMap<(i32, i32), f32>,
        x: i32,
        z: i32,
        total: f32,
    ) -> Vec<Layer> {
        let mut layers = Vec::with_capacity(self.strata.len() + self.topsoils.len());
        let mut current = 0.0;
        for (idx, stratum) in self.strata.iter().enumerate() {
            let mut height = if idx == self.strata.len() - 1 {
                total - current
            } else {
                stratum.sample_thickness(x, z)
            };
            current += height;
            height -= (current - total).max(0.0);
            layers.push(Layer {
                block: stratum.block,
                cap: None,
                height,
            });
            if current >= total {
                break;
            }
        }

        let slope = self.slope(heights, x, z);
        let mut eroded = Vec::with_capacity(self.topsoils.len());
        let mut eroded_total = 0.0;
        for soil in &self.topsoils {
            let height = if slope <= soil.max_slope {
                (soil.max_slope - slope) / soil.max_slope * soil.thickness
            } else {
                0.0
            };
            eroded.push(Layer {
                block: soil.block,
                cap: soil.cap,
                height,
            });
            eroded_total += height;
        }

        // The topsoil sits inside the column, not on top of it: carve its
        // combined height out of the uppermost stratified layers.
        for layer in layers.iter_mut().rev() {
            eroded_total -= layer.height;
            if eroded_total >= 0.0 {
                layer.height = 0.0;
            } else {
                layer.height = -eroded_total;
                break;
            }
        }

        layers.extend(eroded);
        layers
    }
}

impl WorldGenerator for TerrainGenerator {
    fn generate(&self, coord: ChunkCoord) -> Result<ChunkData, WorldError> {
        let started = Instant::now();
        let mut chunk = ChunkData::new();
        let mut heights = FxHashMap::default();
        let (base_x, base_z) = coord.base();
        let mut min_surface = WORLD_HEIGHT;
        let mut max_surface = 0;

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let x = base_x + lx;
                let z = base_z + lz;
                let total = self.surface_height(&mut heights, x, z);
                let layers = self.column_layers(&mut heights, x, z, total);

                let surface = total as i32;
                let mut cursor = 0;
                let mut previous = 0;
                let mut bottom = 0.0f32;
                for y in 0..surface {
                    while cursor + 1 < layers.len() && y as f32 + 0.5 - bottom > layers[cursor].height
                    {
                        bottom += layers[cursor].height;
                        cursor += 1;
                    }
                    if previous != cursor {
                        if let Some(cap) = layers[previous].cap {
                            chunk.set_block(lx, y - 1, lz, cap);
                        }
                    }
                    chunk.set_block(lx, y, lz, layers[cursor].block);
                    previous = cursor;
                }
                if let Some(cap) = layers[previous].cap {
                    chunk.set_block(lx, surface, lz, cap);
                }

                min_surface = min_surface.min(surface);
                max_surface = max_surface.max(surface);
            }
        }

        chunk.min_surface = min_surface;
        chunk.max_surface = max_surface;

        debug!(chunk = %coord, elapsed = ?started.elapsed(), "generated chunk");
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GenerationConfig {
        GenerationConfig::new(DEFAULT_SEED, ShapeMode::VonNeumann, 2)
    }

    #[test]
    fn generation_is_deterministic() {
        let config = test_config();
        let generator = TerrainGenerator::new(&config);
        let coord = ChunkCoord::new(3, -7);

        let first = generator.generate(coord).unwrap();
        let second = generator.generate(coord).unwrap();
        assert_eq!(first, second);

        // A fresh generator over the same config must agree as well, so
        // regeneration after eviction reproduces the evicted chunk.
        let other = TerrainGenerator::new(&config);
        assert_eq!(other.generate(coord).unwrap(), first);
    }

    #[test]
    fn distinct_coordinates_differ() {
        let generator = TerrainGenerator::new(&test_config());
        let a = generator.generate(ChunkCoord::new(0, 0)).unwrap();
        let b = generator.generate(ChunkCoord::new(12, -4)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn generation_is_total_over_far_coordinates() {
        let generator = TerrainGenerator::new(&test_config());
        for coord in [
            ChunkCoord::new(-100_000, 99_999),
            ChunkCoord::new(1_000_000, -1_000_000),
        ] {
            let chunk = generator.generate(coord).unwrap();
            assert!(chunk.min_surface >= 1);
            assert!(chunk.max_surface < WORLD_HEIGHT);
            assert!(chunk.min_surface <= chunk.max_surface);
        }
    }

    #[test]
    fn columns_are_solid_below_surface_and_air_above() {
        let generator = TerrainGenerator::new(&test_config());
        let chunk = generator.generate(ChunkCoord::new(0, 0)).unwrap();
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                assert!(chunk.get_block(x, 0, z).is_solid(), "column base must be solid");
                for y in (chunk.max_surface + 1)..WORLD_HEIGHT {
                    assert_eq!(chunk.get_block(x, y, z), BlockType::Air);
                }
            }
        }
    }

    #[test]
    fn shape_mode_offsets_match_connectivity() {
        assert_eq!(ShapeMode::Moore.offsets().len(), 8);
        assert_eq!(ShapeMode::VonNeumann.offsets().len(), 4);
        assert_eq!(ShapeMode::Diagonal.offsets().len(), 4);
        assert!(
            ShapeMode::VonNeumann
                .offsets()
                .iter()
                .all(|&(dx, dz)| dx.abs() + dz.abs() == 1)
        );
        assert!(
            ShapeMode::Diagonal
                .offsets()
                .iter()
                .all(|&(dx, dz)| dx.abs() == 1 && dz.abs() == 1)
        );
    }

    #[test]
    fn seed_changes_the_terrain() {
        let a = TerrainGenerator::new(&GenerationConfig::new(1, ShapeMode::VonNeumann, 2));
        let b = TerrainGenerator::new(&GenerationConfig::new(2, ShapeMode::VonNeumann, 2));
        let coord = ChunkCoord::new(0, 0);
        assert_ne!(a.generate(coord).unwrap(), b.generate(coord).unwrap());
    }
}
