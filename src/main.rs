//! Headless world-streaming demo.
//!
//! Glides a viewpoint across the world at a constant velocity and streams
//! chunks around it for a fixed frame budget.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use glam::Vec3;
use tracing::{info, warn};

use strata::settings::{DEFAULT_SETTINGS_FILE, Settings, load_settings, save_settings};
use strata::{
    ChunkProvider, FreeCamera, Game, GenerationConfig, HeadlessRenderer, ShapeMode, StreamWindow,
    TerrainGenerator,
};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Headless voxel world streaming demo")]
struct Args {
    /// Settings file; missing files fall back to defaults
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_settings: bool,

    /// View distance in chunks
    #[arg(long)]
    view_distance: Option<u32>,

    /// World seed (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Slope-sampling connectivity rule
    #[arg(long, value_enum)]
    shape_mode: Option<ShapeMode>,

    /// Frames to run before exiting
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Frame rate of the demo loop
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut settings = if args.settings.exists() {
        match load_settings(&args.settings) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(error = %err, "could not read settings, using defaults");
                Settings::default()
            }
        }
    } else {
        Settings::default()
    };

    if let Some(view_distance) = args.view_distance {
        settings.view_distance = view_distance;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(shape_mode) = args.shape_mode {
        settings.shape_mode = shape_mode;
    }
    if args.save_settings {
        if let Err(err) = save_settings(&args.settings, &settings) {
            warn!(error = %err, "could not write settings");
        }
    }

    let seed = settings.seed.unwrap_or_else(rand::random);
    let config = Arc::new(GenerationConfig::new(
        seed,
        settings.shape_mode,
        settings.view_distance,
    ));
    info!(
        version = %settings.version,
        seed,
        view_distance = config.view_distance,
        shape_mode = ?config.shape_mode,
        "starting strata"
    );

    let provider = Arc::new(ChunkProvider::new(Arc::new(TerrainGenerator::new(&config))));
    let window = StreamWindow::new(Arc::clone(&provider), Arc::clone(&config));
    let controls = FreeCamera::new(Vec3::new(0.5, 100.0, 0.5), Vec3::new(6.0, 0.0, 0.0));

    let mut game = Game::new(window, HeadlessRenderer::new(), controls);
    game.run_frames(args.fps, args.frames);

    info!(
        frames = game.renderer().frames(),
        registered = game.renderer().registered_count(),
        resident = game.window().resident_count(),
        chunks = provider.chunk_count(),
        "run complete"
    );

    game.shutdown();
}
