use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::world::generator::ShapeMode;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.bin";

/// Startup configuration, fixed for the lifetime of the process.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Block-state palette revision expected by the renderer collaborator.
    pub version: String,
    pub view_distance: u32,
    pub shape_mode: ShapeMode,
    /// World seed; a random seed is drawn at startup when absent.
    #[serde(default)]
    pub seed: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.18".to_string(),
            view_distance: DEFAULT_VIEW_DISTANCE,
            shape_mode: ShapeMode::default(),
            seed: None,
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> bincode::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, settings)?;
    Ok(())
}

pub fn load_settings(path: &Path) -> bincode::Result<Settings> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let settings = bincode::deserialize_from(&mut reader)?;
    Ok(settings)
}
