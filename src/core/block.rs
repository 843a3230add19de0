use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    Air,
    Bedrock,
    Blackstone,
    Basalt,
    Deepslate,
    Stone,
    Dirt,
    Grass,
}

impl BlockType {
    /// Numeric state id used at the renderer boundary. Ids follow the "1.18"
    /// block-state palette revision.
    pub fn state_id(&self) -> u16 {
        match self {
            BlockType::Air => 0,
            BlockType::Bedrock => 33,
            BlockType::Blackstone => 16093,
            BlockType::Basalt => 20336,
            BlockType::Deepslate => 18683,
            BlockType::Stone => 1,
            BlockType::Dirt => 10,
            BlockType::Grass => 9,
        }
    }

    pub fn from_state_id(id: u16) -> Option<BlockType> {
        match id {
            0 => Some(BlockType::Air),
            33 => Some(BlockType::Bedrock),
            16093 => Some(BlockType::Blackstone),
            20336 => Some(BlockType::Basalt),
            18683 => Some(BlockType::Deepslate),
            1 => Some(BlockType::Stone),
            10 => Some(BlockType::Dirt),
            9 => Some(BlockType::Grass),
            _ => None,
        }
    }

    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockType::Air)
    }
}
