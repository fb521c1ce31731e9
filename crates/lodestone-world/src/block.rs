/// The block types the world generator can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    #[default]
    Air,
    Dirt,
    Bedrock,
    GrassBlock,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [
        BlockKind::Air,
        BlockKind::Dirt,
        BlockKind::Bedrock,
        BlockKind::GrassBlock,
    ];

    /// Numeric block state ID on the wire (`block_id << 4 | metadata`).
    pub fn state_id(&self) -> u32 {
        match self {
            BlockKind::Air => 0,
            BlockKind::Dirt => 3 << 4,
            BlockKind::Bedrock => 7 << 4,
            BlockKind::GrassBlock => 2 << 4,
        }
    }

    pub fn is_air(&self) -> bool {
        matches!(self, BlockKind::Air)
    }
}
