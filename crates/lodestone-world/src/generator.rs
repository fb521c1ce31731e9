use crate::block::BlockKind;
use crate::palette::Palette;
use crate::section::{ChunkSection, SECTION_WIDTH};
use lodestone_common::Result;
use std::ops::RangeInclusive;

/// Bits used per packed block index. 4 bits leaves room for 16 palette entries.
pub const BITS_PER_BLOCK: u8 = 4;

/// Produces the single section of a chunk column.
pub trait WorldGenerator: Send + Sync {
    fn generate_section(&self, chunk_x: i32, chunk_z: i32) -> Result<ChunkSection>;
}

/// A flat world: the same layered column regardless of chunk coordinate.
#[derive(Debug, Clone)]
pub struct FlatGenerator {
    layers: Vec<(RangeInclusive<usize>, BlockKind)>,
}

impl FlatGenerator {
    /// Fixed palette order shared by every generated section.
    pub const PALETTE: [BlockKind; 4] = [
        BlockKind::Air,
        BlockKind::Dirt,
        BlockKind::Bedrock,
        BlockKind::GrassBlock,
    ];

    pub fn new(layers: Vec<(RangeInclusive<usize>, BlockKind)>) -> Self {
        Self { layers }
    }

    fn block_at(&self, y: usize) -> BlockKind {
        self.layers
            .iter()
            .find(|(range, _)| range.contains(&y))
            .map(|(_, kind)| *kind)
            .unwrap_or(BlockKind::Air)
    }
}

impl Default for FlatGenerator {
    /// Bedrock floor, two layers of dirt, grass on top.
    fn default() -> Self {
        Self::new(vec![
            (0..=0, BlockKind::Bedrock),
            (1..=2, BlockKind::Dirt),
            (3..=3, BlockKind::GrassBlock),
        ])
    }
}

impl WorldGenerator for FlatGenerator {
    fn generate_section(&self, _chunk_x: i32, _chunk_z: i32) -> Result<ChunkSection> {
        let palette = Palette::with_entries(BITS_PER_BLOCK, &Self::PALETTE)?;
        let mut section = ChunkSection::with_palette(palette)?;
        for y in 0..SECTION_WIDTH {
            let kind = self.block_at(y);
            if kind.is_air() {
                continue;
            }
            for z in 0..SECTION_WIDTH {
                for x in 0..SECTION_WIDTH {
                    section.set_block(x, y, z, kind)?;
                }
            }
        }
        Ok(section)
    }
}
