use crate::bits;
use crate::block::BlockKind;
use crate::palette::Palette;
use lodestone_common::Result;

/// Edge length of a section.
pub const SECTION_WIDTH: usize = 16;
/// Blocks in a section.
pub const SECTION_VOLUME: usize = SECTION_WIDTH * SECTION_WIDTH * SECTION_WIDTH;

/// Index of a block inside a section: `y << 8 | z << 4 | x`.
pub const fn block_index(x: usize, y: usize, z: usize) -> usize {
    (y << 8) | (z << 4) | x
}

/// A 16x16x16 block volume stored as palette indices.
#[derive(Debug, Clone)]
pub struct ChunkSection {
    palette: Palette,
    indices: Vec<u8>,
}

impl ChunkSection {
    /// An all-air section. Air is registered first so that index 0 is air.
    pub fn new(bits_per_block: u8) -> Result<Self> {
        Self::with_palette(Palette::with_entries(bits_per_block, &[BlockKind::Air])?)
    }

    /// A section whose palette starts with the given entries, in order.
    /// Every cell is filled with the palette's first entry.
    pub fn with_palette(palette: Palette) -> Result<Self> {
        let mut palette = palette;
        if palette.is_empty() {
            palette.register(BlockKind::Air)?;
        }
        Ok(Self {
            palette,
            indices: vec![0; SECTION_VOLUME],
        })
    }

    pub fn set_block(&mut self, x: usize, y: usize, z: usize, kind: BlockKind) -> Result<()> {
        let index = self.palette.register(kind)?;
        self.indices[block_index(x & 15, y & 15, z & 15)] = index;
        Ok(())
    }

    pub fn get_block(&self, x: usize, y: usize, z: usize) -> BlockKind {
        self.palette
            .get(self.palette_index(x, y, z))
            .unwrap_or_default()
    }

    pub fn palette_index(&self, x: usize, y: usize, z: usize) -> u8 {
        self.indices[block_index(x & 15, y & 15, z & 15)]
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of non-air blocks.
    pub fn block_count(&self) -> usize {
        self.indices
            .iter()
            .filter(|&&index| !self.palette.get(index).unwrap_or_default().is_air())
            .count()
    }

    /// Block indices packed at the palette's width.
    pub fn packed_data(&self) -> Vec<u8> {
        bits::pack(&self.indices, self.palette.bits_per_block())
    }
}
