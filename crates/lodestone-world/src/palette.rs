use crate::block::BlockKind;
use lodestone_common::{LodestoneError, Result};

/// Ordered list of block kinds for one section. A block's position in the
/// list is the value packed for it in the section's data array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    bits_per_block: u8,
    entries: Vec<BlockKind>,
}

impl Palette {
    pub fn new(bits_per_block: u8) -> Self {
        Self {
            bits_per_block,
            entries: Vec::new(),
        }
    }

    /// Builds a palette with a fixed entry order.
    pub fn with_entries(bits_per_block: u8, entries: &[BlockKind]) -> Result<Self> {
        let mut palette = Self::new(bits_per_block);
        for &kind in entries {
            palette.register(kind)?;
        }
        Ok(palette)
    }

    pub fn bits_per_block(&self) -> u8 {
        self.bits_per_block
    }

    pub fn capacity(&self) -> usize {
        1 << self.bits_per_block
    }

    /// Returns the index of `kind`, appending it if it is not present yet.
    pub fn register(&mut self, kind: BlockKind) -> Result<u8> {
        if let Some(index) = self.index_of(kind) {
            return Ok(index);
        }
        if self.entries.len() >= self.capacity() {
            return Err(LodestoneError::PaletteFull {
                capacity: self.capacity(),
            });
        }
        self.entries.push(kind);
        Ok((self.entries.len() - 1) as u8)
    }

    pub fn index_of(&self, kind: BlockKind) -> Option<u8> {
        self.entries
            .iter()
            .position(|&entry| entry == kind)
            .map(|index| index as u8)
    }

    pub fn get(&self, index: u8) -> Option<BlockKind> {
        self.entries.get(index as usize).copied()
    }

    pub fn entries(&self) -> &[BlockKind] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire IDs in palette order.
    pub fn state_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(BlockKind::state_id)
    }
}
