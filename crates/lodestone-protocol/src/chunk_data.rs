//! Chunk Data packet and the single-section encoder behind it.
//!
//! Section layout, in order:
//! - bits per block (u8)
//! - palette length (VarInt) and each entry's block state ID (VarInt)
//! - data array length in 64-bit words (VarInt)
//! - packed block indices, `bits_per_block` bits each
//! - block light, one nibble per block
//! - sky light, one nibble per block
//! - biomes, one byte per column

use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::Result;
use lodestone_world::section::{ChunkSection, SECTION_VOLUME, SECTION_WIDTH};

/// Bytes in a nibble-per-block light array.
pub const LIGHT_ARRAY_LEN: usize = SECTION_VOLUME / 2;
/// Bytes in the per-column biome array.
pub const BIOME_ARRAY_LEN: usize = SECTION_WIDTH * SECTION_WIDTH;

const FULL_BRIGHTNESS: u8 = 0xFF;

/// Serializes one section into the chunk-data section format.
pub fn encode_section(section: &ChunkSection) -> Vec<u8> {
    let palette = section.palette();
    let bits_per_block = palette.bits_per_block();

    let mut buffer = PacketBuffer::new();
    buffer.write_u8(bits_per_block);

    buffer.write_varint(palette.len() as u64);
    for state_id in palette.state_ids() {
        buffer.write_varint(state_id as u64);
    }

    let data_words = SECTION_VOLUME * bits_per_block as usize / 64;
    buffer.write_varint(data_words as u64);
    buffer.write_bytes_raw(&section.packed_data());

    let light = [FULL_BRIGHTNESS; LIGHT_ARRAY_LEN];
    buffer.write_bytes_raw(&light); // block light
    buffer.write_bytes_raw(&light); // sky light, overworld only

    buffer.write_bytes_raw(&[0u8; BIOME_ARRAY_LEN]);

    buffer.buffer
}

/// Chunk Data for one column holding a single section at the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDataPacket {
    pub chunk_x: i32,
    pub chunk_z: i32,
    /// Whether this is a full column, including biomes.
    pub ground_up_continuous: bool,
    /// Bitmask of sections present in `data`.
    pub primary_bit_mask: u64,
    /// Encoded sections.
    pub data: Vec<u8>,
    /// Number of block entities that follow. Always zero here.
    pub block_entity_count: u64,
}

impl ChunkDataPacket {
    pub fn new(chunk_x: i32, chunk_z: i32, section: &ChunkSection) -> Self {
        Self {
            chunk_x,
            chunk_z,
            ground_up_continuous: true,
            primary_bit_mask: 0b1,
            data: encode_section(section),
            block_entity_count: 0,
        }
    }
}

impl Packet for ChunkDataPacket {
    fn packet_id() -> u64 {
        0x20
    }
}

impl WritePacket for ChunkDataPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_i32(self.chunk_x);
        buffer.write_i32(self.chunk_z);
        buffer.write_bool(self.ground_up_continuous);
        buffer.write_varint(self.primary_bit_mask);
        buffer.write_varint(self.data.len() as u64);
        buffer.write_bytes_raw(&self.data);
        buffer.write_varint(self.block_entity_count);
    }
}

impl ReadPacket for ChunkDataPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        let chunk_x = buffer.read_i32()?;
        let chunk_z = buffer.read_i32()?;
        let ground_up_continuous = buffer.read_bool()?;
        let primary_bit_mask = buffer.read_varint()?;
        let size = buffer.read_varint()? as usize;
        let data = buffer.read_bytes(size)?;
        Ok(Self {
            chunk_x,
            chunk_z,
            ground_up_continuous,
            primary_bit_mask,
            data,
            block_entity_count: buffer.read_varint()?,
        })
    }
}
