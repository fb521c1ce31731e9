use crate::buffer::PacketBuffer;
use crate::packet::{Packet, WritePacket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gamemode {
    Survival = 0,
    Creative = 1,
    Adventure = 2,
    Spectator = 3,
}

pub struct JoinGamePacket {
    pub entity_id: i32,
    pub gamemode: Gamemode,
    /// -1 nether, 0 overworld, 1 end
    pub dimension: i32,
    pub difficulty: u8,
    /// Ignored by the client
    pub max_players: u8,
    pub level_type: String,
    pub reduced_debug_info: bool,
}

impl JoinGamePacket {
    /// Creative mode in the overworld of a flat "default" level.
    pub fn new(entity_id: i32, max_players: u8) -> Self {
        Self {
            entity_id,
            gamemode: Gamemode::Creative,
            dimension: 0,
            difficulty: 0,
            max_players,
            level_type: "default".to_owned(),
            reduced_debug_info: true,
        }
    }
}

impl Packet for JoinGamePacket {
    fn packet_id() -> u64 {
        0x23
    }
}

impl WritePacket for JoinGamePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_i32(self.entity_id);
        buffer.write_u8(self.gamemode as u8);
        buffer.write_i32(self.dimension);
        buffer.write_u8(self.difficulty);
        buffer.write_u8(self.max_players);
        buffer.write_string(&self.level_type);
        buffer.write_bool(self.reduced_debug_info);
    }
}
