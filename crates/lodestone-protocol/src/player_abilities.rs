use crate::buffer::PacketBuffer;
use crate::packet::{Packet, WritePacket};

/// Player Abilities (clientbound).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerAbilitiesPacket {
    pub flags: u8,
    pub flying_speed: f32,
    pub field_of_view_modifier: f32,
}

impl PlayerAbilitiesPacket {
    pub const INVULNERABLE: u8 = 0x01;
    pub const FLYING: u8 = 0x02;
    pub const ALLOW_FLYING: u8 = 0x04;
    pub const CREATIVE: u8 = 0x08;

    /// Default flying speed of a creative player.
    pub const FLYING_SPEED: f32 = 0.05;

    /// Flight enabled and active, creative mode.
    pub fn flight() -> Self {
        Self {
            flags: Self::FLYING | Self::ALLOW_FLYING | Self::CREATIVE,
            flying_speed: Self::FLYING_SPEED,
            field_of_view_modifier: 0.1,
        }
    }
}

impl Packet for PlayerAbilitiesPacket {
    fn packet_id() -> u64 {
        0x2C
    }
}

impl WritePacket for PlayerAbilitiesPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_u8(self.flags);
        buffer.write_f32(self.flying_speed);
        buffer.write_f32(self.field_of_view_modifier);
    }
}
