use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::{Position, Result, Rotation};

/// Player Position And Look (clientbound)
/// Updates the player's position on the server. This packet will also close the "Downloading Terrain" screen when joining/respawning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPositionAndLook {
    /// Absolute or relative position, depending on Flags
    pub x: f64,
    /// Absolute or relative position, depending on Flags
    pub y: f64,
    /// Absolute or relative position, depending on Flags
    pub z: f64,
    /// Absolute or relative rotation on the X axis, in degrees
    pub yaw: f32,
    /// Absolute or relative rotation on the Y axis, in degrees
    pub pitch: f32,
    /// Bit field for relative/absolute positions and rotations
    pub flags: u8,
    /// Teleport ID for client confirmation
    pub teleport_id: u64,
}

impl Packet for PlayerPositionAndLook {
    fn packet_id() -> u64 {
        0x2F
    }
}

impl WritePacket for PlayerPositionAndLook {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_f64(self.x);
        buffer.write_f64(self.y);
        buffer.write_f64(self.z);
        buffer.write_f32(self.yaw);
        buffer.write_f32(self.pitch);
        buffer.write_u8(self.flags);
        buffer.write_varint(self.teleport_id);
    }
}

impl ReadPacket for PlayerPositionAndLook {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            x: buffer.read_f64()?,
            y: buffer.read_f64()?,
            z: buffer.read_f64()?,
            yaw: buffer.read_f32()?,
            pitch: buffer.read_f32()?,
            flags: buffer.read_u8()?,
            teleport_id: buffer.read_varint()?,
        })
    }
}

impl PlayerPositionAndLook {
    /// Absolute teleport to `position` facing `rotation`.
    pub fn absolute(position: Position, rotation: Rotation, teleport_id: u64) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            yaw: rotation.yaw,
            pitch: rotation.pitch,
            flags: 0,
            teleport_id,
        }
    }
}
