//! Serverbound movement packets sent during play.

use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::Result;

/// Acknowledges a clientbound position and look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportConfirmPacket {
    pub teleport_id: u64,
}

impl Packet for TeleportConfirmPacket {
    fn packet_id() -> u64 {
        0x00
    }
}

impl ReadPacket for TeleportConfirmPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            teleport_id: buffer.read_varint()?,
        })
    }
}

impl WritePacket for TeleportConfirmPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_varint(self.teleport_id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPositionPacket {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub on_ground: bool,
}

impl Packet for PlayerPositionPacket {
    fn packet_id() -> u64 {
        0x0D
    }
}

impl ReadPacket for PlayerPositionPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            x: buffer.read_f64()?,
            y: buffer.read_f64()?,
            z: buffer.read_f64()?,
            on_ground: buffer.read_bool()?,
        })
    }
}

impl WritePacket for PlayerPositionPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_f64(self.x);
        buffer.write_f64(self.y);
        buffer.write_f64(self.z);
        buffer.write_bool(self.on_ground);
    }
}

/// Combination of position and look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPositionRotationPacket {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl Packet for PlayerPositionRotationPacket {
    fn packet_id() -> u64 {
        0x0E
    }
}

impl ReadPacket for PlayerPositionRotationPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            x: buffer.read_f64()?,
            y: buffer.read_f64()?,
            z: buffer.read_f64()?,
            yaw: buffer.read_f32()?,
            pitch: buffer.read_f32()?,
            on_ground: buffer.read_bool()?,
        })
    }
}

impl WritePacket for PlayerPositionRotationPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_f64(self.x);
        buffer.write_f64(self.y);
        buffer.write_f64(self.z);
        buffer.write_f32(self.yaw);
        buffer.write_f32(self.pitch);
        buffer.write_bool(self.on_ground);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerLookPacket {
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl Packet for PlayerLookPacket {
    fn packet_id() -> u64 {
        0x0F
    }
}

impl ReadPacket for PlayerLookPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            yaw: buffer.read_f32()?,
            pitch: buffer.read_f32()?,
            on_ground: buffer.read_bool()?,
        })
    }
}

impl WritePacket for PlayerLookPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_f32(self.yaw);
        buffer.write_f32(self.pitch);
        buffer.write_bool(self.on_ground);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use lodestone_common::LodestoneError;

    #[test]
    fn test_position_rotation_layout() {
        let packet = PlayerPositionRotationPacket {
            x: 8.5,
            y: 4.0,
            z: -2.25,
            yaw: 45.0,
            pitch: -10.0,
            on_ground: true,
        };
        let outbound = packet.to_outbound();
        assert_eq!(outbound.payload().len(), 33);
        let mut buffer = PacketBuffer::from_bytes(outbound.payload().to_vec());
        assert_eq!(
            PlayerPositionRotationPacket::read_from_buffer(&mut buffer).unwrap(),
            packet
        );
    }

    #[test]
    fn test_truncated_position() {
        let mut buffer = PacketBuffer::from_bytes(vec![0; 20]);
        assert_matches!(
            PlayerPositionPacket::read_from_buffer(&mut buffer),
            Err(LodestoneError::ShortPayload { .. })
        );
    }
}
