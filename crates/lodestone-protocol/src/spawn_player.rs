use crate::buffer::PacketBuffer;
use crate::packet::{Packet, WritePacket};
use lodestone_common::{Position, Rotation};
use uuid::Uuid;

/// Marks the end of an entity metadata list.
const METADATA_END: u8 = 0xFF;

/// Spawn Player: makes another player entity visible to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlayerPacket {
    pub entity_id: u64,
    pub uuid: Uuid,
    pub position: Position,
    pub rotation: Rotation,
}

/// Converts degrees to the 1/256th-of-a-turn angle byte, wrapping whole turns.
pub fn angle_byte(degrees: f32) -> u8 {
    (degrees * 256.0 / 360.0).floor() as i64 as u8
}

impl Packet for SpawnPlayerPacket {
    fn packet_id() -> u64 {
        0x05
    }
}

impl WritePacket for SpawnPlayerPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_varint(self.entity_id);
        buffer.write_uuid(self.uuid);
        buffer.write_f64(self.position.x);
        buffer.write_f64(self.position.y);
        buffer.write_f64(self.position.z);
        buffer.write_u8(angle_byte(self.rotation.yaw));
        buffer.write_u8(angle_byte(self.rotation.pitch));
        buffer.write_u8(METADATA_END);
    }
}
