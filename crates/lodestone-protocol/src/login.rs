use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::{LodestoneError, Result};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStartPacket {
    pub username: String,
}

impl Packet for LoginStartPacket {
    fn packet_id() -> u64 {
        0x00
    }
}

impl ReadPacket for LoginStartPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(LoginStartPacket {
            username: buffer.read_string()?,
        })
    }
}

impl WritePacket for LoginStartPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_string(&self.username);
    }
}

/// Login Success. This protocol version sends the UUID as hyphenated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccessPacket {
    pub uuid: Uuid,
    pub username: String,
}

impl LoginSuccessPacket {
    pub fn new(uuid: Uuid, username: String) -> Self {
        LoginSuccessPacket { uuid, username }
    }
}

impl Packet for LoginSuccessPacket {
    fn packet_id() -> u64 {
        0x02
    }
}

impl ReadPacket for LoginSuccessPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        let uuid = buffer.read_string()?;
        let uuid = Uuid::parse_str(&uuid)
            .map_err(|err| LodestoneError::HandlerFailure(format!("bad uuid {}: {}", uuid, err)))?;
        Ok(LoginSuccessPacket {
            uuid,
            username: buffer.read_string()?,
        })
    }
}

impl WritePacket for LoginSuccessPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_string(&self.uuid.hyphenated().to_string());
        buffer.write_string(&self.username);
    }
}
