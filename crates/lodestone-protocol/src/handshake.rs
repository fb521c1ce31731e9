use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::Result;

/// Handshake packet, the first packet of every connection.
#[derive(Debug, Clone, PartialEq)]
pub struct HandshakePacket {
    pub protocol_version: u64,
    pub server_address: String,
    pub server_port: u16,
    /// 1 for status, 2 for login.
    pub next_state: u64,
}

impl Packet for HandshakePacket {
    fn packet_id() -> u64 {
        0x00
    }
}

impl ReadPacket for HandshakePacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(HandshakePacket {
            protocol_version: buffer.read_varint()?,
            server_address: buffer.read_string()?,
            server_port: buffer.read_u16()?,
            next_state: buffer.read_varint()?,
        })
    }
}

impl WritePacket for HandshakePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_varint(self.protocol_version);
        buffer.write_string(&self.server_address);
        buffer.write_u16(self.server_port);
        buffer.write_varint(self.next_state);
    }
}
