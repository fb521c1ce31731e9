use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::Result;

/// Status request, empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRequestPacket;

impl Packet for StatusRequestPacket {
    fn packet_id() -> u64 {
        0x00
    }
}

impl ReadPacket for StatusRequestPacket {
    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(StatusRequestPacket)
    }
}

impl WritePacket for StatusRequestPacket {
    fn write_to_buffer(&self, _buffer: &mut PacketBuffer) {}
}

/// Status response carrying the server list JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponsePacket {
    pub response: String,
}

impl Packet for StatusResponsePacket {
    fn packet_id() -> u64 {
        0x00
    }
}

impl ReadPacket for StatusResponsePacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(StatusResponsePacket {
            response: buffer.read_string()?,
        })
    }
}

impl WritePacket for StatusResponsePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_string(&self.response);
    }
}

/// Ping (server to client) and pong (client to server) share ID and layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingPacket {
    pub nonce: i64,
}

impl Packet for PingPacket {
    fn packet_id() -> u64 {
        0x01
    }
}

impl ReadPacket for PingPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(PingPacket {
            nonce: buffer.read_i64()?,
        })
    }
}

impl WritePacket for PingPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_i64(self.nonce);
    }
}
