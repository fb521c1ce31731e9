use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlivePacket {
    pub keep_alive_id: i64,
}

impl Packet for KeepAlivePacket {
    fn packet_id() -> u64 {
        0x1F
    }
}

impl ReadPacket for KeepAlivePacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(KeepAlivePacket {
            keep_alive_id: buffer.read_i64()?,
        })
    }
}

impl WritePacket for KeepAlivePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_i64(self.keep_alive_id);
    }
}

impl KeepAlivePacket {
    pub fn new(keep_alive_id: i64) -> Self {
        Self { keep_alive_id }
    }
}
