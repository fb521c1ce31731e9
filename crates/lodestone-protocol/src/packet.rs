use crate::buffer::PacketBuffer;
use crate::frame::{Frame, OutboundPacket};
use lodestone_common::Result;

/// Packet trait. Carries the packet ID for the packet's direction and phase.
pub trait Packet {
    fn packet_id() -> u64
    where
        Self: Sized;
}

/// A packet the server can decode from a frame payload.
pub trait ReadPacket: Packet + Sized {
    /// Reads the packet fields from the payload buffer.
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self>;

    fn from_frame(frame: &Frame) -> Result<Self> {
        Self::read_from_buffer(&mut frame.buffer())
    }
}

/// A packet that can be serialized into a payload.
pub trait WritePacket: Packet {
    /// Writes the packet fields (not the ID) to the buffer.
    fn write_to_buffer(&self, buffer: &mut PacketBuffer);

    /// Serializes the packet into an immutable outbound packet.
    fn to_outbound(&self) -> OutboundPacket
    where
        Self: Sized,
    {
        let mut buffer = PacketBuffer::new();
        self.write_to_buffer(&mut buffer);
        OutboundPacket::new(Self::packet_id(), buffer.into_bytes())
    }
}
