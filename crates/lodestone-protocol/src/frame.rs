//! Packet framing.
//!
//! Every packet on the wire is `[VarInt length][VarInt packet_id][payload]`,
//! where `length` covers the packet ID and the payload but not itself.

use crate::buffer::PacketBuffer;
use crate::phase::{ConnectionPhase, SharedPhase};
use crate::varint::{decode_varint, varint_len, write_varint};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use lodestone_common::{LodestoneError, Result};
use tokio_util::codec::{Decoder, Encoder};

/// Largest frame body accepted from a peer (a 3-byte VarInt).
pub const MAX_FRAME_LEN: u64 = 2_097_151;

/// One inbound packet, as received.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Phase of the connection when the frame was decoded.
    pub phase: ConnectionPhase,
    /// Declared length (packet ID + payload).
    pub length: u64,
    pub packet_id: u64,
    pub payload: Bytes,
}

impl Frame {
    pub fn buffer(&self) -> PacketBuffer {
        PacketBuffer::from_bytes(self.payload.to_vec())
    }
}

/// A serialized packet waiting in a session's send queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundPacket {
    id: u64,
    payload: Bytes,
}

impl OutboundPacket {
    pub fn new(id: u64, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Value of the length prefix: packet ID plus payload.
    pub fn size(&self) -> usize {
        varint_len(self.id) + self.payload.len()
    }

    /// Appends the length-prefixed frame to `dst`.
    pub fn write_frame(&self, dst: &mut impl BufMut) {
        write_varint(dst, self.size() as u64);
        write_varint(dst, self.id);
        dst.put_slice(&self.payload);
    }
}

/// Frame codec for `FramedRead`/`FramedWrite`. Decoded frames are stamped with
/// the connection's phase at the moment of decoding.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    phase: SharedPhase,
}

impl FrameCodec {
    pub fn new(phase: SharedPhase) -> Self {
        Self { phase }
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = LodestoneError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        let Some((length, length_len)) = decode_varint(&src[..])? else {
            return Ok(None);
        };
        if length > MAX_FRAME_LEN {
            return Err(LodestoneError::FrameTooLarge {
                len: length,
                max: MAX_FRAME_LEN,
            });
        }
        let Some((packet_id, id_len)) = decode_varint(&src[length_len..])? else {
            return Ok(None);
        };

        // A length shorter than the packet ID is the uncompressed marker of the
        // compression framing and carries no payload.
        let payload_len = (length as usize).saturating_sub(varint_len(packet_id));
        let header_len = length_len + id_len;
        let frame_len = header_len + payload_len;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(header_len);
        let payload = src.split_to(payload_len).freeze();
        Ok(Some(Frame {
            phase: self.phase.get(),
            length,
            packet_id,
            payload,
        }))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(LodestoneError::TruncatedFrame),
        }
    }
}

impl Encoder<OutboundPacket> for FrameCodec {
    type Error = LodestoneError;

    fn encode(&mut self, item: OutboundPacket, dst: &mut BytesMut) -> Result<()> {
        let size = item.size();
        dst.reserve(varint_len(size as u64) + size);
        item.write_frame(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use futures::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    fn encode(packet: OutboundPacket) -> BytesMut {
        let mut dst = BytesMut::new();
        FrameCodec::default().encode(packet, &mut dst).unwrap();
        dst
    }

    #[test]
    fn test_frame_round_trip() {
        for payload_len in [0usize, 1, 300] {
            let payload: Vec<u8> = (0..payload_len).map(|i| i as u8).collect();
            let mut src = encode(OutboundPacket::new(0x20, payload.clone()));

            let frame = FrameCodec::default().decode(&mut src).unwrap().unwrap();
            assert_eq!(frame.packet_id, 0x20);
            assert_eq!(frame.payload.as_ref(), payload.as_slice());
            assert_eq!(frame.length as usize, 1 + payload_len);
            assert!(src.is_empty());
        }
    }

    #[test]
    fn test_length_prefix_layout() {
        let dst = encode(OutboundPacket::new(0x300, vec![0xAA; 3]));
        // size = 2 (id) + 3 (payload)
        assert_eq!(&dst[..], &[0x05, 0x80, 0x06, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn test_short_length_yields_empty_payload() {
        // Declared length 0, packet ID 0x7f, then the next frame.
        let mut src = BytesMut::from(&[0x00, 0x7f, 0x01, 0x02][..]);
        let mut codec = FrameCodec::default();

        let frame = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(frame.packet_id, 0x7f);
        assert_eq!(frame.length, 0);
        assert!(frame.payload.is_empty());

        let next = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(next.packet_id, 0x02);
        assert!(next.payload.is_empty());
    }

    #[test]
    fn test_partial_frame_waits_for_more() {
        let full = encode(OutboundPacket::new(0x01, vec![1, 2, 3, 4]));
        let mut codec = FrameCodec::default();
        let mut src = BytesMut::from(&full[..3]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert_eq!(src.len(), 3);

        src.extend_from_slice(&full[3..]);
        let frame = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(frame.payload.as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_truncated_at_eof() {
        let full = encode(OutboundPacket::new(0x01, vec![1, 2, 3, 4]));
        let mut src = BytesMut::from(&full[..4]);
        assert_matches!(
            FrameCodec::default().decode_eof(&mut src),
            Err(LodestoneError::TruncatedFrame)
        );
        assert!(FrameCodec::default()
            .decode_eof(&mut BytesMut::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_length() {
        let mut src = BytesMut::from(&[0xFF; 12][..]);
        assert_matches!(
            FrameCodec::default().decode(&mut src),
            Err(LodestoneError::MalformedVarInt)
        );
    }

    #[test]
    fn test_oversized_frame() {
        let mut src = BytesMut::new();
        write_varint(&mut src, MAX_FRAME_LEN + 1);
        assert_matches!(
            FrameCodec::default().decode(&mut src),
            Err(LodestoneError::FrameTooLarge { .. })
        );
    }

    #[test]
    fn test_frames_carry_current_phase() {
        let phase = SharedPhase::default();
        let mut codec = FrameCodec::new(phase.clone());
        let mut src = encode(OutboundPacket::new(0x00, Vec::new()));
        src.extend_from_slice(&encode(OutboundPacket::new(0x00, Vec::new())));

        assert_eq!(codec.decode(&mut src).unwrap().unwrap().phase, ConnectionPhase::Init);
        phase.advance(ConnectionPhase::Login);
        assert_eq!(codec.decode(&mut src).unwrap().unwrap().phase, ConnectionPhase::Login);
    }

    #[tokio::test]
    async fn test_framed_stream() {
        let mut wire = Vec::new();
        {
            let mut sink = FramedWrite::new(&mut wire, FrameCodec::default());
            sink.send(OutboundPacket::new(0x00, b"hello".to_vec()))
                .await
                .unwrap();
            sink.send(OutboundPacket::new(0x1F, vec![0; 8])).await.unwrap();
        }

        let mut frames = FramedRead::new(&wire[..], FrameCodec::default());
        let first = frames.next().await.unwrap().unwrap();
        assert_eq!(first.payload.as_ref(), b"hello");
        let second = frames.next().await.unwrap().unwrap();
        assert_eq!(second.packet_id, 0x1F);
        assert!(frames.next().await.is_none());
    }

    #[tokio::test]
    async fn test_framed_stream_truncated() {
        let wire = encode(OutboundPacket::new(0x00, b"hello".to_vec()));
        let mut frames = FramedRead::new(&wire[..wire.len() - 2], FrameCodec::default());
        assert_matches!(
            frames.next().await,
            Some(Err(LodestoneError::TruncatedFrame))
        );
    }
}
