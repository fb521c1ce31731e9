use crate::varint::{decode_varint, write_varint};
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use lodestone_common::{LodestoneError, Result};
use uuid::Uuid;

/// Longest string accepted from a peer, in bytes.
pub const MAX_STRING_LEN: usize = 32767 * 4;

/// Packet payload buffer. Contains the bytes and a read cursor.
///
/// Writes always append; reads consume from the cursor and fail with
/// [`LodestoneError::ShortPayload`] instead of reading past the end.
#[derive(Debug, Default, Clone)]
pub struct PacketBuffer {
    pub buffer: Vec<u8>,
    cursor: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: bytes.into(),
            cursor: 0,
        }
    }

    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn peek_byte(&self) -> Option<u8> {
        self.buffer.get(self.cursor).copied()
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buffer)
    }

    fn take(&mut self, needed: usize) -> Result<&[u8]> {
        if self.remaining() < needed {
            return Err(LodestoneError::ShortPayload {
                needed,
                remaining: self.remaining(),
            });
        }
        let start = self.cursor;
        self.cursor += needed;
        Ok(&self.buffer[start..self.cursor])
    }

    pub fn write_varint(&mut self, value: u64) {
        write_varint(&mut self.buffer, value);
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        match decode_varint(&self.buffer[self.cursor..])? {
            Some((value, consumed)) => {
                self.cursor += consumed;
                Ok(value)
            }
            None => Err(LodestoneError::ShortPayload {
                needed: self.remaining() + 1,
                remaining: self.remaining(),
            }),
        }
    }

    /// Writes a VarInt length prefix followed by the UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as u64);
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_varint()?;
        let length = usize::try_from(length)
            .ok()
            .filter(|&len| len <= MAX_STRING_LEN)
            .ok_or(LodestoneError::ShortPayload {
                needed: MAX_STRING_LEN + 1,
                remaining: self.remaining(),
            })?;
        let bytes = self.take(length)?.to_vec();
        String::from_utf8(bytes).map_err(|_| LodestoneError::InvalidUtf8)
    }

    pub fn write_bytes_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.take(count)?.to_vec())
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    /// Any nonzero byte is true.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    // Write an u16 in network (big-endian) order.
    pub fn write_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        BigEndian::write_u16(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    // Read an u16 in network (big-endian) order.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn write_i32(&mut self, value: i32) {
        let mut bytes = [0u8; 4];
        BigEndian::write_i32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn write_i64(&mut self, value: i64) {
        let mut bytes = [0u8; 8];
        BigEndian::write_i64(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    pub fn write_f32(&mut self, value: f32) {
        let mut bytes = [0u8; 4];
        BigEndian::write_f32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.take(4)?))
    }

    pub fn write_f64(&mut self, value: f64) {
        let mut bytes = [0u8; 8];
        BigEndian::write_f64(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    /// Writes a UUID as its 16 raw bytes (two big-endian longs).
    pub fn write_uuid(&mut self, value: Uuid) {
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(self.take(16)?);
        Ok(Uuid::from_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_packet_buffer_from_bytes() {
        let buffer = PacketBuffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(buffer.buffer, vec![1, 2, 3]);
        assert_eq!(buffer.get_cursor(), 0);
        assert_eq!(buffer.peek_byte(), Some(1));
        assert_eq!(PacketBuffer::new().peek_byte(), None);
    }

    #[test]
    fn test_string() {
        for string in ["", "Hello, World!", "🦀", "こんにちは"] {
            let mut buffer = PacketBuffer::new();
            buffer.write_string(string);
            assert_eq!(buffer.read_string().unwrap(), string);
            assert_eq!(buffer.remaining(), 0);
        }
    }

    #[test]
    fn test_fixed_width_numbers_are_big_endian() {
        let mut buffer = PacketBuffer::new();
        buffer.write_u16(25565);
        buffer.write_i32(-2);
        buffer.write_i64(1);
        assert_eq!(&buffer.buffer[..2], &[0x63, 0xdd]);
        assert_eq!(&buffer.buffer[2..6], &[0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(&buffer.buffer[6..], &[0, 0, 0, 0, 0, 0, 0, 1]);

        assert_eq!(buffer.read_u16().unwrap(), 25565);
        assert_eq!(buffer.read_i32().unwrap(), -2);
        assert_eq!(buffer.read_i64().unwrap(), 1);
    }

    #[test]
    fn test_floats_use_ieee_bits() {
        let mut buffer = PacketBuffer::new();
        buffer.write_f32(1.5);
        buffer.write_f64(-64.25);
        assert_eq!(&buffer.buffer[..4], &1.5f32.to_bits().to_be_bytes());
        assert_eq!(buffer.read_f32().unwrap(), 1.5);
        assert_eq!(buffer.read_f64().unwrap(), -64.25);
    }

    #[test]
    fn test_bool_nonzero_is_true() {
        let mut buffer = PacketBuffer::from_bytes(vec![0, 1, 7]);
        assert!(!buffer.read_bool().unwrap());
        assert!(buffer.read_bool().unwrap());
        assert!(buffer.read_bool().unwrap());
    }

    #[test]
    fn test_uuid() {
        let uuid = Uuid::new_v3(&Uuid::NAMESPACE_DNS, "wow".as_ref());
        let mut buffer = PacketBuffer::new();
        buffer.write_uuid(uuid);
        assert_eq!(buffer.read_uuid().unwrap(), uuid);
    }

    #[test]
    fn test_string_error_handling() {
        let mut buffer = PacketBuffer::new();
        buffer.write_varint(1);
        buffer.buffer.push(0xFF);
        assert_matches!(buffer.read_string(), Err(LodestoneError::InvalidUtf8));

        let mut buffer = PacketBuffer::new();
        buffer.write_varint(100);
        buffer.buffer.push(0x41);
        assert_matches!(
            buffer.read_string(),
            Err(LodestoneError::ShortPayload { needed: 100, remaining: 1 })
        );
    }

    #[test]
    fn test_short_reads() {
        let mut buffer = PacketBuffer::from_bytes(vec![0x00]);
        assert_matches!(buffer.read_u16(), Err(LodestoneError::ShortPayload { .. }));
        assert_matches!(buffer.read_uuid(), Err(LodestoneError::ShortPayload { .. }));

        let mut buffer = PacketBuffer::from_bytes(vec![0x80]);
        assert_matches!(buffer.read_varint(), Err(LodestoneError::ShortPayload { .. }));
    }
}
