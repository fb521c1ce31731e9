//! Unsigned LEB128 VarInts: 7 data bits per byte, least significant group
//! first, high bit set on every byte except the last.

use bytes::BufMut;
use lodestone_common::{LodestoneError, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Segment bits mask (lower 7 bits).
const SEGMENT_BITS: u8 = 0x7F;

/// Continue bit (high bit).
const CONTINUE_BIT: u8 = 0x80;

/// Longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` occupies once encoded. Never allocates.
pub const fn varint_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let bits_needed = (u64::BITS - value.leading_zeros()) as usize;
    bits_needed.div_ceil(7)
}

/// Writes the minimal encoding of `value`, returning the number of bytes written.
pub fn write_varint(buf: &mut impl BufMut, mut value: u64) -> usize {
    let mut written = 0;
    loop {
        let byte = (value as u8) & SEGMENT_BITS;
        value >>= 7;
        written += 1;
        if value == 0 {
            buf.put_u8(byte);
            return written;
        }
        buf.put_u8(byte | CONTINUE_BIT);
    }
}

/// Encodes `value` into a fresh byte vector.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(varint_len(value));
    write_varint(&mut out, value);
    out
}

/// Decodes a VarInt from the front of `src`.
///
/// Returns `Ok(None)` when `src` ends before the terminating byte, and the
/// value with the number of bytes consumed otherwise.
pub fn decode_varint(src: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value: u64 = 0;
    for (i, &byte) in src.iter().enumerate() {
        // The last group only has room for the top bit of a u64.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(LodestoneError::MalformedVarInt);
        }
        value |= u64::from(byte & SEGMENT_BITS) << (7 * i);
        if byte & CONTINUE_BIT == 0 {
            return Ok(Some((value, i + 1)));
        }
    }
    Ok(None)
}

/// Reads a VarInt from an async reader.
pub async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<u64> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let byte = reader.read_u8().await?;
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(LodestoneError::MalformedVarInt);
        }
        value |= u64::from(byte & SEGMENT_BITS) << (7 * i);
        if byte & CONTINUE_BIT == 0 {
            return Ok(value);
        }
    }
    Err(LodestoneError::MalformedVarInt)
}
