//! Packs small palette indices into a byte buffer, least significant bit first.
//!
//! Index `i` occupies bits `[i * bits, (i + 1) * bits)` of the buffer, where
//! bit `n` lives in byte `n / 8` at position `n % 8`. With 4 bits per value
//! this is two values per byte, low nibble first.

/// Number of bytes needed to hold `count` values of `bits` width.
pub const fn packed_len(count: usize, bits: u8) -> usize {
    (count * bits as usize).div_ceil(8)
}

/// Packs `values` at `bits` width. Bits above `bits` in each value are dropped.
pub fn pack(values: &[u8], bits: u8) -> Vec<u8> {
    let mut data = vec![0u8; packed_len(values.len(), bits)];
    let mask = value_mask(bits);
    for (index, &value) in values.iter().enumerate() {
        let value = (value as u16) & mask;
        let bit_offset = index * bits as usize;
        let byte = bit_offset / 8;
        let shift = bit_offset % 8;
        let shifted = value << shift;
        data[byte] |= shifted as u8;
        if shift + bits as usize > 8 {
            data[byte + 1] |= (shifted >> 8) as u8;
        }
    }
    data
}

/// Reads back the value at `index`. Out of range reads yield 0.
pub fn unpack(data: &[u8], index: usize, bits: u8) -> u8 {
    let bit_offset = index * bits as usize;
    let byte = bit_offset / 8;
    let shift = bit_offset % 8;
    let Some(&low) = data.get(byte) else {
        return 0;
    };
    let mut word = low as u16;
    if shift + bits as usize > 8 {
        word |= (data.get(byte + 1).copied().unwrap_or(0) as u16) << 8;
    }
    ((word >> shift) & value_mask(bits)) as u8
}

fn value_mask(bits: u8) -> u16 {
    (1u16 << bits) - 1
}
