//! Primitive readers and writers shared by the header and update codecs.
//!
//! Unsigned integers use LEB128 (7 bits per byte, low group first). Signed
//! integers are zigzag-mapped first so small magnitudes of either sign stay
//! short.

use bytes::{Buf, BufMut};

use crate::error::{CodecError, Result};

/// Longest LEB128 encoding of a `u32`.
pub const MAX_VARINT_LEN: usize = 5;

pub fn put_varint(dst: &mut impl BufMut, mut value: u32) {
    while value >= 0x80 {
        dst.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

pub fn get_varint(src: &mut impl Buf) -> Result<u32> {
    let mut value = 0u32;
    for group in 0..MAX_VARINT_LEN {
        let byte = get_u8(src)?;
        let bits = u32::from(byte & 0x7f);
        // The fifth group only has room for the top 4 bits.
        if group == MAX_VARINT_LEN - 1 && bits > 0x0f {
            return Err(CodecError::VarintOverflow);
        }
        value |= bits << (7 * group);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::VarintOverflow)
}

pub fn varint_len(value: u32) -> usize {
    match value {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        0x4000..=0x1f_ffff => 3,
        0x20_0000..=0xfff_ffff => 4,
        _ => 5,
    }
}

pub const fn zigzag_encode(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

pub const fn zigzag_decode(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

pub fn get_u8(src: &mut impl Buf) -> Result<u8> {
    if !src.has_remaining() {
        return Err(CodecError::TruncatedInput);
    }
    Ok(src.get_u8())
}

pub fn get_f64(src: &mut impl Buf) -> Result<f64> {
    if src.remaining() < 8 {
        return Err(CodecError::TruncatedInput);
    }
    Ok(src.get_f64_le())
}
