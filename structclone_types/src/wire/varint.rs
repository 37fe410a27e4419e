//! Unsigned integers are written 7 bits at a time, least-significant chunk
//! first. The high bit of each byte says whether another byte follows.
//!
//! ```text
//! 0        => [0x00]
//! 127      => [0x7f]
//! 128      => [0x80, 0x01]
//! 2^32 - 1 => [0xff, 0xff, 0xff, 0xff, 0x0f]
//! ```

use crate::wire::WireError;
use num_traits::{PrimInt, Unsigned};
use std::mem;


pub const VAR_INT_SHIFT: u32 = 7;
pub const VAR_INT_MASK: u8 = 0x7f;
const CONTINUATION: u8 = 1 << VAR_INT_SHIFT;

/// Appends the minimal encoding of `value`. Zero still takes one byte.
pub fn encode_into(mut value: u64, buf: &mut Vec<u8>) -> usize {
    let mut len = 0;
    loop {
        let chunk = (value & VAR_INT_MASK as u64) as u8;
        value >>= VAR_INT_SHIFT;
        len += 1;
        if value == 0 {
            buf.push(chunk);
            return len;
        }
        buf.push(chunk | CONTINUATION);
    }
}

pub fn encode(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(value));
    encode_into(value, &mut buf);
    buf
}

pub fn encoded_len(mut value: u64) -> usize {
    let mut len = 1;
    while value > VAR_INT_MASK as u64 {
        value >>= VAR_INT_SHIFT;
        len += 1;
    }
    len
}

/// Decodes one var-int from the front of `buf` into a `T`.
///
/// @return the count of bytes consumed, and the value.
pub fn decode<T>(buf: &[u8]) -> Result<(usize, T), WireError>
where
    T: PrimInt + Unsigned,
{
    let bits = (mem::size_of::<T>() * 8) as u32;
    let mut value: u128 = 0;
    let mut shift = 0u32;
    for (i, byte) in buf.iter().enumerate() {
        if shift >= bits {
            return Err(WireError::VarIntOverflow(bits));
        }
        value |= ((byte & VAR_INT_MASK) as u128) << shift;
        shift += VAR_INT_SHIFT;

        if byte & CONTINUATION == 0 {
            let value = T::from(value).ok_or(WireError::VarIntOverflow(bits))?;
            return Ok((i + 1, value));
        }
    }
    Err(WireError::UnexpectedEnd(buf.len()))
}

pub fn zigzag_encode(i: i32) -> u32 {
    ((i << 1) ^ (i >> 31)) as u32
}

pub fn zigzag_decode(u: u32) -> i32 {
    ((u >> 1) as i32) ^ -((u & 1) as i32)
}
