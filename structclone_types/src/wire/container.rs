//! In memory, a finished stream is treated as a sequence of 16-bit units in
//! host order (little-endian here). When the stream is persisted or sent to
//! another process, each unit is stored big-endian.
//!
//! ```text
//! in memory:  [0xff, 0x09, b'I', 0x02]
//! on wire:    [0x09, 0xff, 0x02, b'I']
//! ```

use crate::wire::WireError;


pub fn to_wire_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 1);
    for unit in data.chunks(2) {
        match unit {
            [lo, hi] => out.extend_from_slice(&[*hi, *lo]),
            // Writers always pad to even; a lone byte is padded here the same way.
            [lo] => out.extend_from_slice(&[0, *lo]),
            _ => {}
        }
    }
    out
}

pub fn from_wire_bytes(wire: &[u8]) -> Result<Vec<u8>, WireError> {
    if wire.len() % 2 != 0 {
        return Err(WireError::InvalidLength {
            what: "wire bytes",
            len: wire.len() as u64,
        });
    }
    let mut out = Vec::with_capacity(wire.len());
    for unit in wire.chunks_exact(2) {
        out.extend_from_slice(&[unit[1], unit[0]]);
    }
    Ok(out)
}
