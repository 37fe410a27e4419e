use bitflags::bitflags;
use num_derive::{FromPrimitive, ToPrimitive};

bitflags! {
    #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
    pub struct RegExpFlags: u32 {
        const GLOBAL = 1;
        const IGNORE_CASE = 2;
        const MULTILINE = 4;
    }
}

/// Subtag written after `ArrayBufferView`.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ArrayBufferViewKind {
    Int8 = b'b',
    Uint8 = b'B',
    Uint8Clamped = b'C',
    Int16 = b'w',
    Uint16 = b'W',
    Int32 = b'd',
    Uint32 = b'D',
    Float32 = b'f',
    Float64 = b'F',
    DataView = b'?',
}

impl ArrayBufferViewKind {
    pub fn element_size(self) -> u32 {
        match self {
            Self::Int8 | Self::Uint8 | Self::Uint8Clamped | Self::DataView => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ImageDataInfo {
    pub width: u32,
    pub height: u32,
    /// RGBA, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl ImageDataInfo {
    pub fn expected_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct CompositorProxyInfo {
    pub element_id: u64,
    pub attributes: u32,
}
