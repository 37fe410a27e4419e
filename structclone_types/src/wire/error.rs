use crate::wire::SerializationTag;
use thiserror::Error;

/// Every way a byte stream can fail to decode. All of these are malformed
/// input; none leaves the reader positioned past the end of its buffer.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum WireError {
    #[error("unexpected end of buffer at byte {0}")]
    UnexpectedEnd(usize),
    #[error("unknown tag 0x{0:02x}")]
    UnknownTag(u8),
    #[error("unexpected tag {0:?}")]
    UnexpectedTag(SerializationTag),
    #[error("var-int does not fit in {0} bits")]
    VarIntOverflow(u32),
    #[error("invalid length {len} for {what}")]
    InvalidLength { what: &'static str, len: u64 },
    #[error("{tag:?} requires version {required}, stream is version {version}")]
    UnsupportedInVersion {
        tag: SerializationTag,
        required: u32,
        version: u32,
    },
    #[error("unsupported wire format version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),
    #[error("invalid {what} 0x{value:x}")]
    InvalidValue { what: &'static str, value: u64 },
}
