//! # Wire format
//!
//! A serialized value is a flat stream of records. Every record starts with a
//! one-byte [`SerializationTag`], followed by a tag-specific payload.
//! Unsigned integers in payloads are var-ints (see [`varint`]); doubles are
//! 8 bytes, little-endian.
//!
//! The stream opens with an optional version record. Its absence means
//! version 0, and legacy decoding rules apply.
//!
//! Composite values are bracketed. An opening record allocates the composite
//! (and its back-reference index); its children follow as ordinary records;
//! a closing record carries the count of children to fold into it.
//!
//! ```text
//! struct Stream {
//!     version:            { tag: 0xFF, version: varint },    // optional
//!     root:               Record,
//! }
//!
//! // {x: 1, z: [1, 2]}
//! struct Record::Object {
//!     open:               { tag: 'o' },
//!     name_0:             { tag: 'S', byte_len: varint, bytes: "x" },
//!     value_0:            { tag: 'I', zigzag: varint },
//!     name_1:             { tag: 'S', byte_len: varint, bytes: "z" },
//!     value_1:            {
//!         open:               { tag: 'A', length: varint },
//!         elements:           Record[length],
//!         properties:         (Record, Record)[num_properties],
//!         close:              { tag: '$', num_properties: varint, length: varint },
//!     },
//!     close:              { tag: '{', num_properties: varint },
//! }
//!
//! // A composite that was already written, or is still open.
//! struct Record::ObjectReference {
//!     tag:                '^',
//!     index:              varint,
//! }
//! ```
//!
//! UTF-16 string payloads are aligned to an even offset by a leading padding
//! byte, and the finished buffer is padded to an even length, so that the
//! buffer is a whole number of 16-bit units. See [`container`] for how those
//! units are byte-swapped when the buffer leaves the process.

pub mod container;
mod error;
mod reader;
mod tag;
mod token;
pub mod varint;
mod version;
mod writer;

pub use error::*;
pub use reader::*;
pub use tag::*;
pub use token::*;
pub use version::*;
pub use writer::*;
