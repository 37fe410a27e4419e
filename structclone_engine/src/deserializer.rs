//! Rebuilds a value from a stream.
//!
//! Records are read front to back. Leaves go straight onto the creator's
//! value stack; composites pop their children when their closing record
//! arrives. A well-formed stream leaves exactly one value and no open
//! composite behind.

mod creator;
mod heap_creator;
mod reader;

pub use creator::*;
pub use heap_creator::*;
pub use reader::*;

use crate::status::DeserializeError;
use structclone_types::types::IndexedBlob;
use tracing::debug;

pub struct Deserializer<'a> {
    reader: Reader<'a>,
}

impl<'a> Deserializer<'a> {
    /// `blob_info` resolves blobs and files that were written by index.
    pub fn new(data: &'a [u8], blob_info: Option<&'a [IndexedBlob]>) -> Self {
        Self {
            reader: Reader::new(data, blob_info),
        }
    }

    pub fn deserialize<C: CompositeCreator>(
        mut self,
        creator: &mut C,
    ) -> Result<C::Value, DeserializeError> {
        let version = self.reader.read_version()?;

        while !self.reader.is_eof() {
            if let Some(value) = self.reader.read(creator)? {
                creator.push(value);
            }
        }

        let (values, open) = (creator.stack_depth(), creator.open_composite_count());
        if values != 1 || open != 0 {
            return Err(DeserializeError::Unbalanced { values, open });
        }
        let value = creator
            .consume_top_of_stack()
            .ok_or(DeserializeError::Unbalanced { values, open })?;
        debug!(
            version,
            bytes = self.reader.position(),
            objects = creator.object_reference_count(),
            "deserialized value"
        );
        Ok(value)
    }
}
