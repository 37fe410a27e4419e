use crate::deserializer::{CompositeCreator, Leaf};
use crate::status::DeserializeError;
use structclone_types::types::{FileInfo, IndexedBlob};
use structclone_types::wire::{ReadResult, Token, WireError, WireReader, FRESH_COMPOSITES_VERSION};

/// Turns records into calls on a [`CompositeCreator`].
pub struct Reader<'a> {
    wire: WireReader<'a>,
    blob_info: Option<&'a [IndexedBlob]>,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [u8], blob_info: Option<&'a [IndexedBlob]>) -> Self {
        Self {
            wire: WireReader::new(buffer),
            blob_info,
        }
    }

    pub fn read_version(&mut self) -> Result<u32, DeserializeError> {
        Ok(self.wire.read_version()?)
    }

    pub fn version(&self) -> u32 {
        self.wire.version()
    }

    pub fn position(&self) -> usize {
        self.wire.position()
    }

    pub fn is_eof(&mut self) -> bool {
        self.wire.is_eof()
    }

    /// Reads one record. Returns the value it produced, or `None` for a
    /// record that only opened a composite.
    pub fn read<C: CompositeCreator>(
        &mut self,
        creator: &mut C,
    ) -> Result<Option<C::Value>, DeserializeError> {
        let token = match self.wire.read_token()? {
            ReadResult::EOF => return Err(WireError::UnexpectedEnd(self.wire.position()).into()),
            ReadResult::Some(_, token) => token,
        };
        // Legacy streams have no open records; a composite is created when
        // it closes.
        let legacy = self.wire.version() < FRESH_COMPOSITES_VERSION;

        let leaf = match token {
            Token::Undefined => Leaf::Undefined,
            Token::Null => Leaf::Null,
            Token::True => Leaf::Bool(true),
            Token::False => Leaf::Bool(false),
            Token::Int32(i) => Leaf::Number(i as f64),
            Token::Uint32(u) => Leaf::Number(u as f64),
            Token::Number(n) => Leaf::Number(n),
            Token::String(s) => Leaf::String(s),

            Token::Date(t) => Leaf::Date(t),
            Token::RegExp { pattern, flags } => Leaf::RegExp { pattern, flags },
            Token::StringObject(s) => Leaf::StringObject(s),
            Token::NumberObject(n) => Leaf::NumberObject(n),
            Token::TrueObject => Leaf::BooleanObject(true),
            Token::FalseObject => Leaf::BooleanObject(false),

            Token::ArrayBuffer(contents) => Leaf::ArrayBuffer(contents),
            Token::Blob(blob) => Leaf::Blob(blob),
            Token::BlobIndex(index) => match self.indexed_blob(index)? {
                IndexedBlob::Blob(blob) => Leaf::Blob(blob.clone()),
                IndexedBlob::File(_) => return Err(DeserializeError::BadBlobIndex(index)),
            },
            Token::File(file) => Leaf::File(file),
            Token::FileIndex(index) => Leaf::File(self.indexed_file(index)?),
            Token::FileList(files) => Leaf::FileList(files),
            Token::FileListIndex(indexes) => Leaf::FileList(
                indexes
                    .iter()
                    .map(|index| self.indexed_file(*index))
                    .collect::<Result<_, _>>()?,
            ),
            Token::ImageData(image) => Leaf::ImageData(image),
            Token::CompositorProxy(proxy) => Leaf::CompositorProxy(proxy),

            Token::ArrayBufferView {
                kind,
                byte_offset,
                byte_length,
            } => {
                let buffer = creator
                    .consume_top_of_stack()
                    .ok_or(DeserializeError::ViewWithoutBuffer)?;
                let view =
                    creator.create_array_buffer_view(buffer, kind, byte_offset, byte_length)?;
                creator.push_object_reference(&view);
                return Ok(Some(view));
            }
            Token::TransferredArrayBuffer(index) => {
                return creator
                    .try_get_transferred_array_buffer(index)
                    .map(Some)
                    .ok_or(DeserializeError::BadTransferredArrayBuffer(index));
            }
            Token::TransferredMessagePort(index) => {
                return creator
                    .try_get_transferred_message_port(index)
                    .map(Some)
                    .ok_or(DeserializeError::BadTransferredMessagePort(index));
            }
            Token::ObjectReference(reference) => {
                return creator
                    .try_get_object_from_object_reference(reference)
                    .map(Some)
                    .ok_or(DeserializeError::BadObjectReference(reference));
            }

            Token::GenerateFreshObject => {
                creator.new_object()?;
                return Ok(None);
            }
            Token::GenerateFreshSparseArray(length) => {
                creator.new_sparse_array(length)?;
                return Ok(None);
            }
            Token::GenerateFreshDenseArray(length) => {
                creator.new_dense_array(length)?;
                return Ok(None);
            }
            Token::GenerateFreshMap => {
                creator.new_map()?;
                return Ok(None);
            }
            Token::GenerateFreshSet => {
                creator.new_set()?;
                return Ok(None);
            }

            Token::Object { num_properties } => {
                if legacy {
                    creator.new_object()?;
                }
                return creator.complete_object(num_properties).map(Some);
            }
            Token::SparseArray {
                num_properties,
                length,
            } => {
                if legacy {
                    creator.new_sparse_array(length)?;
                }
                return creator
                    .complete_sparse_array(num_properties, length)
                    .map(Some);
            }
            Token::DenseArray {
                num_properties,
                length,
            } => {
                if legacy {
                    creator.new_dense_array(length)?;
                }
                return creator
                    .complete_dense_array(num_properties, length)
                    .map(Some);
            }
            Token::Map { length } => return creator.complete_map(length).map(Some),
            Token::Set { length } => return creator.complete_set(length).map(Some),
        };

        let is_object = leaf.is_object();
        let value = creator.create_leaf(leaf)?;
        if is_object {
            creator.push_object_reference(&value);
        }
        Ok(Some(value))
    }

    fn indexed_blob(&self, index: u32) -> Result<&'a IndexedBlob, DeserializeError> {
        self.blob_info
            .and_then(|blob_info| blob_info.get(index as usize))
            .ok_or(DeserializeError::BadBlobIndex(index))
    }

    fn indexed_file(&self, index: u32) -> Result<FileInfo, DeserializeError> {
        match self.indexed_blob(index)? {
            IndexedBlob::File(file) => Ok(file.clone()),
            IndexedBlob::Blob(_) => Err(DeserializeError::BadBlobIndex(index)),
        }
    }
}
