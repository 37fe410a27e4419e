use crate::status::DeserializeError;
use structclone_types::types::{
    ArrayBufferViewKind, BlobInfo, CompositorProxyInfo, FileInfo, HostString, ImageDataInfo,
    RegExpFlags,
};

/// A value complete in itself, ready to be materialized.
#[derive(PartialEq, Clone, Debug)]
pub enum Leaf {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(HostString),

    Date(f64),
    RegExp { pattern: String, flags: RegExpFlags },
    StringObject(HostString),
    NumberObject(f64),
    BooleanObject(bool),

    ArrayBuffer(Vec<u8>),
    Blob(BlobInfo),
    File(FileInfo),
    FileList(Vec<FileInfo>),
    ImageData(ImageDataInfo),
    CompositorProxy(CompositorProxyInfo),
}

impl Leaf {
    /// Objects get an entry in the reference pool; primitives do not.
    pub fn is_object(&self) -> bool {
        !matches!(
            self,
            Self::Undefined | Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_)
        )
    }
}

/// What the stream reader needs from whatever is building values.
///
/// The creator owns a value stack and a reference pool. Opening a composite
/// reserves its pool slot immediately, so that children can refer back to
/// it; completing the composite pops its children off the value stack.
pub trait CompositeCreator {
    type Value: Clone;

    fn push(&mut self, value: Self::Value);
    fn consume_top_of_stack(&mut self) -> Option<Self::Value>;
    fn stack_depth(&self) -> usize;

    fn new_object(&mut self) -> Result<(), DeserializeError>;
    fn new_sparse_array(&mut self, length: u32) -> Result<(), DeserializeError>;
    fn new_dense_array(&mut self, length: u32) -> Result<(), DeserializeError>;
    fn new_map(&mut self) -> Result<(), DeserializeError>;
    fn new_set(&mut self) -> Result<(), DeserializeError>;
    fn open_composite_count(&self) -> usize;

    /// Pops `num_properties` key/value pairs.
    fn complete_object(&mut self, num_properties: u32) -> Result<Self::Value, DeserializeError>;
    fn complete_sparse_array(
        &mut self,
        num_properties: u32,
        length: u32,
    ) -> Result<Self::Value, DeserializeError>;
    /// Pops `num_properties` key/value pairs, then `length` elements.
    fn complete_dense_array(
        &mut self,
        num_properties: u32,
        length: u32,
    ) -> Result<Self::Value, DeserializeError>;
    /// `length` counts keys and values.
    fn complete_map(&mut self, length: u32) -> Result<Self::Value, DeserializeError>;
    fn complete_set(&mut self, length: u32) -> Result<Self::Value, DeserializeError>;

    fn push_object_reference(&mut self, value: &Self::Value);
    fn try_get_object_from_object_reference(&self, reference: u32) -> Option<Self::Value>;
    fn object_reference_count(&self) -> usize;

    fn try_get_transferred_message_port(&mut self, index: u32) -> Option<Self::Value>;
    fn try_get_transferred_array_buffer(&mut self, index: u32) -> Option<Self::Value>;

    fn create_leaf(&mut self, leaf: Leaf) -> Result<Self::Value, DeserializeError>;
    fn create_array_buffer_view(
        &mut self,
        buffer: Self::Value,
        kind: ArrayBufferViewKind,
        byte_offset: u32,
        byte_length: u32,
    ) -> Result<Self::Value, DeserializeError>;
}
