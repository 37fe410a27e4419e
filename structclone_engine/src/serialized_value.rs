use crate::deserializer::{Deserializer, HeapCreator};
use crate::heap::{Heap, ObjectId, Value};
use crate::options::SerializerOptions;
use crate::serializer::Serializer;
use crate::status::{DeserializeError, SerializeError};
use crate::transfer::Transferables;
use std::collections::HashMap;
use structclone_types::types::{BlobInfo, HostString, IndexedBlob};
use structclone_types::wire::{container, WireError, WireWriter};
use tracing::warn;

/// Blobs a serialized value refers to, by uuid.
pub type BlobDataHandles = HashMap<String, BlobInfo>;

/// A serialized value and the out-of-band state that travels with it.
#[derive(Default, Debug)]
pub struct SerializedValue {
    data: Vec<u8>,
    blob_data_handles: BlobDataHandles,
    /// Contents of transferred array buffers, handed over on the first
    /// deserialization.
    array_buffer_contents: Option<Vec<Vec<u8>>>,
}

impl SerializedValue {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn blob_data_handles(&self) -> &BlobDataHandles {
        &self.blob_data_handles
    }

    pub fn has_transferred_array_buffers(&self) -> bool {
        self.array_buffer_contents.is_some()
    }

    /// The stream as stored or sent between processes.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        container::to_wire_bytes(&self.data)
    }

    /// Rebuilds the value into `heap`. Malformed data yields `null`.
    pub fn deserialize(
        &mut self,
        heap: &mut Heap,
        message_ports: &[ObjectId],
        blob_info: Option<&[IndexedBlob]>,
    ) -> Value {
        match self.try_deserialize(heap, message_ports, blob_info) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "could not deserialize value");
                Value::Null
            }
        }
    }

    /// Transferred buffer contents move into `heap` on success. On failure
    /// they stay with `self`, so a later call can still receive them.
    pub fn try_deserialize(
        &mut self,
        heap: &mut Heap,
        message_ports: &[ObjectId],
        blob_info: Option<&[IndexedBlob]>,
    ) -> Result<Value, DeserializeError> {
        let mut creator = HeapCreator::new(heap).with_message_ports(message_ports);
        let has_contents = self.array_buffer_contents.is_some();
        if let Some(contents) = self.array_buffer_contents.take() {
            creator = creator.with_array_buffer_contents(contents);
        }
        let result = Deserializer::new(&self.data, blob_info).deserialize(&mut creator);
        if result.is_err() && has_contents {
            self.array_buffer_contents = Some(creator.reclaim_array_buffer_contents());
        }
        result
    }
}

#[derive(Default, Clone, Copy, Debug)]
pub struct SerializedValueFactory {
    options: SerializerOptions,
}

impl SerializedValueFactory {
    pub fn new(options: SerializerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Serializes `value`. Array buffers in `transfer_list` are neutered on
    /// success and their contents move into the result.
    pub fn create(
        &self,
        heap: &mut Heap,
        value: &Value,
        transfer_list: &[Value],
    ) -> Result<SerializedValue, SerializeError> {
        self.create_impl(heap, value, transfer_list, None)
    }

    /// Like [`Self::create`], but blobs and files are appended to
    /// `blob_info` and written by index.
    pub fn create_with_blob_info(
        &self,
        heap: &mut Heap,
        value: &Value,
        transfer_list: &[Value],
        blob_info: &mut Vec<IndexedBlob>,
    ) -> Result<SerializedValue, SerializeError> {
        self.create_impl(heap, value, transfer_list, Some(blob_info))
    }

    fn create_impl(
        &self,
        heap: &mut Heap,
        value: &Value,
        transfer_list: &[Value],
        blob_info: Option<&mut Vec<IndexedBlob>>,
    ) -> Result<SerializedValue, SerializeError> {
        let transferables = Transferables::extract(heap, transfer_list)?;
        let output = Serializer::new(heap, self.options, &transferables)
            .with_blob_info(blob_info)
            .serialize(value)
            .map_err(|e| {
                warn!(error = %e, status = ?e.status(), "could not serialize value");
                e
            })?;

        let array_buffer_contents = if transferables.array_buffers.is_empty() {
            None
        } else {
            Some(transferables.neuter_array_buffers(heap)?)
        };
        Ok(SerializedValue {
            data: output.data,
            blob_data_handles: output.blob_data_handles,
            array_buffer_contents,
        })
    }

    /// A value holding just `s`.
    pub fn create_from_string(&self, s: &HostString) -> SerializedValue {
        let mut writer = WireWriter::new();
        writer.write_version();
        writer.write_string(s);
        Self::from_data(writer.take_wire_bytes())
    }

    pub fn null_value(&self) -> SerializedValue {
        let mut writer = WireWriter::new();
        writer.write_version();
        writer.write_null();
        Self::from_data(writer.take_wire_bytes())
    }

    /// Adopts a stream produced by [`SerializedValue::to_wire_bytes`].
    pub fn create_from_wire_bytes(&self, wire: &[u8]) -> Result<SerializedValue, WireError> {
        Ok(Self::from_data(container::from_wire_bytes(wire)?))
    }

    fn from_data(data: Vec<u8>) -> SerializedValue {
        SerializedValue {
            data,
            ..Default::default()
        }
    }
}
