//! Walks a heap value and writes it as a stream.
//!
//! Composites are not walked recursively. Each open composite is a
//! [`Frame`] on an explicit stack; the driver pops a frame, lets it write
//! children until one of them is itself a composite, then pushes the
//! parent back followed by the child. A frame with nothing left writes its
//! closing record.

mod exotic;
mod frame;

use crate::heap::{Heap, HeapObject, ObjectId, PropertyKey, Value};
use crate::object_pool::ObjectPool;
use crate::options::SerializerOptions;
use crate::serialized_value::BlobDataHandles;
use crate::status::SerializeError;
use crate::transfer::Transferables;
use frame::{Frame, PropertyCursor};
use structclone_types::types::IndexedBlob;
use structclone_types::wire::WireWriter;
use tracing::debug;

const TOO_DEEP: &str = "Value being cloned is either cyclic or too deeply nested.";

#[derive(Debug)]
pub struct SerializerOutput {
    pub data: Vec<u8>,
    pub blob_data_handles: BlobDataHandles,
}

pub struct Serializer<'h, 'b> {
    heap: &'h Heap,
    options: SerializerOptions,
    writer: WireWriter,

    object_pool: ObjectPool,
    transferred_array_buffers: ObjectPool,
    transferred_message_ports: ObjectPool,

    blob_data_handles: BlobDataHandles,
    /// When present, blobs and files are appended here and written by index.
    blob_info: Option<&'b mut Vec<IndexedBlob>>,

    stack: Vec<Frame>,
}

impl<'h, 'b> Serializer<'h, 'b> {
    pub fn new(heap: &'h Heap, options: SerializerOptions, transferables: &Transferables) -> Self {
        let mut transferred_array_buffers = ObjectPool::new();
        for (i, id) in transferables.array_buffers.iter().enumerate() {
            transferred_array_buffers.set(*id, i as u32);
        }
        let mut transferred_message_ports = ObjectPool::new();
        for (i, id) in transferables.message_ports.iter().enumerate() {
            transferred_message_ports.set(*id, i as u32);
        }
        Self {
            heap,
            options,
            writer: WireWriter::new(),
            object_pool: ObjectPool::new(),
            transferred_array_buffers,
            transferred_message_ports,
            blob_data_handles: BlobDataHandles::new(),
            blob_info: None,
            stack: vec![],
        }
    }

    pub fn with_blob_info(mut self, blob_info: Option<&'b mut Vec<IndexedBlob>>) -> Self {
        self.blob_info = blob_info;
        self
    }

    pub fn serialize(mut self, value: &Value) -> Result<SerializerOutput, SerializeError> {
        self.writer.write_version();

        if let Some(frame) = self.do_serialize(value)? {
            self.push(frame)?;
        }
        while let Some(mut frame) = self.stack.pop() {
            match self.advance(&mut frame)? {
                Some(child) => {
                    self.stack.push(frame);
                    self.push(child)?;
                }
                None => self.write_composite_end(&frame),
            }
        }

        let data = self.writer.take_wire_bytes();
        debug!(
            bytes = data.len(),
            objects = self.object_pool.len(),
            blobs = self.blob_data_handles.len(),
            "serialized value"
        );
        Ok(SerializerOutput {
            data,
            blob_data_handles: self.blob_data_handles,
        })
    }

    /* Composite stack. */

    fn push(&mut self, frame: Frame) -> Result<(), SerializeError> {
        let depth = self.stack.len() + 1;
        if depth > self.options.max_depth {
            return Err(SerializeError::InputError(TOO_DEEP.into()));
        }
        // Open composites are already pooled, so this is a consistency check.
        if depth.is_power_of_two() {
            let composite = frame.composite();
            if self.stack.iter().any(|f| f.composite() == composite) {
                return Err(SerializeError::InputError(TOO_DEEP.into()));
            }
        }
        self.stack.push(frame);
        Ok(())
    }

    /// Writes children of `frame` until one needs a frame of its own.
    fn advance(&mut self, frame: &mut Frame) -> Result<Option<Frame>, SerializeError> {
        match frame {
            Frame::Object {
                composite,
                properties,
            }
            | Frame::SparseArray {
                composite,
                properties,
                ..
            } => self.serialize_properties(*composite, properties, false),
            Frame::DenseArray {
                composite,
                length,
                array_index,
                properties,
            } => {
                while *array_index < *length {
                    let element = self
                        .heap
                        .get_property(*composite, &PropertyKey::Index(*array_index))?;
                    *array_index += 1;
                    if let Some(child) = self.do_serialize(&element)? {
                        return Ok(Some(child));
                    }
                }
                self.serialize_properties(*composite, properties, true)
            }
            Frame::Map { entries, index, .. }
            | Frame::Set {
                elements: entries,
                index,
                ..
            } => {
                while let Some(value) = entries.get(*index) {
                    *index += 1;
                    if let Some(child) = self.do_serialize(value)? {
                        return Ok(Some(child));
                    }
                }
                Ok(None)
            }
        }
    }

    fn serialize_properties(
        &mut self,
        composite: ObjectId,
        cursor: &mut PropertyCursor,
        skip_indices: bool,
    ) -> Result<Option<Frame>, SerializeError> {
        while let Some(key) = cursor.next_key(skip_indices) {
            let value = self.heap.get_property(composite, &key)?;
            self.write_property_key(&key);
            cursor.num_serialized += 1;
            if let Some(child) = self.do_serialize(&value)? {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    fn write_composite_end(&mut self, frame: &Frame) {
        match frame {
            Frame::Object { properties, .. } => self.writer.write_object(properties.num_serialized),
            Frame::DenseArray {
                length, properties, ..
            } => self
                .writer
                .write_dense_array(properties.num_serialized, *length),
            Frame::SparseArray {
                length, properties, ..
            } => self
                .writer
                .write_sparse_array(properties.num_serialized, *length),
            Frame::Map { entries, .. } => self.writer.write_map(entries.len() as u32),
            Frame::Set { elements, .. } => self.writer.write_set(elements.len() as u32),
        }
    }

    /* Values. */

    /// Writes `value` if it is complete in itself, or opens it and returns
    /// the frame that will write its children.
    fn do_serialize(&mut self, value: &Value) -> Result<Option<Frame>, SerializeError> {
        match value {
            Value::Undefined => self.writer.write_undefined(),
            Value::Null => self.writer.write_null(),
            Value::Bool(true) => self.writer.write_true(),
            Value::Bool(false) => self.writer.write_false(),
            Value::Number(n) => self.write_number_value(*n),
            Value::String(s) => self.writer.write_string(s),
            Value::Object(id) => return self.do_serialize_object(*id),
        }
        Ok(None)
    }

    fn write_number_value(&mut self, n: f64) {
        let is_integral = n.fract() == 0.0 && !(n == 0.0 && n.is_sign_negative());
        if is_integral && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
            self.writer.write_int32(n as i32);
        } else if is_integral && n >= 0.0 && n <= u32::MAX as f64 {
            self.writer.write_uint32(n as u32);
        } else {
            self.writer.write_number(n);
        }
    }

    fn write_property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Index(i) => self.write_number_value(*i as f64),
            PropertyKey::Name(name) => self.writer.write_string(name),
        }
    }

    fn grey_object(&mut self, id: ObjectId) {
        let reference = self.object_pool.len() as u32;
        self.object_pool.set(id, reference);
    }

    fn do_serialize_object(&mut self, id: ObjectId) -> Result<Option<Frame>, SerializeError> {
        if let Some(reference) = self.object_pool.try_get(id) {
            self.writer.write_object_reference(reference);
            return Ok(None);
        }
        let heap = self.heap;
        let object = heap
            .get(id)
            .ok_or_else(|| SerializeError::data_clone("An object could not be cloned."))?;

        match object {
            HeapObject::Object(_) => {
                self.grey_object(id);
                self.writer.write_generate_fresh_object();
                return Ok(Some(Frame::Object {
                    composite: id,
                    properties: PropertyCursor::new(heap.own_keys(id)),
                }));
            }
            HeapObject::Array { length, properties } => {
                self.grey_object(id);
                let length = *length;
                let cursor = PropertyCursor::new(properties.keys());
                let frame = if self
                    .options
                    .should_serialize_densely(length, properties.len())
                {
                    self.writer.write_generate_fresh_dense_array(length);
                    Frame::DenseArray {
                        composite: id,
                        length,
                        array_index: 0,
                        properties: cursor,
                    }
                } else {
                    self.writer.write_generate_fresh_sparse_array(length);
                    Frame::SparseArray {
                        composite: id,
                        length,
                        properties: cursor,
                    }
                };
                return Ok(Some(frame));
            }
            HeapObject::Map(entries) => {
                self.grey_object(id);
                self.writer.write_generate_fresh_map();
                let entries = entries
                    .iter()
                    .flat_map(|(k, v)| [k.clone(), v.clone()])
                    .collect();
                return Ok(Some(Frame::Map {
                    composite: id,
                    entries,
                    index: 0,
                }));
            }
            HeapObject::Set(elements) => {
                self.grey_object(id);
                self.writer.write_generate_fresh_set();
                return Ok(Some(Frame::Set {
                    composite: id,
                    elements: elements.clone(),
                    index: 0,
                }));
            }

            HeapObject::ArrayBuffer(_) => self.do_serialize_array_buffer(id)?,
            HeapObject::ArrayBufferView(view) => self.do_serialize_array_buffer_view(id, view)?,
            HeapObject::MessagePort(_) => match self.transferred_message_ports.try_get(id) {
                Some(index) => self.writer.write_transferred_message_port(index),
                None => {
                    return Err(SerializeError::data_clone(
                        "A MessagePort could not be cloned because it was not transferred.",
                    ))
                }
            },
            HeapObject::Function { name } => {
                return Err(SerializeError::data_clone(format!(
                    "function {name} could not be cloned."
                )))
            }
            HeapObject::PlatformObject { interface } => {
                return Err(SerializeError::data_clone(format!(
                    "{interface} object could not be cloned."
                )))
            }

            leaf => {
                self.grey_object(id);
                self.write_leaf_object(leaf);
            }
        }
        Ok(None)
    }

    fn write_leaf_object(&mut self, object: &HeapObject) {
        match object {
            HeapObject::Date(t) => self.writer.write_date(*t),
            HeapObject::RegExp { pattern, flags } => self.writer.write_regexp(pattern, *flags),
            HeapObject::StringObject(s) => self.writer.write_string_object(s),
            HeapObject::NumberObject(n) => self.writer.write_number_object(*n),
            HeapObject::BooleanObject(b) => self.writer.write_boolean_object(*b),
            HeapObject::Blob(blob) => self.write_blob(blob),
            HeapObject::File(file) => self.write_file(file),
            HeapObject::FileList(files) => self.write_file_list(files),
            HeapObject::ImageData(image) => self.writer.write_image_data(image),
            HeapObject::CompositorProxy(proxy) => self.writer.write_compositor_proxy(proxy),
            _ => unreachable!("{} is not a leaf", object.kind_name()),
        }
    }
}
