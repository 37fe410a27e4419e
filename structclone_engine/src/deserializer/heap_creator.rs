use crate::deserializer::{CompositeCreator, Leaf};
use crate::heap::{ArrayBufferView, Heap, HeapObject, ObjectId, PropertyKey, Value};
use crate::status::DeserializeError;
use itertools::Itertools;
use structclone_types::types::ArrayBufferViewKind;
use structclone_types::wire::WireError;

/// Builds deserialized values into a [`Heap`].
pub struct HeapCreator<'h, 'p> {
    heap: &'h mut Heap,
    stack: Vec<Value>,
    object_pool: Vec<Value>,
    open_composite_reference_stack: Vec<u32>,

    message_ports: &'p [ObjectId],
    /// Contents of transferred buffers not yet materialized.
    array_buffer_contents: Vec<Option<Vec<u8>>>,
    array_buffers: Vec<Option<ObjectId>>,
}

impl<'h, 'p> HeapCreator<'h, 'p> {
    pub fn new(heap: &'h mut Heap) -> Self {
        Self {
            heap,
            stack: vec![],
            object_pool: vec![],
            open_composite_reference_stack: vec![],
            message_ports: &[],
            array_buffer_contents: vec![],
            array_buffers: vec![],
        }
    }

    pub fn with_message_ports(mut self, message_ports: &'p [ObjectId]) -> Self {
        self.message_ports = message_ports;
        self
    }

    pub fn with_array_buffer_contents(mut self, contents: Vec<Vec<u8>>) -> Self {
        self.array_buffers = vec![None; contents.len()];
        self.array_buffer_contents = contents.into_iter().map(Some).collect();
        self
    }

    /// Hands back the transferred contents after a failed read. Buffers
    /// already built from them are neutered again.
    pub fn reclaim_array_buffer_contents(self) -> Vec<Vec<u8>> {
        let Self {
            heap,
            array_buffer_contents,
            array_buffers,
            ..
        } = self;
        array_buffer_contents
            .into_iter()
            .zip(array_buffers)
            .map(|(contents, id)| {
                contents
                    .or_else(|| id.and_then(|id| heap.neuter_array_buffer(id)))
                    .unwrap_or_default()
            })
            .collect()
    }

    fn pop_values(&mut self, count: u64) -> Result<Vec<Value>, DeserializeError> {
        let depth = self.stack.len();
        if count > depth as u64 {
            return Err(DeserializeError::StackUnderflow {
                needed: count,
                depth,
            });
        }
        Ok(self.stack.split_off(depth - count as usize))
    }

    fn open_composite(&mut self, id: ObjectId) {
        let reference = self.object_pool.len() as u32;
        self.open_composite_reference_stack.push(reference);
        self.object_pool.push(Value::Object(id));
    }

    fn close_composite(
        &mut self,
        closed: &'static str,
        is_kind: fn(&HeapObject) -> bool,
    ) -> Result<ObjectId, DeserializeError> {
        let reference = self
            .open_composite_reference_stack
            .pop()
            .ok_or(DeserializeError::NoOpenComposite)?;
        let id = self
            .object_pool
            .get(reference as usize)
            .and_then(Value::as_object)
            .ok_or(DeserializeError::BadObjectReference(reference))?;
        match self.heap.get(id) {
            Some(object) if is_kind(object) => Ok(id),
            _ => Err(DeserializeError::CompositeMismatch { closed }),
        }
    }

    fn initialize_object(&mut self, id: ObjectId, num_properties: u32) -> Result<(), DeserializeError> {
        let pairs = self.pop_values(2 * num_properties as u64)?;
        for (key, value) in pairs.into_iter().tuples() {
            let key = PropertyKey::from_value(&key).ok_or(DeserializeError::InvalidPropertyKey)?;
            self.heap.set_property(id, key, value);
        }
        Ok(())
    }

    fn even_length(what: &'static str, length: u32) -> Result<(), DeserializeError> {
        if length % 2 != 0 {
            return Err(WireError::InvalidLength {
                what,
                len: length as u64,
            }
            .into());
        }
        Ok(())
    }
}

fn is_object(object: &HeapObject) -> bool {
    matches!(object, HeapObject::Object(_))
}
fn is_array(object: &HeapObject) -> bool {
    matches!(object, HeapObject::Array { .. })
}
fn is_map(object: &HeapObject) -> bool {
    matches!(object, HeapObject::Map(_))
}
fn is_set(object: &HeapObject) -> bool {
    matches!(object, HeapObject::Set(_))
}

impl<'h, 'p> CompositeCreator for HeapCreator<'h, 'p> {
    type Value = Value;

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn consume_top_of_stack(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn new_object(&mut self) -> Result<(), DeserializeError> {
        let id = self.heap.new_object();
        self.open_composite(id);
        Ok(())
    }

    fn new_sparse_array(&mut self, length: u32) -> Result<(), DeserializeError> {
        let id = self.heap.new_array(length);
        self.open_composite(id);
        Ok(())
    }

    fn new_dense_array(&mut self, length: u32) -> Result<(), DeserializeError> {
        self.new_sparse_array(length)
    }

    fn new_map(&mut self) -> Result<(), DeserializeError> {
        let id = self.heap.new_map();
        self.open_composite(id);
        Ok(())
    }

    fn new_set(&mut self) -> Result<(), DeserializeError> {
        let id = self.heap.new_set();
        self.open_composite(id);
        Ok(())
    }

    fn open_composite_count(&self) -> usize {
        self.open_composite_reference_stack.len()
    }

    fn complete_object(&mut self, num_properties: u32) -> Result<Value, DeserializeError> {
        let id = self.close_composite("Object", is_object)?;
        self.initialize_object(id, num_properties)?;
        Ok(Value::Object(id))
    }

    fn complete_sparse_array(
        &mut self,
        num_properties: u32,
        _length: u32,
    ) -> Result<Value, DeserializeError> {
        let id = self.close_composite("SparseArray", is_array)?;
        self.initialize_object(id, num_properties)?;
        Ok(Value::Object(id))
    }

    fn complete_dense_array(
        &mut self,
        num_properties: u32,
        length: u32,
    ) -> Result<Value, DeserializeError> {
        let id = self.close_composite("DenseArray", is_array)?;
        self.initialize_object(id, num_properties)?;
        let elements = self.pop_values(length as u64)?;
        for (i, element) in elements.into_iter().enumerate() {
            // Holes were written as undefined.
            if !element.is_undefined() {
                self.heap.set_property(id, i as u32, element);
            }
        }
        Ok(Value::Object(id))
    }

    fn complete_map(&mut self, length: u32) -> Result<Value, DeserializeError> {
        let id = self.close_composite("Map", is_map)?;
        Self::even_length("map entries", length)?;
        let entries = self.pop_values(length as u64)?;
        for (key, value) in entries.into_iter().tuples() {
            self.heap.map_insert(id, key, value);
        }
        Ok(Value::Object(id))
    }

    fn complete_set(&mut self, length: u32) -> Result<Value, DeserializeError> {
        let id = self.close_composite("Set", is_set)?;
        let elements = self.pop_values(length as u64)?;
        for element in elements {
            self.heap.set_add(id, element);
        }
        Ok(Value::Object(id))
    }

    fn push_object_reference(&mut self, value: &Value) {
        self.object_pool.push(value.clone());
    }

    fn try_get_object_from_object_reference(&self, reference: u32) -> Option<Value> {
        self.object_pool.get(reference as usize).cloned()
    }

    fn object_reference_count(&self) -> usize {
        self.object_pool.len()
    }

    fn try_get_transferred_message_port(&mut self, index: u32) -> Option<Value> {
        self.message_ports.get(index as usize).copied().map(Value::Object)
    }

    /// The first reference materializes the buffer; later ones share it.
    fn try_get_transferred_array_buffer(&mut self, index: u32) -> Option<Value> {
        let index = index as usize;
        if let Some(id) = self.array_buffers.get(index).copied().flatten() {
            return Some(Value::Object(id));
        }
        let contents = self.array_buffer_contents.get_mut(index)?.take()?;
        let id = self.heap.new_array_buffer(contents);
        self.array_buffers[index] = Some(id);
        Some(Value::Object(id))
    }

    fn create_leaf(&mut self, leaf: Leaf) -> Result<Value, DeserializeError> {
        let object = match leaf {
            Leaf::Undefined => return Ok(Value::Undefined),
            Leaf::Null => return Ok(Value::Null),
            Leaf::Bool(b) => return Ok(Value::Bool(b)),
            Leaf::Number(n) => return Ok(Value::Number(n)),
            Leaf::String(s) => return Ok(Value::String(s)),

            Leaf::Date(t) => HeapObject::Date(t),
            Leaf::RegExp { pattern, flags } => HeapObject::RegExp { pattern, flags },
            Leaf::StringObject(s) => HeapObject::StringObject(s),
            Leaf::NumberObject(n) => HeapObject::NumberObject(n),
            Leaf::BooleanObject(b) => HeapObject::BooleanObject(b),
            Leaf::ArrayBuffer(contents) => return Ok(Value::Object(self.heap.new_array_buffer(contents))),
            Leaf::Blob(blob) => HeapObject::Blob(blob),
            Leaf::File(file) => HeapObject::File(file),
            Leaf::FileList(files) => HeapObject::FileList(files),
            Leaf::ImageData(image) => HeapObject::ImageData(image),
            Leaf::CompositorProxy(proxy) => HeapObject::CompositorProxy(proxy),
        };
        Ok(Value::Object(self.heap.alloc(object)))
    }

    fn create_array_buffer_view(
        &mut self,
        buffer: Value,
        kind: ArrayBufferViewKind,
        byte_offset: u32,
        byte_length: u32,
    ) -> Result<Value, DeserializeError> {
        let buffer = buffer
            .as_object()
            .ok_or(DeserializeError::ViewWithoutBuffer)?;
        let buffer_len = match self.heap.get(buffer) {
            Some(HeapObject::ArrayBuffer(contents)) => {
                contents.contents.as_ref().map_or(0, Vec::len) as u64
            }
            _ => return Err(DeserializeError::ViewWithoutBuffer),
        };
        let element_size = kind.element_size();
        if byte_offset as u64 + byte_length as u64 > buffer_len
            || byte_offset % element_size != 0
            || byte_length % element_size != 0
        {
            return Err(DeserializeError::ViewOutOfBounds);
        }
        let view = self.heap.alloc(HeapObject::ArrayBufferView(ArrayBufferView {
            kind,
            buffer,
            byte_offset,
            byte_length,
        }));
        Ok(Value::Object(view))
    }
}
