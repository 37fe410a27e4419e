//! A minimal object graph standing in for the script engine.
//!
//! Objects live in an arena and are named by [`ObjectId`]. The serializer
//! only ever inspects a heap; the deserializer builds into one.

mod compare;
mod describe;
mod object;
mod value;

pub use compare::*;
pub use describe::*;
pub use object::*;
pub use value::*;

#[derive(Default, Debug)]
pub struct Heap {
    objects: Vec<HeapObject>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn alloc(&mut self, object: HeapObject) -> ObjectId {
        self.objects.push(object);
        ObjectId::from(self.objects.len() - 1)
    }

    pub fn get(&self, id: ObjectId) -> Option<&HeapObject> {
        self.objects.get(*id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut HeapObject> {
        self.objects.get_mut(*id)
    }

    /* Construction. */

    pub fn new_object(&mut self) -> ObjectId {
        self.alloc(HeapObject::Object(Properties::default()))
    }

    pub fn new_array(&mut self, length: u32) -> ObjectId {
        self.alloc(HeapObject::Array {
            length,
            properties: Properties::default(),
        })
    }

    pub fn new_map(&mut self) -> ObjectId {
        self.alloc(HeapObject::Map(vec![]))
    }

    pub fn new_set(&mut self) -> ObjectId {
        self.alloc(HeapObject::Set(vec![]))
    }

    pub fn new_array_buffer(&mut self, contents: Vec<u8>) -> ObjectId {
        self.alloc(HeapObject::ArrayBuffer(ArrayBuffer {
            contents: Some(contents),
        }))
    }

    /// An object holding `entries`, in order.
    pub fn object_from<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> ObjectId
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        let id = self.new_object();
        for (k, v) in entries {
            self.set_property(id, k, v);
        }
        id
    }

    /// A dense array holding `elements`.
    pub fn array_from<V: Into<Value>>(&mut self, elements: impl IntoIterator<Item = V>) -> ObjectId {
        let id = self.new_array(0);
        for (i, v) in elements.into_iter().enumerate() {
            self.set_property(id, i as u32, v);
        }
        id
    }

    /// Sets a data property. Writing an index at or past an array's length
    /// grows the length. Returns false if `id` cannot hold properties.
    pub fn set_property(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
    ) -> bool {
        self.set_slot(id, key.into(), Slot::Data(value.into()))
    }

    /// Defines a property whose getter throws `thrown`.
    pub fn define_throwing_accessor(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        thrown: impl Into<Value>,
    ) -> bool {
        self.set_slot(id, key.into(), Slot::ThrowingAccessor(thrown.into()))
    }

    fn set_slot(&mut self, id: ObjectId, key: PropertyKey, slot: Slot) -> bool {
        match self.get_mut(id) {
            Some(HeapObject::Object(properties)) => {
                properties.set(key, slot);
                true
            }
            Some(HeapObject::Array { length, properties }) => {
                if let PropertyKey::Index(i) = key {
                    if i >= *length {
                        *length = i + 1;
                    }
                }
                properties.set(key, slot);
                true
            }
            _ => false,
        }
    }

    /// Deletes an own property, leaving a hole if it was an array element.
    pub fn delete_property(&mut self, id: ObjectId, key: &PropertyKey) -> bool {
        match self.get_mut(id) {
            Some(HeapObject::Object(properties)) | Some(HeapObject::Array { properties, .. }) => {
                properties.remove(key).is_some()
            }
            _ => false,
        }
    }

    pub fn map_insert(&mut self, id: ObjectId, key: impl Into<Value>, value: impl Into<Value>) -> bool {
        let (key, value) = (key.into(), value.into());
        match self.get_mut(id) {
            Some(HeapObject::Map(entries)) => {
                match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
                    Some((_, existing)) => *existing = value,
                    None => entries.push((key, value)),
                }
                true
            }
            _ => false,
        }
    }

    pub fn set_add(&mut self, id: ObjectId, element: impl Into<Value>) -> bool {
        let element = element.into();
        match self.get_mut(id) {
            Some(HeapObject::Set(elements)) => {
                if !elements.iter().any(|e| e.same_value_zero(&element)) {
                    elements.push(element);
                }
                true
            }
            _ => false,
        }
    }

    /* Inspection. */

    /// Own enumerable keys in enumeration order. Empty for objects without
    /// properties.
    pub fn own_keys(&self, id: ObjectId) -> Vec<PropertyKey> {
        self.get(id)
            .and_then(HeapObject::properties)
            .map(Properties::keys)
            .unwrap_or_default()
    }

    /// Reads a property, running its getter. Missing properties read as
    /// undefined.
    pub fn get_property(&self, id: ObjectId, key: &PropertyKey) -> Result<Value, HostException> {
        match self.get(id).and_then(HeapObject::properties) {
            Some(properties) => properties.get(key),
            None => Ok(Value::Undefined),
        }
    }

    pub fn array_length(&self, id: ObjectId) -> Option<u32> {
        match self.get(id) {
            Some(HeapObject::Array { length, .. }) => Some(*length),
            _ => None,
        }
    }

    /// `None` if `id` is not an array buffer or has been neutered.
    pub fn array_buffer_contents(&self, id: ObjectId) -> Option<&[u8]> {
        match self.get(id) {
            Some(HeapObject::ArrayBuffer(ArrayBuffer { contents })) => contents.as_deref(),
            _ => None,
        }
    }

    pub fn is_neutered(&self, id: ObjectId) -> bool {
        matches!(
            self.get(id),
            Some(HeapObject::ArrayBuffer(ArrayBuffer { contents: None }))
        )
    }

    /// Moves the contents out of an array buffer, leaving it neutered.
    pub fn neuter_array_buffer(&mut self, id: ObjectId) -> Option<Vec<u8>> {
        match self.get_mut(id) {
            Some(HeapObject::ArrayBuffer(ArrayBuffer { contents })) => contents.take(),
            _ => None,
        }
    }
}
