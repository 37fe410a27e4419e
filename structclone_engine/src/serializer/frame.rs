use crate::heap::{ObjectId, PropertyKey, Value};

/// Position within an object's own enumerable keys.
#[derive(Debug)]
pub(crate) struct PropertyCursor {
    keys: Vec<PropertyKey>,
    index: usize,
    pub(crate) num_serialized: u32,
}

impl PropertyCursor {
    pub(crate) fn new(keys: Vec<PropertyKey>) -> Self {
        Self {
            keys,
            index: 0,
            num_serialized: 0,
        }
    }

    /// The next key to write. Indices are skipped when `skip_indices`, as
    /// dense arrays have already written their elements.
    pub(crate) fn next_key(&mut self, skip_indices: bool) -> Option<PropertyKey> {
        while let Some(key) = self.keys.get(self.index) {
            self.index += 1;
            if !(skip_indices && key.is_index()) {
                return Some(key.clone());
            }
        }
        None
    }
}

/// One composite whose children are still being written.
#[derive(Debug)]
pub(crate) enum Frame {
    Object {
        composite: ObjectId,
        properties: PropertyCursor,
    },
    DenseArray {
        composite: ObjectId,
        length: u32,
        /// Next element to write; equals `length` once elements are done.
        array_index: u32,
        properties: PropertyCursor,
    },
    SparseArray {
        composite: ObjectId,
        length: u32,
        properties: PropertyCursor,
    },
    /// Keys and values, flattened.
    Map {
        composite: ObjectId,
        entries: Vec<Value>,
        index: usize,
    },
    Set {
        composite: ObjectId,
        elements: Vec<Value>,
        index: usize,
    },
}

impl Frame {
    pub(crate) fn composite(&self) -> ObjectId {
        match self {
            Self::Object { composite, .. }
            | Self::DenseArray { composite, .. }
            | Self::SparseArray { composite, .. }
            | Self::Map { composite, .. }
            | Self::Set { composite, .. } => *composite,
        }
    }
}
