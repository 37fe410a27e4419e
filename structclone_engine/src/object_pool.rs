use crate::heap::ObjectId;
use std::collections::HashMap;

/// Maps objects to the small integers the stream refers to them by.
#[derive(Default, Debug)]
pub struct ObjectPool {
    map: HashMap<ObjectId, u32>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_get(&self, id: ObjectId) -> Option<u32> {
        self.map.get(&id).copied()
    }

    pub fn set(&mut self, id: ObjectId, index: u32) {
        self.map.insert(id, index);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
