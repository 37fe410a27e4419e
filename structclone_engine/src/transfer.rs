use crate::heap::{Heap, HeapObject, ObjectId, Value};
use crate::status::SerializeError;

/// The objects whose ownership moves with a serialized value instead of
/// being copied into it.
#[derive(Default, Clone, Debug)]
pub struct Transferables {
    pub array_buffers: Vec<ObjectId>,
    pub message_ports: Vec<ObjectId>,
}

impl Transferables {
    /// Sorts a transfer list into ports and buffers.
    ///
    /// Duplicates, already neutered buffers and anything that is neither a
    /// port nor a buffer are clone errors.
    pub fn extract(heap: &Heap, transfer_list: &[Value]) -> Result<Self, SerializeError> {
        let mut transferables = Self::default();
        for (i, value) in transfer_list.iter().enumerate() {
            let object = value.as_object().and_then(|id| Some((id, heap.get(id)?)));
            match object {
                Some((id, HeapObject::MessagePort(_))) => {
                    if transferables.message_ports.contains(&id) {
                        return Err(SerializeError::data_clone(format!(
                            "Message port at index {i} is a duplicate of an earlier port."
                        )));
                    }
                    transferables.message_ports.push(id);
                }
                Some((id, HeapObject::ArrayBuffer(buffer))) => {
                    if transferables.array_buffers.contains(&id) {
                        return Err(SerializeError::data_clone(format!(
                            "ArrayBuffer at index {i} is a duplicate of an earlier ArrayBuffer. \
                             Duplicate ArrayBuffers cannot be transferred."
                        )));
                    }
                    if buffer.contents.is_none() {
                        return Err(SerializeError::data_clone(format!(
                            "ArrayBuffer at index {i} is already neutered."
                        )));
                    }
                    transferables.array_buffers.push(id);
                }
                _ => {
                    return Err(SerializeError::data_clone(format!(
                        "Value at index {i} does not have a transferable type."
                    )));
                }
            }
        }
        Ok(transferables)
    }

    pub fn is_empty(&self) -> bool {
        self.array_buffers.is_empty() && self.message_ports.is_empty()
    }

    /// Moves the contents out of every transferred buffer, in transfer
    /// list order.
    pub fn neuter_array_buffers(&self, heap: &mut Heap) -> Result<Vec<Vec<u8>>, SerializeError> {
        self.array_buffers
            .iter()
            .enumerate()
            .map(|(i, id)| {
                heap.neuter_array_buffer(*id).ok_or_else(|| {
                    SerializeError::data_clone(format!(
                        "ArrayBuffer at index {i} is already neutered."
                    ))
                })
            })
            .collect()
    }
}
