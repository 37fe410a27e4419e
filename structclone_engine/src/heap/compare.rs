use crate::heap::{Heap, HeapObject, ObjectId, Properties, Slot, Value};
use std::collections::HashMap;

/// Whether two values, each in its own heap, are the same graph.
///
/// Objects are matched one-to-one: two references to one object on the left
/// must correspond to two references to one object on the right, which is
/// what makes cycles and sharing comparable. Numbers compare like
/// `Object.is`, so NaN matches NaN and -0 does not match +0.
pub fn graph_eq(left_heap: &Heap, left: &Value, right_heap: &Heap, right: &Value) -> bool {
    GraphEq {
        left_heap,
        right_heap,
        left_to_right: HashMap::new(),
        right_to_left: HashMap::new(),
        pending: vec![],
    }
    .run(left, right)
}

struct GraphEq<'a> {
    left_heap: &'a Heap,
    right_heap: &'a Heap,
    left_to_right: HashMap<ObjectId, ObjectId>,
    right_to_left: HashMap<ObjectId, ObjectId>,
    pending: Vec<(ObjectId, ObjectId)>,
}

impl<'a> GraphEq<'a> {
    fn run(mut self, left: &Value, right: &Value) -> bool {
        if !self.values(left, right) {
            return false;
        }
        let (left_heap, right_heap) = (self.left_heap, self.right_heap);
        while let Some((l, r)) = self.pending.pop() {
            let (Some(lo), Some(ro)) = (left_heap.get(l), right_heap.get(r)) else {
                return false;
            };
            if !self.objects(lo, ro) {
                return false;
            }
        }
        true
    }

    /// Compares primitives now and queues newly paired objects.
    fn values(&mut self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Number(l), Value::Number(r)) => numbers_eq(*l, *r),
            (Value::Object(l), Value::Object(r)) => self.pair(*l, *r),
            _ => left == right,
        }
    }

    fn pair(&mut self, l: ObjectId, r: ObjectId) -> bool {
        match (self.left_to_right.get(&l), self.right_to_left.get(&r)) {
            (Some(mapped_r), Some(mapped_l)) => *mapped_r == r && *mapped_l == l,
            (None, None) => {
                self.left_to_right.insert(l, r);
                self.right_to_left.insert(r, l);
                self.pending.push((l, r));
                true
            }
            _ => false,
        }
    }

    fn value_lists<'v>(
        &mut self,
        left: impl ExactSizeIterator<Item = &'v Value>,
        right: impl ExactSizeIterator<Item = &'v Value>,
    ) -> bool {
        left.len() == right.len() && left.zip(right).all(|(l, r)| self.values(l, r))
    }

    fn properties(&mut self, left: &Properties, right: &Properties) -> bool {
        let keys = left.keys();
        if keys != right.keys() {
            return false;
        }
        keys.iter().all(|key| match (left.slot(key), right.slot(key)) {
            (Some(Slot::Data(l)), Some(Slot::Data(r)))
            | (Some(Slot::ThrowingAccessor(l)), Some(Slot::ThrowingAccessor(r))) => {
                self.values(l, r)
            }
            _ => false,
        })
    }

    fn objects(&mut self, left: &HeapObject, right: &HeapObject) -> bool {
        use HeapObject::*;
        match (left, right) {
            (Object(l), Object(r)) => self.properties(l, r),
            (
                Array {
                    length: l_len,
                    properties: l,
                },
                Array {
                    length: r_len,
                    properties: r,
                },
            ) => l_len == r_len && self.properties(l, r),
            (Map(l), Map(r)) => {
                l.len() == r.len()
                    && l.iter()
                        .zip(r.iter())
                        .all(|((lk, lv), (rk, rv))| self.values(lk, rk) && self.values(lv, rv))
            }
            (Set(l), Set(r)) => self.value_lists(l.iter(), r.iter()),
            (Date(l), Date(r)) | (NumberObject(l), NumberObject(r)) => numbers_eq(*l, *r),
            (ArrayBufferView(l), ArrayBufferView(r)) => {
                l.kind == r.kind
                    && l.byte_offset == r.byte_offset
                    && l.byte_length == r.byte_length
                    && self.pair(l.buffer, r.buffer)
            }
            // The remaining kinds hold no references.
            _ => left == right,
        }
    }
}

fn numbers_eq(l: f64, r: f64) -> bool {
    if l.is_nan() || r.is_nan() {
        return l.is_nan() && r.is_nan();
    }
    l == r && l.is_sign_negative() == r.is_sign_negative()
}
