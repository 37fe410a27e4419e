use crate::heap::{Heap, HeapObject, ObjectId, Slot, Value};
use itertools::Itertools;
use std::collections::HashSet;
use std::fmt::Write;

const MAX_DESCRIBE_DEPTH: usize = 32;

/// Renders a value in a script-like notation, for logs and diagnostics.
///
/// A reference back to an object that is still being rendered prints as
/// `<cycle>`. Graphs nested deeper than a fixed limit are elided.
pub fn describe(heap: &Heap, value: &Value) -> String {
    let mut out = String::new();
    Describer {
        heap,
        ancestors: HashSet::new(),
    }
    .value(&mut out, value, 0);
    out
}

struct Describer<'a> {
    heap: &'a Heap,
    ancestors: HashSet<ObjectId>,
}

impl<'a> Describer<'a> {
    fn value(&mut self, out: &mut String, value: &Value, depth: usize) {
        match value {
            Value::Undefined => out.push_str("undefined"),
            Value::Null => out.push_str("null"),
            Value::Bool(b) => write!(out, "{b}").unwrap_or_default(),
            Value::Number(n) => number(out, *n),
            Value::String(s) => write!(out, "{:?}", s.to_string_lossy()).unwrap_or_default(),
            Value::Object(id) => self.object(out, *id, depth),
        }
    }

    fn object(&mut self, out: &mut String, id: ObjectId, depth: usize) {
        let heap = self.heap;
        let Some(object) = heap.get(id) else {
            out.push_str("<dangling>");
            return;
        };
        if self.ancestors.contains(&id) {
            out.push_str("<cycle>");
            return;
        }
        if depth >= MAX_DESCRIBE_DEPTH {
            out.push_str("...");
            return;
        }
        self.ancestors.insert(id);
        match object {
            HeapObject::Object(properties) | HeapObject::Array { properties, .. } => {
                let is_array = matches!(object, HeapObject::Array { .. });
                let (open, close) = if is_array { ("[", "]") } else { ("{", "}") };
                out.push_str(open);
                for (i, key) in properties.keys().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write!(out, "{key}: ").unwrap_or_default();
                    match properties.slot(key) {
                        Some(Slot::Data(v)) => self.value(out, v, depth + 1),
                        Some(Slot::ThrowingAccessor(_)) => out.push_str("<throwing getter>"),
                        None => {}
                    }
                }
                if let HeapObject::Array { length, .. } = object {
                    if properties.index_count() < *length as usize {
                        write!(out, "; length {length}").unwrap_or_default();
                    }
                }
                out.push_str(close);
            }
            HeapObject::Map(entries) => {
                out.push_str("Map {");
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.value(out, k, depth + 1);
                    out.push_str(" => ");
                    self.value(out, v, depth + 1);
                }
                out.push('}');
            }
            HeapObject::Set(elements) => {
                out.push_str("Set {");
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.value(out, e, depth + 1);
                }
                out.push('}');
            }
            HeapObject::Date(t) => {
                out.push_str("Date(");
                number(out, *t);
                out.push(')');
            }
            HeapObject::RegExp { pattern, flags } => {
                write!(out, "/{pattern}/{:?}", flags).unwrap_or_default()
            }
            HeapObject::StringObject(s) => {
                write!(out, "String({:?})", s.to_string_lossy()).unwrap_or_default()
            }
            HeapObject::NumberObject(n) => {
                out.push_str("Number(");
                number(out, *n);
                out.push(')');
            }
            HeapObject::BooleanObject(b) => write!(out, "Boolean({b})").unwrap_or_default(),
            HeapObject::ArrayBuffer(buffer) => match &buffer.contents {
                Some(bytes) => write!(
                    out,
                    "ArrayBuffer[{}]",
                    bytes.iter().map(|b| format!("{b:02x}")).join(" ")
                )
                .unwrap_or_default(),
                None => out.push_str("ArrayBuffer(neutered)"),
            },
            HeapObject::ArrayBufferView(view) => {
                write!(
                    out,
                    "{:?}View(offset {}, length {}) of ",
                    view.kind, view.byte_offset, view.byte_length
                )
                .unwrap_or_default();
                self.object(out, view.buffer, depth + 1);
            }
            HeapObject::Blob(blob) => write!(
                out,
                "Blob({}, {:?}, {} bytes)",
                blob.uuid, blob.content_type, blob.size
            )
            .unwrap_or_default(),
            HeapObject::File(file) => write!(out, "File({:?}, {})", file.name, file.uuid)
                .unwrap_or_default(),
            HeapObject::FileList(files) => write!(
                out,
                "FileList[{}]",
                files.iter().map(|f| format!("{:?}", f.name)).join(", ")
            )
            .unwrap_or_default(),
            HeapObject::ImageData(image) => {
                write!(out, "ImageData({}x{})", image.width, image.height).unwrap_or_default()
            }
            HeapObject::CompositorProxy(proxy) => write!(
                out,
                "CompositorProxy({}, 0x{:x})",
                proxy.element_id, proxy.attributes
            )
            .unwrap_or_default(),
            HeapObject::MessagePort(port) => {
                write!(out, "MessagePort({})", port.channel).unwrap_or_default()
            }
            HeapObject::Function { name } => write!(out, "function {name}").unwrap_or_default(),
            HeapObject::PlatformObject { interface } => {
                write!(out, "[object {interface}]").unwrap_or_default()
            }
        }
        self.ancestors.remove(&id);
    }
}

fn number(out: &mut String, n: f64) {
    if n == 0.0 && n.is_sign_negative() {
        out.push_str("-0");
    } else {
        write!(out, "{n}").unwrap_or_default();
    }
}
