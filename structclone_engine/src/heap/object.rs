use crate::heap::{HostException, ObjectId, PropertyKey, Value};
use std::collections::BTreeMap;
use structclone_types::types::{
    ArrayBufferViewKind, BlobInfo, CompositorProxyInfo, FileInfo, HostString, ImageDataInfo,
    RegExpFlags,
};

#[derive(PartialEq, Clone, Debug)]
pub enum Slot {
    Data(Value),
    /// A getter that throws its payload whenever it is read.
    ThrowingAccessor(Value),
}

/// Own enumerable properties. Indices enumerate in ascending order, names
/// in insertion order after them.
#[derive(PartialEq, Default, Clone, Debug)]
pub struct Properties {
    indexed: BTreeMap<u32, Slot>,
    named: Vec<(HostString, Slot)>,
}

impl Properties {
    pub fn len(&self) -> usize {
        self.indexed.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index_count(&self) -> usize {
        self.indexed.len()
    }

    pub fn slot(&self, key: &PropertyKey) -> Option<&Slot> {
        match key {
            PropertyKey::Index(i) => self.indexed.get(i),
            PropertyKey::Name(name) => self
                .named
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, slot)| slot),
        }
    }

    pub fn get(&self, key: &PropertyKey) -> Result<Value, HostException> {
        match self.slot(key) {
            None => Ok(Value::Undefined),
            Some(Slot::Data(value)) => Ok(value.clone()),
            Some(Slot::ThrowingAccessor(thrown)) => Err(HostException(thrown.clone())),
        }
    }

    pub fn set(&mut self, key: PropertyKey, slot: Slot) {
        match key {
            PropertyKey::Index(i) => {
                self.indexed.insert(i, slot);
            }
            PropertyKey::Name(name) => match self.named.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = slot,
                None => self.named.push((name, slot)),
            },
        }
    }

    pub fn remove(&mut self, key: &PropertyKey) -> Option<Slot> {
        match key {
            PropertyKey::Index(i) => self.indexed.remove(i),
            PropertyKey::Name(name) => {
                let pos = self.named.iter().position(|(n, _)| n == name)?;
                Some(self.named.remove(pos).1)
            }
        }
    }

    pub fn keys(&self) -> Vec<PropertyKey> {
        self.indexed
            .keys()
            .map(|i| PropertyKey::Index(*i))
            .chain(self.named.iter().map(|(n, _)| PropertyKey::Name(n.clone())))
            .collect()
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct ArrayBuffer {
    /// `None` once neutered.
    pub contents: Option<Vec<u8>>,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct ArrayBufferView {
    pub kind: ArrayBufferViewKind,
    pub buffer: ObjectId,
    pub byte_offset: u32,
    pub byte_length: u32,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct MessagePort {
    pub channel: u64,
}

#[derive(PartialEq, Clone, Debug)]
pub enum HeapObject {
    Object(Properties),
    Array {
        length: u32,
        properties: Properties,
    },
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),

    Date(f64),
    RegExp {
        pattern: String,
        flags: RegExpFlags,
    },
    StringObject(HostString),
    NumberObject(f64),
    BooleanObject(bool),

    ArrayBuffer(ArrayBuffer),
    ArrayBufferView(ArrayBufferView),
    Blob(BlobInfo),
    File(FileInfo),
    FileList(Vec<FileInfo>),
    ImageData(ImageDataInfo),
    CompositorProxy(CompositorProxyInfo),
    MessagePort(MessagePort),

    Function {
        name: String,
    },
    /// Any other host-provided object the wire format has no record for.
    PlatformObject {
        interface: String,
    },
}

impl HeapObject {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "Object",
            Self::Array { .. } => "Array",
            Self::Map(_) => "Map",
            Self::Set(_) => "Set",
            Self::Date(_) => "Date",
            Self::RegExp { .. } => "RegExp",
            Self::StringObject(_) => "String",
            Self::NumberObject(_) => "Number",
            Self::BooleanObject(_) => "Boolean",
            Self::ArrayBuffer(_) => "ArrayBuffer",
            Self::ArrayBufferView(_) => "ArrayBufferView",
            Self::Blob(_) => "Blob",
            Self::File(_) => "File",
            Self::FileList(_) => "FileList",
            Self::ImageData(_) => "ImageData",
            Self::CompositorProxy(_) => "CompositorProxy",
            Self::MessagePort(_) => "MessagePort",
            Self::Function { .. } => "Function",
            Self::PlatformObject { .. } => "PlatformObject",
        }
    }

    pub fn properties(&self) -> Option<&Properties> {
        match self {
            Self::Object(properties) | Self::Array { properties, .. } => Some(properties),
            _ => None,
        }
    }
}
