use derive_more::{Deref, From};
use std::fmt;
use structclone_types::types::HostString;
use thiserror::Error;

/// Identity of an object within one [`crate::heap::Heap`].
#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct ObjectId(usize);

#[derive(PartialEq, Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(HostString),
    Object(ObjectId),
}

impl Value {
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// The equality Map keys and Set elements are compared by.
    /// NaN equals NaN; +0 equals -0.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Number(i as f64)
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(HostString::new(s))
    }
}
impl From<HostString> for Value {
    fn from(s: HostString) -> Self {
        Self::String(s)
    }
}
impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}

/// Array indices are kept apart from names so that enumeration can put
/// them first, in ascending order.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum PropertyKey {
    Index(u32),
    Name(HostString),
}

impl PropertyKey {
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Interprets a value read back as a property name.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                let i = *n as u32;
                if i as f64 == *n && i != u32::MAX {
                    Some(Self::Index(i))
                } else {
                    None
                }
            }
            Value::String(s) => Some(Self::from(s.clone())),
            _ => None,
        }
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        Self::Index(i)
    }
}
impl From<HostString> for PropertyKey {
    fn from(s: HostString) -> Self {
        match s.as_array_index() {
            Some(i) => Self::Index(i),
            None => Self::Name(s),
        }
    }
}
impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::from(HostString::new(s))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(s) => write!(f, "{s}"),
        }
    }
}

/// A value thrown by host code while the serializer was inspecting a value.
#[derive(Error, PartialEq, Clone, Debug)]
#[error("uncaught exception: {0:?}")]
pub struct HostException(pub Value);
