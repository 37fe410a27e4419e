use crate::heap::HostException;
use structclone_types::wire::WireError;
use thiserror::Error;

/// Outcome of one serialization, as reported to script.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Status {
    Success,
    InputError,
    DataCloneError,
    JSException,
}

#[derive(Error, PartialEq, Clone, Debug)]
pub enum SerializeError {
    /// The input graph is unsuitable, e.g. nested too deeply.
    #[error("InputError: {0}")]
    InputError(String),

    #[error("DataCloneError: {0}")]
    DataCloneError(String),

    #[error(transparent)]
    HostException(#[from] HostException),
}

impl SerializeError {
    pub fn status(&self) -> Status {
        match self {
            Self::InputError(_) => Status::InputError,
            Self::DataCloneError(_) => Status::DataCloneError,
            Self::HostException(_) => Status::JSException,
        }
    }

    pub(crate) fn data_clone(message: impl Into<String>) -> Self {
        Self::DataCloneError(message.into())
    }
}

#[derive(Error, PartialEq, Clone, Debug)]
pub enum DeserializeError {
    #[error(transparent)]
    Malformed(#[from] WireError),

    #[error("object reference {0} is out of range")]
    BadObjectReference(u32),
    #[error("transferred array buffer {0} is unavailable")]
    BadTransferredArrayBuffer(u32),
    #[error("transferred message port {0} is unavailable")]
    BadTransferredMessagePort(u32),
    #[error("blob index {0} is unavailable")]
    BadBlobIndex(u32),

    #[error("{needed} values needed, stack holds {depth}")]
    StackUnderflow { needed: u64, depth: usize },
    #[error("a composite was closed while none was open")]
    NoOpenComposite,
    #[error("{closed} closes a composite of another kind")]
    CompositeMismatch { closed: &'static str },
    #[error("stream ended holding {values} values and {open} open composites")]
    Unbalanced { values: usize, open: usize },
    #[error("value cannot name a property")]
    InvalidPropertyKey,
    #[error("array buffer view lies outside its buffer")]
    ViewOutOfBounds,
    #[error("array buffer view is not preceded by an array buffer")]
    ViewWithoutBuffer,
}
