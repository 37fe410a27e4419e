use crate::types::{
    ArrayBufferViewKind, BlobInfo, CompositorProxyInfo, FileInfo, HostString, ImageDataInfo,
    RegExpFlags,
};

/// One decoded record of the stream, payload included.
///
/// Tokens are representation-neutral: they say what the writer wrote, not
/// what value the reader should build from it.
#[derive(PartialEq, Clone, Debug)]
pub enum Token {
    Undefined,
    Null,
    True,
    False,
    Int32(i32),
    Uint32(u32),
    Number(f64),
    Date(f64),
    String(HostString),

    StringObject(HostString),
    NumberObject(f64),
    TrueObject,
    FalseObject,
    RegExp { pattern: String, flags: RegExpFlags },

    Blob(BlobInfo),
    BlobIndex(u32),
    File(FileInfo),
    FileIndex(u32),
    FileList(Vec<FileInfo>),
    FileListIndex(Vec<u32>),
    ImageData(ImageDataInfo),
    ArrayBuffer(Vec<u8>),
    ArrayBufferView {
        kind: ArrayBufferViewKind,
        byte_offset: u32,
        byte_length: u32,
    },
    TransferredArrayBuffer(u32),
    TransferredMessagePort(u32),
    CompositorProxy(CompositorProxyInfo),

    ObjectReference(u32),

    GenerateFreshObject,
    GenerateFreshSparseArray(u32),
    GenerateFreshDenseArray(u32),
    GenerateFreshMap,
    GenerateFreshSet,

    Object { num_properties: u32 },
    SparseArray { num_properties: u32, length: u32 },
    DenseArray { num_properties: u32, length: u32 },
    Map { length: u32 },
    Set { length: u32 },
}

impl Token {
    pub fn is_composite_open(&self) -> bool {
        matches!(
            self,
            Self::GenerateFreshObject
                | Self::GenerateFreshSparseArray(_)
                | Self::GenerateFreshDenseArray(_)
                | Self::GenerateFreshMap
                | Self::GenerateFreshSet
        )
    }

    pub fn is_composite_close(&self) -> bool {
        matches!(
            self,
            Self::Object { .. }
                | Self::SparseArray { .. }
                | Self::DenseArray { .. }
                | Self::Map { .. }
                | Self::Set { .. }
        )
    }
}
