use crate::wire::WireError;
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

#[derive(From, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct TagInt(u8);
impl From<SerializationTag> for TagInt {
    fn from(tag: SerializationTag) -> Self {
        Self(tag as u8)
    }
}

/// Tag bytes are printable where possible, so that dumps of a stream stay
/// readable. Values are part of the persisted format and must never change.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum SerializationTag {
    /// Ignored, but consumed.
    Padding = 0x00,
    Undefined = b'_',
    Null = b'0',
    True = b'T',
    False = b'F',
    String = b'S',
    StringUChar = b'c',
    Int32 = b'I',
    Uint32 = b'U',
    Date = b'D',
    MessagePort = b'M',
    Number = b'N',
    Blob = b'b',
    BlobIndex = b'i',
    File = b'f',
    FileIndex = b'e',
    FileList = b'l',
    FileListIndex = b'L',
    ImageData = b'#',
    Object = b'{',
    SparseArray = b'@',
    DenseArray = b'$',
    Map = b':',
    Set = b'\'',
    RegExp = b'R',
    ArrayBuffer = b'B',
    ArrayBufferTransfer = b't',
    ArrayBufferView = b'V',
    ObjectReference = b'^',
    GenerateFreshObject = b'o',
    GenerateFreshSparseArray = b'a',
    GenerateFreshDenseArray = b'A',
    GenerateFreshMap = b';',
    GenerateFreshSet = b',',
    StringObject = b's',
    NumberObject = b'n',
    TrueObject = b'y',
    FalseObject = b'x',
    CompositorProxy = b'C',
    Version = 0xFF,
}

impl TryFrom<TagInt> for SerializationTag {
    type Error = WireError;
    fn try_from(int: TagInt) -> Result<Self, WireError> {
        SerializationTag::from_u8(int.0).ok_or(WireError::UnknownTag(int.0))
    }
}

impl SerializationTag {
    pub fn to_byte(self) -> u8 {
        *TagInt::from(self)
    }
}
