use crate::types::{
    ArrayBufferViewKind, BlobInfo, CompositorProxyInfo, FileInfo, FileSnapshot, HostString,
    ImageDataInfo, RegExpFlags,
};
use crate::wire::*;
use num_traits::{FromPrimitive, PrimInt, Unsigned};
use std::mem;


#[derive(PartialEq, Eq, Debug)]
pub enum ReadResult<T> {
    EOF,
    Some(usize, T),
}

/// Decodes records from a fixed buffer.
///
/// Every read is bounds-checked against the buffer; on failure the position
/// is somewhere at or before the end of the buffer, and the reader should be
/// discarded.
pub struct WireReader<'a> {
    buffer: &'a [u8],
    position: usize,
    version: u32,
}

impl<'a> WireReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            version: LEGACY_VERSION,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Consumes any padding, then reports whether the stream is exhausted.
    pub fn is_eof(&mut self) -> bool {
        while self.buffer.get(self.position) == Some(&SerializationTag::Padding.to_byte()) {
            self.position += 1;
        }
        self.position >= self.buffer.len()
    }

    /// Reads the optional leading version record and caches the version.
    ///
    /// A stream that does not start with the version tag is version 0; its
    /// first byte is left unread.
    pub fn read_version(&mut self) -> Result<u32, WireError> {
        let version = match self.buffer.get(self.position) {
            Some(byte) if *byte == SerializationTag::Version.to_byte() => {
                self.position += 1;
                self.read_uint32()?
            }
            _ => LEGACY_VERSION,
        };
        if version > WIRE_FORMAT_VERSION {
            return Err(WireError::UnsupportedVersion(version));
        }
        self.version = version;
        Ok(version)
    }

    pub fn read_tag(&mut self) -> Result<SerializationTag, WireError> {
        if self.is_eof() {
            return Err(WireError::UnexpectedEnd(self.position));
        }
        let int = TagInt::from(self.buffer[self.position]);
        self.position += 1;
        SerializationTag::try_from(int)
    }

    pub fn undo_read_tag(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    pub fn tokens(self) -> Tokens<'a> {
        Tokens {
            r: self,
            failed: false,
        }
    }
}

/* Records. */
impl<'a> WireReader<'a> {
    /// Decodes the next whole record.
    ///
    /// @return the count of bytes consumed, including any padding before the record.
    pub fn read_token(&mut self) -> Result<ReadResult<Token>, WireError> {
        let start = self.position;
        if self.is_eof() {
            return Ok(ReadResult::EOF);
        }
        let tag = self.read_tag()?;
        let token = self.read_token_body(tag)?;
        Ok(ReadResult::Some(self.position - start, token))
    }

    fn read_token_body(&mut self, tag: SerializationTag) -> Result<Token, WireError> {
        use SerializationTag as T;

        let token = match tag {
            T::Padding | T::Version => return Err(WireError::UnexpectedTag(tag)),

            T::Undefined => Token::Undefined,
            T::Null => Token::Null,
            T::True => Token::True,
            T::False => Token::False,
            T::Int32 => Token::Int32(varint::zigzag_decode(self.read_uint32()?)),
            T::Uint32 => Token::Uint32(self.read_uint32()?),
            T::Number => Token::Number(self.read_number()?),
            T::Date => Token::Date(self.read_number()?),
            T::String | T::StringUChar => Token::String(self.read_string_body(tag)?),

            T::StringObject => {
                let inner = self.read_tag()?;
                match inner {
                    T::String | T::StringUChar => {
                        Token::StringObject(self.read_string_body(inner)?)
                    }
                    _ => return Err(WireError::UnexpectedTag(inner)),
                }
            }
            T::NumberObject => Token::NumberObject(self.read_number()?),
            T::TrueObject => Token::TrueObject,
            T::FalseObject => Token::FalseObject,
            T::RegExp => {
                let pattern = self.read_raw_string("regexp pattern")?;
                let bits = self.read_uint32()?;
                let flags = RegExpFlags::from_bits(bits).ok_or(WireError::InvalidValue {
                    what: "regexp flags",
                    value: bits as u64,
                })?;
                Token::RegExp { pattern, flags }
            }

            T::Blob => {
                self.require_version(tag, BLOB_UUID_VERSION)?;
                let uuid = self.read_raw_string("blob uuid")?;
                let content_type = self.read_raw_string("blob type")?;
                let size = self.read_uint64()?;
                Token::Blob(BlobInfo {
                    uuid,
                    content_type,
                    size,
                })
            }
            T::BlobIndex => {
                self.require_version(tag, INDEXED_BLOBS_VERSION)?;
                Token::BlobIndex(self.read_uint32()?)
            }
            T::File => {
                self.require_version(tag, BLOB_UUID_VERSION)?;
                Token::File(self.read_file()?)
            }
            T::FileIndex => {
                self.require_version(tag, INDEXED_BLOBS_VERSION)?;
                Token::FileIndex(self.read_uint32()?)
            }
            T::FileList => {
                self.require_version(tag, BLOB_UUID_VERSION)?;
                let len = self.read_uint32()? as usize;
                // Every file takes at least one byte per field.
                let mut files = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    files.push(self.read_file()?);
                }
                Token::FileList(files)
            }
            T::FileListIndex => {
                self.require_version(tag, INDEXED_BLOBS_VERSION)?;
                let len = self.read_uint32()? as usize;
                let mut indexes = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    indexes.push(self.read_uint32()?);
                }
                Token::FileListIndex(indexes)
            }
            T::ImageData => {
                let width = self.read_uint32()?;
                let height = self.read_uint32()?;
                let len = self.read_uint32()?;
                if ImageDataInfo::expected_len(width, height) != Some(len as usize) {
                    return Err(WireError::InvalidLength {
                        what: "image data",
                        len: len as u64,
                    });
                }
                let data = self.read_bytes(len as usize, "image data")?.to_vec();
                Token::ImageData(ImageDataInfo {
                    width,
                    height,
                    data,
                })
            }
            T::ArrayBuffer => {
                let len = self.read_uint32()?;
                let contents = self.read_bytes(len as usize, "array buffer")?.to_vec();
                Token::ArrayBuffer(contents)
            }
            T::ArrayBufferView => {
                let subtag = self.read_bytes(1, "array buffer view subtag")?[0];
                let kind =
                    ArrayBufferViewKind::from_u8(subtag).ok_or(WireError::InvalidValue {
                        what: "array buffer view subtag",
                        value: subtag as u64,
                    })?;
                let byte_offset = self.read_uint32()?;
                let byte_length = self.read_uint32()?;
                Token::ArrayBufferView {
                    kind,
                    byte_offset,
                    byte_length,
                }
            }
            T::ArrayBufferTransfer => Token::TransferredArrayBuffer(self.read_uint32()?),
            T::MessagePort => Token::TransferredMessagePort(self.read_uint32()?),
            T::CompositorProxy => {
                let element_id = self.read_uint64()?;
                let attributes = self.read_uint32()?;
                Token::CompositorProxy(CompositorProxyInfo {
                    element_id,
                    attributes,
                })
            }

            T::ObjectReference => {
                self.require_version(tag, FRESH_COMPOSITES_VERSION)?;
                Token::ObjectReference(self.read_uint32()?)
            }

            T::GenerateFreshObject => {
                self.require_version(tag, FRESH_COMPOSITES_VERSION)?;
                Token::GenerateFreshObject
            }
            T::GenerateFreshSparseArray => {
                self.require_version(tag, FRESH_COMPOSITES_VERSION)?;
                Token::GenerateFreshSparseArray(self.read_uint32()?)
            }
            T::GenerateFreshDenseArray => {
                self.require_version(tag, FRESH_COMPOSITES_VERSION)?;
                Token::GenerateFreshDenseArray(self.read_uint32()?)
            }
            T::GenerateFreshMap => {
                self.require_version(tag, MAP_SET_VERSION)?;
                Token::GenerateFreshMap
            }
            T::GenerateFreshSet => {
                self.require_version(tag, MAP_SET_VERSION)?;
                Token::GenerateFreshSet
            }

            T::Object => Token::Object {
                num_properties: self.read_uint32()?,
            },
            T::SparseArray => {
                let num_properties = self.read_uint32()?;
                let length = self.read_uint32()?;
                Token::SparseArray {
                    num_properties,
                    length,
                }
            }
            T::DenseArray => {
                let num_properties = self.read_uint32()?;
                let length = self.read_uint32()?;
                Token::DenseArray {
                    num_properties,
                    length,
                }
            }
            T::Map => {
                self.require_version(tag, MAP_SET_VERSION)?;
                Token::Map {
                    length: self.read_uint32()?,
                }
            }
            T::Set => {
                self.require_version(tag, MAP_SET_VERSION)?;
                Token::Set {
                    length: self.read_uint32()?,
                }
            }
        };
        Ok(token)
    }

    fn require_version(&self, tag: SerializationTag, required: u32) -> Result<(), WireError> {
        if self.version < required {
            return Err(WireError::UnsupportedInVersion {
                tag,
                required,
                version: self.version,
            });
        }
        Ok(())
    }

    fn read_string_body(&mut self, tag: SerializationTag) -> Result<HostString, WireError> {
        let byte_len = self.read_uint32()? as usize;
        if tag == SerializationTag::String {
            let bytes = self.read_bytes(byte_len, "string")?;
            return Ok(HostString::OneByte(bytes.to_vec()));
        }

        self.require_version(tag, STRING_UCHAR_VERSION)?;
        if byte_len % mem::size_of::<u16>() != 0 {
            return Err(WireError::InvalidLength {
                what: "utf-16 string",
                len: byte_len as u64,
            });
        }
        let bytes = self.read_bytes(byte_len, "utf-16 string")?;
        let units = bytes
            .chunks_exact(mem::size_of::<u16>())
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(HostString::TwoByte(units))
    }

    fn read_file(&mut self) -> Result<FileInfo, WireError> {
        let complete = self.version >= COMPLETE_FILE_VERSION;

        let path = self.read_raw_string("file path")?;
        let (name, relative_path) = if complete {
            (
                self.read_raw_string("file name")?,
                self.read_raw_string("file relative path")?,
            )
        } else {
            (String::new(), String::new())
        };
        let uuid = self.read_raw_string("file uuid")?;
        let content_type = self.read_raw_string("file type")?;

        let mut snapshot = None;
        if complete && self.read_flag("file snapshot flag")? {
            let size = self.read_uint64()?;
            let mut last_modified_ms = self.read_number()?;
            if self.version < FILE_LAST_MODIFIED_MS_VERSION {
                last_modified_ms *= 1000.0;
            }
            snapshot = Some(FileSnapshot {
                size,
                last_modified_ms,
            });
        }

        let user_visible = if self.version >= FILE_USER_VISIBLE_VERSION {
            self.read_flag("file visibility flag")?
        } else {
            true
        };

        Ok(FileInfo {
            path,
            name,
            relative_path,
            uuid,
            content_type,
            snapshot,
            user_visible,
        })
    }
}

/* Primitive payloads. */
impl<'a> WireReader<'a> {
    /// The `doReadUintHelper` of the format: one var-int of width `T`.
    pub fn read_varint<T>(&mut self) -> Result<T, WireError>
    where
        T: PrimInt + Unsigned,
    {
        let tail = &self.buffer[self.position..];
        match varint::decode::<T>(tail) {
            Ok((r_len, value)) => {
                self.position += r_len;
                Ok(value)
            }
            Err(WireError::UnexpectedEnd(r_len)) => {
                Err(WireError::UnexpectedEnd(self.position + r_len))
            }
            Err(e) => Err(e),
        }
    }

    pub fn read_uint32(&mut self) -> Result<u32, WireError> {
        self.read_varint::<u32>()
    }

    pub fn read_uint64(&mut self) -> Result<u64, WireError> {
        self.read_varint::<u64>()
    }

    pub fn read_number(&mut self) -> Result<f64, WireError> {
        let bytes = self.read_bytes(mem::size_of::<f64>(), "number")?;
        let mut buf = [0u8; mem::size_of::<f64>()];
        buf.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(buf))
    }

    fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], WireError> {
        if len > self.remaining() {
            return Err(WireError::InvalidLength {
                what,
                len: len as u64,
            });
        }
        let bytes = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn read_raw_string(&mut self, what: &'static str) -> Result<String, WireError> {
        let len = self.read_uint32()? as usize;
        let bytes = self.read_bytes(len, what)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8(what))
    }

    fn read_flag(&mut self, what: &'static str) -> Result<bool, WireError> {
        match self.read_uint32()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(WireError::InvalidValue {
                what,
                value: value as u64,
            }),
        }
    }
}

/// Iterates the records of a stream. Yields each record's offset, and stops
/// after the first error.
pub struct Tokens<'a> {
    r: WireReader<'a>,
    failed: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<(usize, Token), WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.r.is_eof() {
            return None;
        }
        let offset = self.r.position();
        match self.r.read_token() {
            Ok(ReadResult::EOF) => None,
            Ok(ReadResult::Some(_, token)) => Some(Ok((offset, token))),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
