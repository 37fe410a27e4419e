use crate::types::{
    ArrayBufferViewKind, BlobInfo, CompositorProxyInfo, FileInfo, HostString, ImageDataInfo,
    RegExpFlags,
};
use crate::wire::{varint, SerializationTag, WIRE_FORMAT_VERSION};
use std::mem;


/// Appends tagged records to an in-memory buffer.
///
/// Writes cannot fail. The writer does not know about nesting; callers are
/// responsible for balancing open and close records.
#[derive(Default)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

/* Primitives. */
impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_version(&mut self) {
        self.append_tag(SerializationTag::Version);
        self.do_write_uint32(WIRE_FORMAT_VERSION);
    }

    pub fn write_undefined(&mut self) {
        self.append_tag(SerializationTag::Undefined);
    }

    pub fn write_null(&mut self) {
        self.append_tag(SerializationTag::Null);
    }

    pub fn write_true(&mut self) {
        self.append_tag(SerializationTag::True);
    }

    pub fn write_false(&mut self) {
        self.append_tag(SerializationTag::False);
    }

    pub fn write_int32(&mut self, value: i32) {
        self.append_tag(SerializationTag::Int32);
        self.do_write_uint32(varint::zigzag_encode(value));
    }

    pub fn write_uint32(&mut self, value: u32) {
        self.append_tag(SerializationTag::Uint32);
        self.do_write_uint32(value);
    }

    pub fn write_number(&mut self, value: f64) {
        self.append_tag(SerializationTag::Number);
        self.do_write_number(value);
    }

    pub fn write_date(&mut self, ms_since_epoch: f64) {
        self.append_tag(SerializationTag::Date);
        self.do_write_number(ms_since_epoch);
    }

    pub fn write_string(&mut self, s: &HostString) {
        match s {
            HostString::OneByte(units) => self.write_one_byte_string(units),
            HostString::TwoByte(units) => self.write_uchar_string(units),
        }
    }

    pub fn write_one_byte_string(&mut self, latin1: &[u8]) {
        self.append_tag(SerializationTag::String);
        self.do_write_uint32(latin1.len() as u32);
        self.buffer.extend_from_slice(latin1);
    }

    pub fn write_uchar_string(&mut self, units: &[u16]) {
        let byte_len = (units.len() * mem::size_of::<u16>()) as u32;
        // The units must start at an even offset.
        let units_offset = self.buffer.len() + 1 + varint::encoded_len(byte_len as u64);
        if units_offset % 2 != 0 {
            self.append_tag(SerializationTag::Padding);
        }
        self.append_tag(SerializationTag::StringUChar);
        self.do_write_uint32(byte_len);
        for unit in units {
            self.buffer.extend_from_slice(&unit.to_le_bytes());
        }
    }
}

/* Wrapper objects and exotic values. */
impl WireWriter {
    pub fn write_string_object(&mut self, s: &HostString) {
        self.append_tag(SerializationTag::StringObject);
        self.write_string(s);
    }

    pub fn write_number_object(&mut self, value: f64) {
        self.append_tag(SerializationTag::NumberObject);
        self.do_write_number(value);
    }

    pub fn write_boolean_object(&mut self, value: bool) {
        if value {
            self.append_tag(SerializationTag::TrueObject);
        } else {
            self.append_tag(SerializationTag::FalseObject);
        }
    }

    pub fn write_regexp(&mut self, pattern: &str, flags: RegExpFlags) {
        self.append_tag(SerializationTag::RegExp);
        self.do_write_raw_string(pattern);
        self.do_write_uint32(flags.bits());
    }

    pub fn write_blob(&mut self, blob: &BlobInfo) {
        self.append_tag(SerializationTag::Blob);
        self.do_write_raw_string(&blob.uuid);
        self.do_write_raw_string(&blob.content_type);
        self.do_write_uint64(blob.size);
    }

    pub fn write_blob_index(&mut self, index: u32) {
        self.append_tag(SerializationTag::BlobIndex);
        self.do_write_uint32(index);
    }

    pub fn write_file(&mut self, file: &FileInfo) {
        self.append_tag(SerializationTag::File);
        self.do_write_file(file);
    }

    pub fn write_file_index(&mut self, index: u32) {
        self.append_tag(SerializationTag::FileIndex);
        self.do_write_uint32(index);
    }

    pub fn write_file_list(&mut self, files: &[FileInfo]) {
        self.append_tag(SerializationTag::FileList);
        self.do_write_uint32(files.len() as u32);
        for file in files {
            self.do_write_file(file);
        }
    }

    pub fn write_file_list_index(&mut self, indexes: &[u32]) {
        self.append_tag(SerializationTag::FileListIndex);
        self.do_write_uint32(indexes.len() as u32);
        for index in indexes {
            self.do_write_uint32(*index);
        }
    }

    pub fn write_image_data(&mut self, image: &ImageDataInfo) {
        self.append_tag(SerializationTag::ImageData);
        self.do_write_uint32(image.width);
        self.do_write_uint32(image.height);
        self.do_write_uint32(image.data.len() as u32);
        self.buffer.extend_from_slice(&image.data);
    }

    pub fn write_array_buffer(&mut self, contents: &[u8]) {
        self.append_tag(SerializationTag::ArrayBuffer);
        self.do_write_uint32(contents.len() as u32);
        self.buffer.extend_from_slice(contents);
    }

    pub fn write_array_buffer_view(
        &mut self,
        kind: ArrayBufferViewKind,
        byte_offset: u32,
        byte_length: u32,
    ) {
        self.append_tag(SerializationTag::ArrayBufferView);
        self.buffer.push(kind as u8);
        self.do_write_uint32(byte_offset);
        self.do_write_uint32(byte_length);
    }

    pub fn write_transferred_array_buffer(&mut self, index: u32) {
        self.append_tag(SerializationTag::ArrayBufferTransfer);
        self.do_write_uint32(index);
    }

    pub fn write_transferred_message_port(&mut self, index: u32) {
        self.append_tag(SerializationTag::MessagePort);
        self.do_write_uint32(index);
    }

    pub fn write_compositor_proxy(&mut self, proxy: &CompositorProxyInfo) {
        self.append_tag(SerializationTag::CompositorProxy);
        self.do_write_uint64(proxy.element_id);
        self.do_write_uint32(proxy.attributes);
    }
}

/* Composites. */
impl WireWriter {
    pub fn write_object_reference(&mut self, reference: u32) {
        self.append_tag(SerializationTag::ObjectReference);
        self.do_write_uint32(reference);
    }

    pub fn write_generate_fresh_object(&mut self) {
        self.append_tag(SerializationTag::GenerateFreshObject);
    }

    pub fn write_generate_fresh_sparse_array(&mut self, length: u32) {
        self.append_tag(SerializationTag::GenerateFreshSparseArray);
        self.do_write_uint32(length);
    }

    pub fn write_generate_fresh_dense_array(&mut self, length: u32) {
        self.append_tag(SerializationTag::GenerateFreshDenseArray);
        self.do_write_uint32(length);
    }

    pub fn write_generate_fresh_map(&mut self) {
        self.append_tag(SerializationTag::GenerateFreshMap);
    }

    pub fn write_generate_fresh_set(&mut self) {
        self.append_tag(SerializationTag::GenerateFreshSet);
    }

    pub fn write_object(&mut self, num_properties: u32) {
        self.append_tag(SerializationTag::Object);
        self.do_write_uint32(num_properties);
    }

    pub fn write_sparse_array(&mut self, num_properties: u32, length: u32) {
        self.append_tag(SerializationTag::SparseArray);
        self.do_write_uint32(num_properties);
        self.do_write_uint32(length);
    }

    pub fn write_dense_array(&mut self, num_properties: u32, length: u32) {
        self.append_tag(SerializationTag::DenseArray);
        self.do_write_uint32(num_properties);
        self.do_write_uint32(length);
    }

    pub fn write_map(&mut self, length: u32) {
        self.append_tag(SerializationTag::Map);
        self.do_write_uint32(length);
    }

    pub fn write_set(&mut self, length: u32) {
        self.append_tag(SerializationTag::Set);
        self.do_write_uint32(length);
    }
}

/* Ownership of the finished buffer. */
impl WireWriter {
    /// Hands over the buffer, padded to a whole number of 16-bit units,
    /// and leaves the writer empty.
    pub fn take_wire_bytes(&mut self) -> Vec<u8> {
        if self.buffer.len() % 2 != 0 {
            self.append_tag(SerializationTag::Padding);
        }
        mem::take(&mut self.buffer)
    }
}

/* Payload helpers. */
impl WireWriter {
    fn append_tag(&mut self, tag: SerializationTag) {
        self.buffer.push(tag.to_byte());
    }

    fn do_write_uint32(&mut self, value: u32) {
        varint::encode_into(value as u64, &mut self.buffer);
    }

    fn do_write_uint64(&mut self, value: u64) {
        varint::encode_into(value, &mut self.buffer);
    }

    fn do_write_number(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    fn do_write_raw_string(&mut self, s: &str) {
        self.do_write_uint32(s.len() as u32);
        self.buffer.extend_from_slice(s.as_bytes());
    }

    fn do_write_file(&mut self, file: &FileInfo) {
        self.do_write_raw_string(&file.path);
        self.do_write_raw_string(&file.name);
        self.do_write_raw_string(&file.relative_path);
        self.do_write_raw_string(&file.uuid);
        self.do_write_raw_string(&file.content_type);
        match file.snapshot {
            None => self.do_write_uint32(0),
            Some(snap) => {
                self.do_write_uint32(1);
                self.do_write_uint64(snap.size);
                self.do_write_number(snap.last_modified_ms);
            }
        }
        self.do_write_uint32(file.user_visible as u32);
    }
}
