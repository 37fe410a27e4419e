use crate::heap::{ArrayBufferView, HeapObject, ObjectId};
use crate::serializer::Serializer;
use crate::status::SerializeError;
use structclone_types::types::{BlobInfo, FileInfo, IndexedBlob};

impl<'h, 'b> Serializer<'h, 'b> {
    /// A pooled buffer is written as a reference and a transferred one by
    /// index. Anything else is copied inline.
    pub(super) fn do_serialize_array_buffer(&mut self, id: ObjectId) -> Result<(), SerializeError> {
        if let Some(reference) = self.object_pool.try_get(id) {
            self.writer.write_object_reference(reference);
            return Ok(());
        }
        if let Some(index) = self.transferred_array_buffers.try_get(id) {
            self.writer.write_transferred_array_buffer(index);
            return Ok(());
        }
        let heap = self.heap;
        match heap.get(id) {
            Some(HeapObject::ArrayBuffer(buffer)) => match &buffer.contents {
                Some(contents) => {
                    self.writer.write_array_buffer(contents);
                    self.grey_object(id);
                    Ok(())
                }
                None => Err(SerializeError::data_clone(
                    "An ArrayBuffer is neutered and could not be cloned.",
                )),
            },
            _ => Err(SerializeError::data_clone(
                "An ArrayBuffer could not be cloned.",
            )),
        }
    }

    /// The underlying buffer goes first; the view record refers to whatever
    /// the buffer left on the reader's stack.
    pub(super) fn do_serialize_array_buffer_view(
        &mut self,
        id: ObjectId,
        view: &ArrayBufferView,
    ) -> Result<(), SerializeError> {
        self.do_serialize_array_buffer(view.buffer)?;
        self.writer
            .write_array_buffer_view(view.kind, view.byte_offset, view.byte_length);
        self.grey_object(id);
        Ok(())
    }

    pub(super) fn write_blob(&mut self, blob: &BlobInfo) {
        self.blob_data_handles
            .insert(blob.uuid.clone(), blob.clone());
        match self.append_blob_info(IndexedBlob::Blob(blob.clone())) {
            Some(index) => self.writer.write_blob_index(index),
            None => self.writer.write_blob(blob),
        }
    }

    pub(super) fn write_file(&mut self, file: &FileInfo) {
        self.blob_data_handles
            .insert(file.uuid.clone(), file.blob_info());
        match self.append_blob_info(IndexedBlob::File(file.clone())) {
            Some(index) => self.writer.write_file_index(index),
            None => self.writer.write_file(file),
        }
    }

    pub(super) fn write_file_list(&mut self, files: &[FileInfo]) {
        for file in files {
            self.blob_data_handles
                .insert(file.uuid.clone(), file.blob_info());
        }
        if self.blob_info.is_some() {
            let indexes = files
                .iter()
                .filter_map(|file| self.append_blob_info(IndexedBlob::File(file.clone())))
                .collect::<Vec<_>>();
            self.writer.write_file_list_index(&indexes);
        } else {
            self.writer.write_file_list(files);
        }
    }

    /// Index of the appended entry, or `None` if blobs are written inline.
    fn append_blob_info(&mut self, blob: IndexedBlob) -> Option<u32> {
        let blob_info = self.blob_info.as_mut()?;
        blob_info.push(blob);
        Some((blob_info.len() - 1) as u32)
    }
}
