/// Metadata of a blob whose bytes live in out-of-band blob storage.
/// The stream carries only this metadata; `uuid` names the backing data.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub struct BlobInfo {
    pub uuid: String,
    pub content_type: String,
    pub size: u64,
}

/// Present on files whose size and modification time were captured
/// when the file was selected.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct FileSnapshot {
    pub size: u64,
    /// Milliseconds since the epoch.
    pub last_modified_ms: f64,
}

#[derive(PartialEq, Clone, Debug)]
pub struct FileInfo {
    pub path: String,
    pub name: String,
    pub relative_path: String,
    pub uuid: String,
    pub content_type: String,
    pub snapshot: Option<FileSnapshot>,
    pub user_visible: bool,
}

impl FileInfo {
    pub fn blob_info(&self) -> BlobInfo {
        BlobInfo {
            uuid: self.uuid.clone(),
            content_type: self.content_type.clone(),
            size: self.snapshot.map_or(u64::MAX, |snap| snap.size),
        }
    }
}

/// One slot of the out-of-band array used when blobs are serialized by index.
#[derive(PartialEq, Clone, Debug)]
pub enum IndexedBlob {
    Blob(BlobInfo),
    File(FileInfo),
}

impl IndexedBlob {
    pub fn uuid(&self) -> &str {
        match self {
            Self::Blob(blob) => &blob.uuid,
            Self::File(file) => &file.uuid,
        }
    }
}
