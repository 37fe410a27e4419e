/// The version every writer emits.
///
/// - 1: composites are opened by `GenerateFresh*` records.
/// - 2: UTF-16 strings.
/// - 3: blobs are identified by uuid.
/// - 4: complete `File` records.
/// - 5: reserved.
/// - 6: blobs, files and file lists by index into an out-of-band array.
/// - 7: `File` user visibility.
/// - 8: `File` last-modified in milliseconds; seconds before.
/// - 9: `Map` and `Set`.
pub const WIRE_FORMAT_VERSION: u32 = 9;

/// Streams without a version record.
pub const LEGACY_VERSION: u32 = 0;

pub const FRESH_COMPOSITES_VERSION: u32 = 1;
pub const STRING_UCHAR_VERSION: u32 = 2;
pub const BLOB_UUID_VERSION: u32 = 3;
pub const COMPLETE_FILE_VERSION: u32 = 4;
pub const INDEXED_BLOBS_VERSION: u32 = 6;
pub const FILE_USER_VISIBLE_VERSION: u32 = 7;
pub const FILE_LAST_MODIFIED_MS_VERSION: u32 = 8;
pub const MAP_SET_VERSION: u32 = 9;
