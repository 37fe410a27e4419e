use anyhow::{Context, Result};
use structclone_types::wire::{Token, WireReader};


/// One record of a stream, as listed by the inspector.
#[derive(PartialEq, Debug)]
pub struct Record {
    /// Byte offset of the record's tag, after any padding.
    pub offset: usize,
    /// Number of composites open around this record.
    pub depth: usize,
    pub token: Token,
}

/// Decodes the version and every record of `data`.
pub fn records(data: &[u8]) -> Result<(u32, Vec<Record>)> {
    let mut r = WireReader::new(data);
    let version = r.read_version()?;

    let mut depth = 0usize;
    let mut records = vec![];
    for res in r.tokens() {
        let (offset, token) = res.with_context(|| {
            let after = records.last().map_or(0, |rec: &Record| rec.offset);
            format!("record after byte {after}")
        })?;
        // Legacy streams close composites they never opened.
        if token.is_composite_close() {
            depth = depth.saturating_sub(1);
        }
        let opens = token.is_composite_open();
        records.push(Record {
            offset,
            depth,
            token,
        });
        if opens {
            depth += 1;
        }
    }
    Ok((version, records))
}
