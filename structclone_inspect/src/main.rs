//! Dumps a persisted stream: its records, then the value they rebuild.
//!
//! The input is the byte form produced by `SerializedValue::to_wire_bytes`.

mod records;

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use structclone_engine::heap::{describe, Heap};
use structclone_engine::serialized_value::SerializedValueFactory;
use tracing::trace;
use tracing_subscriber::EnvFilter;

const ENV_VAR_INPUT: &str = "STRUCTCLONE_INPUT";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var(ENV_VAR_INPUT).ok())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: structclone_inspect <path> (or set {ENV_VAR_INPUT})"))?;

    let wire = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let factory = SerializedValueFactory::default();
    let mut serialized = factory
        .create_from_wire_bytes(&wire)
        .with_context(|| format!("decoding {}", path.display()))?;

    let (version, records) = records::records(serialized.data())?;
    println!("version {version}");
    for rec in records {
        trace!(offset = rec.offset, depth = rec.depth, token = ?rec.token);
        println!("{:>8}  {:indent$}{:?}", rec.offset, "", rec.token, indent = 2 * rec.depth);
    }

    let mut heap = Heap::new();
    let value = serialized.try_deserialize(&mut heap, &[], None)?;
    println!("{}", describe(&heap, &value));
    Ok(())
}
