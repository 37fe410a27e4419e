use super::helpers::gen::{gen_blobs, sample_file};
use super::helpers::{tokens, verify_same_graph};
use anyhow::Result;
use structclone_engine::heap::{Heap, HeapObject, Value};
use structclone_engine::serialized_value::SerializedValueFactory;
use structclone_engine::status::DeserializeError;
use structclone_types::types::IndexedBlob;
use structclone_types::wire::Token;

fn blob_root(heap: &mut Heap) -> Value {
    let blobs = gen_blobs(heap);
    Value::from(heap.array_from(blobs))
}

const UUIDS: [&str; 5] = ["uuid-blob", "uuid-a.txt", "uuid-b.txt", "uuid-c.txt", "uuid-d.txt"];

pub fn blobs_by_index() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let root = blob_root(&mut heap);

    let mut blob_info = Vec::new();
    let mut serialized = factory.create_with_blob_info(&mut heap, &root, &[], &mut blob_info)?;
    assert_eq!(
        blob_info.iter().map(IndexedBlob::uuid).collect::<Vec<_>>(),
        UUIDS
    );
    for uuid in UUIDS {
        assert!(serialized.blob_data_handles().contains_key(uuid), "{uuid}");
    }
    assert_eq!(serialized.blob_data_handles()["uuid-b.txt"].size, u64::MAX);

    let tokens = tokens(&serialized)?;
    assert!(tokens.contains(&Token::BlobIndex(0)));
    assert!(tokens.contains(&Token::FileIndex(1)));
    assert!(tokens.contains(&Token::FileListIndex(vec![3, 4])));

    let mut target = Heap::new();
    let cloned = serialized.try_deserialize(&mut target, &[], Some(blob_info.as_slice()))?;
    verify_same_graph(&heap, &root, &target, &cloned)?;

    // An index the receiver does not know about.
    let short = &blob_info[..2];
    let mut again = factory.create_with_blob_info(&mut heap, &root, &[], &mut Vec::new())?;
    assert_eq!(
        again.try_deserialize(&mut Heap::new(), &[], Some(short)),
        Err(DeserializeError::BadBlobIndex(2))
    );
    Ok(())
}

pub fn blobs_inline() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let root = blob_root(&mut heap);

    let mut serialized = factory.create(&mut heap, &root, &[])?;
    assert_eq!(serialized.blob_data_handles().len(), UUIDS.len());
    let tokens = tokens(&serialized)?;
    assert!(tokens.contains(&Token::File(sample_file("a.txt"))));
    assert!(!tokens
        .iter()
        .any(|t| matches!(t, Token::BlobIndex(_) | Token::FileIndex(_) | Token::FileListIndex(_))));

    let mut target = Heap::new();
    let cloned = serialized.try_deserialize(&mut target, &[], None)?;
    verify_same_graph(&heap, &root, &target, &cloned)?;

    let list = target
        .get_property(cloned.as_object().unwrap(), &3u32.into())?
        .as_object()
        .unwrap();
    match target.get(list) {
        Some(HeapObject::FileList(files)) => {
            assert_eq!(files, &vec![sample_file("c.txt"), sample_file("d.txt")])
        }
        other => panic!("{other:?}"),
    }
    Ok(())
}
