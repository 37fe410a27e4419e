use super::helpers::{clone_into_new_heap, nested_arrays, verify_same_graph};
use anyhow::Result;
use structclone_engine::heap::Heap;
use structclone_engine::options::{SerializerOptions, DEFAULT_MAX_DEPTH};
use structclone_engine::serialized_value::SerializedValueFactory;
use structclone_engine::status::{SerializeError, Status};

pub fn depth_bound() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();

    let at_limit = nested_arrays(&mut heap, DEFAULT_MAX_DEPTH);
    factory.create(&mut heap, &at_limit, &[])?;

    let past_limit = nested_arrays(&mut heap, DEFAULT_MAX_DEPTH + 1);
    match factory.create(&mut heap, &past_limit, &[]) {
        Err(e @ SerializeError::InputError(_)) => assert_eq!(e.status(), Status::InputError),
        other => panic!("expected an input error, got {:?}", other.map(|_| ())),
    }

    let shallow = SerializedValueFactory::new(SerializerOptions {
        max_depth: 10,
        ..Default::default()
    });
    let eleven = nested_arrays(&mut heap, 11);
    assert!(shallow.create(&mut heap, &eleven, &[]).is_err());
    Ok(())
}

pub fn deep_round_trip() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let deep = nested_arrays(&mut heap, DEFAULT_MAX_DEPTH);
    let (target, cloned) = clone_into_new_heap(&factory, &mut heap, &deep)?;
    verify_same_graph(&heap, &deep, &target, &cloned)
}
