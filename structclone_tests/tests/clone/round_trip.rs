use super::helpers::{clone_into_new_heap, gen::*, verify_same_graph};
use anyhow::Result;
use itertools::Itertools;
use rand::seq::SliceRandom;
use structclone_engine::heap::{Heap, Value};
use structclone_engine::serialized_value::SerializedValueFactory;
use structclone_types::types::HostString;

fn verify(gen_fns: &[&fn(&mut Heap) -> Vec<Value>]) -> Result<()> {
    let factory = SerializedValueFactory::default();

    let mut heap = Heap::new();
    let values = gen_fns
        .iter()
        .flat_map(|gen| gen(&mut heap))
        .collect::<Vec<_>>();
    // An object root keeps undefined values from turning into array holes.
    let root = heap.object_from(
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (HostString::new(&format!("v{i}")), v)),
    );
    let root = Value::from(root);

    let (target, cloned) = clone_into_new_heap(&factory, &mut heap, &root)?;
    verify_same_graph(&heap, &root, &target, &cloned)
}

pub fn round_trip_all_kinds() -> Result<()> {
    let mut rand_rng = rand::thread_rng();

    let gen_fns: [fn(&mut Heap) -> Vec<Value>; 9] = [
        gen_primitives,
        gen_strings,
        gen_objects,
        gen_arrays,
        gen_maps_and_sets,
        gen_wrappers,
        gen_binary,
        gen_blobs,
        gen_compositor_proxy,
    ];

    for mut gen_fns in gen_fns.iter().powerset() {
        verify(&gen_fns)?;

        gen_fns.shuffle(&mut rand_rng);
        verify(&gen_fns)?;
    }

    Ok(())
}

pub fn round_trip_through_wire_bytes() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let values = gen_strings(&mut heap)
        .into_iter()
        .chain(gen_arrays(&mut heap))
        .collect::<Vec<_>>();
    let root = Value::from(heap.array_from(values));

    let serialized = factory.create(&mut heap, &root, &[])?;
    let wire = serialized.to_wire_bytes();
    assert_eq!(wire.len() % 2, 0);
    assert_eq!(wire.len(), serialized.data().len());
    assert_eq!(&wire[..2], &[0x09, 0xff]);

    let mut received = factory.create_from_wire_bytes(&wire)?;
    assert_eq!(received.data(), serialized.data());
    let mut target = Heap::new();
    let cloned = received.try_deserialize(&mut target, &[], None)?;
    verify_same_graph(&heap, &root, &target, &cloned)
}

pub fn round_trip_string_and_null() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();

    let s = HostString::new("\u{3042} and ascii");
    let mut serialized = factory.create_from_string(&s);
    assert_eq!(
        serialized.try_deserialize(&mut heap, &[], None)?,
        Value::String(s)
    );

    let mut null = factory.null_value();
    assert_eq!(null.try_deserialize(&mut heap, &[], None)?, Value::Null);
    Ok(())
}
