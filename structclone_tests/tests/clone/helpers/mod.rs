pub mod gen;

use anyhow::{anyhow, Result};
use structclone_engine::heap::{describe, graph_eq, Heap, Value};
use structclone_engine::serialized_value::{SerializedValue, SerializedValueFactory};
use structclone_types::wire::{Token, WireReader};

/// Serializes `value`, then rebuilds it in a fresh heap.
pub fn clone_into_new_heap(
    factory: &SerializedValueFactory,
    heap: &mut Heap,
    value: &Value,
) -> Result<(Heap, Value)> {
    let mut serialized = factory.create(heap, value, &[])?;
    let mut target = Heap::new();
    let cloned = serialized.try_deserialize(&mut target, &[], None)?;
    Ok((target, cloned))
}

pub fn verify_same_graph(heap: &Heap, value: &Value, target: &Heap, cloned: &Value) -> Result<()> {
    if !graph_eq(heap, value, target, cloned) {
        return Err(anyhow!(
            "graphs differ:\n{}\n{}",
            describe(heap, value),
            describe(target, cloned)
        ));
    }
    Ok(())
}

pub fn tokens(serialized: &SerializedValue) -> Result<Vec<Token>> {
    let mut r = WireReader::new(serialized.data());
    r.read_version()?;
    let tokens = r
        .tokens()
        .map(|res| res.map(|(_, token)| token))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tokens)
}

pub fn nested_arrays(heap: &mut Heap, depth: usize) -> Value {
    let mut value = Value::from(heap.new_array(0));
    for _ in 1..depth {
        value = Value::from(heap.array_from([value]));
    }
    value
}
