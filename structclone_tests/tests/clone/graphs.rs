use super::helpers::{clone_into_new_heap, tokens, verify_same_graph};
use anyhow::Result;
use structclone_engine::heap::{Heap, PropertyKey, Value};
use structclone_engine::serialized_value::SerializedValueFactory;
use structclone_types::wire::Token;

pub fn cycles_survive() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();

    let self_ref = heap.new_object();
    heap.set_property(self_ref, "me", self_ref);

    let a = heap.new_object();
    let b = heap.array_from([Value::from(a)]);
    heap.set_property(a, "b", b);

    let map = heap.new_map();
    heap.map_insert(map, map, map);
    let set = heap.new_set();
    heap.set_add(set, set);

    for root in [self_ref, a, b, map, set] {
        let root = Value::from(root);
        let (target, cloned) = clone_into_new_heap(&factory, &mut heap, &root)?;
        verify_same_graph(&heap, &root, &target, &cloned)?;
    }

    let (target, cloned) = clone_into_new_heap(&factory, &mut heap, &Value::from(self_ref))?;
    let id = cloned.as_object().unwrap();
    assert_eq!(target.get_property(id, &PropertyKey::from("me"))?, cloned);
    Ok(())
}

pub fn shared_references_are_written_once() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let shared = heap.object_from([("n", 1)]);
    let root = Value::from(heap.array_from([shared, shared, shared]));

    let serialized = factory.create(&mut heap, &root, &[])?;
    let tokens = tokens(&serialized)?;
    let fresh = tokens
        .iter()
        .filter(|t| **t == Token::GenerateFreshObject)
        .count();
    let references = tokens
        .iter()
        .filter(|t| matches!(t, Token::ObjectReference(_)))
        .count();
    assert_eq!((fresh, references), (1, 2));

    let (target, cloned) = clone_into_new_heap(&factory, &mut heap, &root)?;
    verify_same_graph(&heap, &root, &target, &cloned)?;
    let arr = cloned.as_object().unwrap();
    let first = target.get_property(arr, &PropertyKey::Index(0))?;
    for i in 1..3 {
        assert_eq!(target.get_property(arr, &PropertyKey::Index(i))?, first);
    }
    Ok(())
}
