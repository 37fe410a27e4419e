use super::helpers::{clone_into_new_heap, tokens, verify_same_graph};
use anyhow::Result;
use structclone_engine::heap::{Heap, Value};
use structclone_engine::serialized_value::SerializedValueFactory;
use structclone_types::types::HostString;
use structclone_types::wire::Token;

/// `{x: 1, y: "hi", z: [1, 2, 3]}`
pub fn object_with_nested_array() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let z = heap.array_from([1, 2, 3]);
    let root = Value::from(heap.object_from([
        ("x", Value::from(1)),
        ("y", Value::from("hi")),
        ("z", Value::from(z)),
    ]));

    let serialized = factory.create(&mut heap, &root, &[])?;
    #[rustfmt::skip]
    let expected: &[u8] = &[
        0xff, 0x09,
        b'o',
        b'S', 1, b'x', b'I', 2,
        b'S', 1, b'y', b'S', 2, b'h', b'i',
        b'S', 1, b'z', b'A', 3, b'I', 2, b'I', 4, b'I', 6, b'$', 0, 3,
        b'{', 3,
        0,
    ];
    assert_eq!(serialized.data(), expected);

    let s = |s: &str| HostString::new(s);
    assert_eq!(
        tokens(&serialized)?,
        vec![
            Token::GenerateFreshObject,
            Token::String(s("x")),
            Token::Int32(1),
            Token::String(s("y")),
            Token::String(s("hi")),
            Token::String(s("z")),
            Token::GenerateFreshDenseArray(3),
            Token::Int32(1),
            Token::Int32(2),
            Token::Int32(3),
            Token::DenseArray {
                num_properties: 0,
                length: 3
            },
            Token::Object { num_properties: 3 },
        ]
    );

    let wire = serialized.to_wire_bytes();
    assert_eq!(wire.len(), expected.len());
    for (i, byte) in wire.iter().enumerate() {
        assert_eq!(*byte, expected[i ^ 1], "wire byte {i}");
    }

    let (target, cloned) = clone_into_new_heap(&factory, &mut heap, &root)?;
    verify_same_graph(&heap, &root, &target, &cloned)
}
