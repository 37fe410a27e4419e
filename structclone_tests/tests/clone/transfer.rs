use anyhow::{anyhow, Result};
use std::thread;
use structclone_engine::heap::{ArrayBufferView, Heap, HeapObject, MessagePort, PropertyKey, Value};
use structclone_engine::serialized_value::SerializedValueFactory;
use structclone_engine::status::{DeserializeError, Status};
use structclone_types::types::ArrayBufferViewKind;

fn buffer_with_view(heap: &mut Heap) -> (Value, Value) {
    let buf = heap.new_array_buffer(vec![1, 2, 3, 4]);
    let view = heap.alloc(HeapObject::ArrayBufferView(ArrayBufferView {
        kind: ArrayBufferViewKind::Uint8,
        buffer: buf,
        byte_offset: 1,
        byte_length: 2,
    }));
    let root = heap.object_from([("buf", buf), ("view", view)]);
    (Value::from(buf), Value::from(root))
}

pub fn transferred_buffers_are_neutered() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let (buf, root) = buffer_with_view(&mut heap);
    let buf_id = buf.as_object().unwrap();

    let mut serialized = factory.create(&mut heap, &root, &[buf])?;
    assert!(heap.is_neutered(buf_id));
    assert_eq!(heap.array_buffer_contents(buf_id), None);
    assert!(serialized.has_transferred_array_buffers());

    // The receiving side runs on another thread.
    let (target, cloned) = thread::spawn(move || {
        let mut target = Heap::new();
        let cloned = serialized.try_deserialize(&mut target, &[], None);
        cloned.map(|cloned| (target, cloned))
    })
    .join()
    .map_err(|_| anyhow!("receiver panicked"))??;
    let root = cloned.as_object().unwrap();
    let buf = target
        .get_property(root, &PropertyKey::from("buf"))?
        .as_object()
        .unwrap();
    assert_eq!(target.array_buffer_contents(buf), Some(&[1u8, 2, 3, 4][..]));

    let view = target
        .get_property(root, &PropertyKey::from("view"))?
        .as_object()
        .unwrap();
    match target.get(view) {
        Some(HeapObject::ArrayBufferView(view)) => assert_eq!(view.buffer, buf),
        other => panic!("{other:?}"),
    }
    Ok(())
}

pub fn transferred_contents_are_handed_over_once() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let (buf, root) = buffer_with_view(&mut heap);
    let mut serialized = factory.create(&mut heap, &root, &[buf])?;

    let mut target = Heap::new();
    serialized.try_deserialize(&mut target, &[], None)?;
    assert!(!serialized.has_transferred_array_buffers());
    assert_eq!(
        serialized.try_deserialize(&mut target, &[], None),
        Err(DeserializeError::BadTransferredArrayBuffer(0))
    );
    assert_eq!(serialized.deserialize(&mut target, &[], None), Value::Null);
    Ok(())
}

pub fn failed_serialization_keeps_buffers() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let (buf, root) = buffer_with_view(&mut heap);
    let function = heap.alloc(HeapObject::Function {
        name: String::from("callback"),
    });
    heap.set_property(root.as_object().unwrap(), "f", function);

    let err = factory.create(&mut heap, &root, &[buf.clone()]).unwrap_err();
    assert_eq!(err.status(), Status::DataCloneError);
    let buf_id = buf.as_object().unwrap();
    assert!(!heap.is_neutered(buf_id));
    assert_eq!(heap.array_buffer_contents(buf_id), Some(&[1u8, 2, 3, 4][..]));
    Ok(())
}

pub fn message_ports_map_to_receiver_ports() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let p1 = heap.alloc(HeapObject::MessagePort(MessagePort { channel: 1 }));
    let p2 = heap.alloc(HeapObject::MessagePort(MessagePort { channel: 2 }));
    let root = Value::from(heap.object_from([("second", p2), ("first", p1), ("again", p2)]));

    let mut serialized = factory.create(&mut heap, &root, &[Value::from(p1), Value::from(p2)])?;

    let mut target = Heap::new();
    let r1 = target.alloc(HeapObject::MessagePort(MessagePort { channel: 1 }));
    let r2 = target.alloc(HeapObject::MessagePort(MessagePort { channel: 2 }));
    let cloned = serialized
        .try_deserialize(&mut target, &[r1, r2], None)?
        .as_object()
        .unwrap();
    let get = |key: &str| target.get_property(cloned, &PropertyKey::from(key));
    assert_eq!(get("first")?, Value::from(r1));
    assert_eq!(get("second")?, Value::from(r2));
    assert_eq!(get("again")?, Value::from(r2));

    // Without receiver ports the stream cannot be rebuilt.
    let mut serialized = factory.create(&mut heap, &root, &[Value::from(p1), Value::from(p2)])?;
    assert_eq!(
        serialized.try_deserialize(&mut Heap::new(), &[], None),
        Err(DeserializeError::BadTransferredMessagePort(1))
    );
    Ok(())
}

pub fn failed_deserialization_keeps_contents() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let buf = heap.new_array_buffer(vec![1, 2, 3, 4]);
    let port = heap.alloc(HeapObject::MessagePort(MessagePort { channel: 1 }));
    let root = Value::from(heap.object_from([("buf", buf), ("port", port)]));
    let mut serialized =
        factory.create(&mut heap, &root, &[Value::from(buf), Value::from(port)])?;

    // The buffer is rebuilt before the missing port is noticed.
    let mut target = Heap::new();
    assert_eq!(
        serialized.try_deserialize(&mut target, &[], None),
        Err(DeserializeError::BadTransferredMessagePort(0))
    );
    assert!(serialized.has_transferred_array_buffers());
    assert_eq!(serialized.deserialize(&mut target, &[], None), Value::Null);
    assert!(serialized.has_transferred_array_buffers());

    let receiver_port = target.alloc(HeapObject::MessagePort(MessagePort { channel: 1 }));
    let cloned = serialized
        .try_deserialize(&mut target, &[receiver_port], None)?
        .as_object()
        .unwrap();
    let buf = target
        .get_property(cloned, &PropertyKey::from("buf"))?
        .as_object()
        .unwrap();
    assert_eq!(target.array_buffer_contents(buf), Some(&[1u8, 2, 3, 4][..]));
    assert!(!serialized.has_transferred_array_buffers());
    Ok(())
}
