use anyhow::Result;
use structclone_engine::heap::{Heap, HeapObject, HostException, MessagePort, Value};
use structclone_engine::serialized_value::SerializedValueFactory;
use structclone_engine::status::{SerializeError, Status};

fn expect_data_clone_error(
    factory: &SerializedValueFactory,
    heap: &mut Heap,
    value: &Value,
    transfer_list: &[Value],
    message: &str,
) {
    match factory.create(heap, value, transfer_list) {
        Err(SerializeError::DataCloneError(m)) => assert!(m.contains(message), "{m}"),
        other => panic!("expected a clone error, got {:?}", other.map(|_| ())),
    }
}

pub fn uncloneable_values() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();

    let function = heap.alloc(HeapObject::Function {
        name: String::from("onload"),
    });
    let platform = heap.alloc(HeapObject::PlatformObject {
        interface: String::from("Window"),
    });
    let port = heap.alloc(HeapObject::MessagePort(MessagePort { channel: 7 }));
    let neutered = heap.new_array_buffer(vec![1, 2]);
    heap.neuter_array_buffer(neutered);

    for (object, message) in [
        (function, "onload"),
        (platform, "Window"),
        (port, "MessagePort"),
        (neutered, "neutered"),
    ] {
        // Nested under a few levels so the failure has to unwind the stack.
        let inner = heap.object_from([("x", object)]);
        let outer = Value::from(heap.array_from([Value::from(1), Value::from(inner)]));
        expect_data_clone_error(&factory, &mut heap, &outer, &[], message);
    }
    Ok(())
}

pub fn host_exceptions_propagate() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();

    let object = heap.object_from([("before", 1)]);
    heap.define_throwing_accessor(object, "getter", "boom");
    heap.set_property(object, "after", 2);
    let root = Value::from(heap.array_from([object]));

    let err = factory.create(&mut heap, &root, &[]).unwrap_err();
    assert_eq!(err.status(), Status::JSException);
    assert_eq!(
        err,
        SerializeError::HostException(HostException(Value::from("boom")))
    );
    Ok(())
}

pub fn bad_transfer_lists() -> Result<()> {
    let factory = SerializedValueFactory::default();
    let mut heap = Heap::new();
    let buf = Value::from(heap.new_array_buffer(vec![0; 8]));
    let port = Value::from(heap.alloc(HeapObject::MessagePort(MessagePort { channel: 1 })));
    let root = Value::from(heap.array_from([buf.clone(), port.clone()]));

    expect_data_clone_error(
        &factory,
        &mut heap,
        &root,
        &[buf.clone(), port.clone(), buf.clone()],
        "index 2 is a duplicate",
    );
    expect_data_clone_error(
        &factory,
        &mut heap,
        &root,
        &[port.clone(), port.clone()],
        "index 1 is a duplicate",
    );
    expect_data_clone_error(
        &factory,
        &mut heap,
        &root,
        &[Value::from(1)],
        "does not have a transferable type",
    );

    // A buffer can be transferred once; afterwards it is neutered.
    factory.create(&mut heap, &root, &[buf.clone(), port.clone()])?;
    expect_data_clone_error(
        &factory,
        &mut heap,
        &root,
        &[buf, port],
        "already neutered",
    );
    Ok(())
}
