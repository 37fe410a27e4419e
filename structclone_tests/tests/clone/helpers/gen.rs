use structclone_engine::heap::{ArrayBufferView, Heap, HeapObject, Value};
use structclone_types::types::{
    ArrayBufferViewKind, BlobInfo, CompositorProxyInfo, FileInfo, FileSnapshot, HostString,
    ImageDataInfo, RegExpFlags,
};

pub fn gen_primitives(_heap: &mut Heap) -> Vec<Value> {
    vec![
        Value::Undefined,
        Value::Null,
        Value::from(true),
        Value::from(false),
        Value::from(0),
        Value::from(-0.0),
        Value::from(i32::MIN),
        Value::from(i32::MAX as f64 + 1.0),
        Value::from(u32::MAX as f64 + 1.0),
        Value::from(0.1),
        Value::from(f64::NAN),
        Value::from(f64::NEG_INFINITY),
    ]
}

pub fn gen_strings(_heap: &mut Heap) -> Vec<Value> {
    vec![
        Value::from(""),
        Value::from("plain"),
        Value::from("caf\u{e9}"),
        Value::from("\u{3042}\u{3044}"),
        Value::from("\u{1F600}"),
        Value::from(HostString::TwoByte(vec![0xd800])),
    ]
}

pub fn gen_objects(heap: &mut Heap) -> Vec<Value> {
    let empty = heap.new_object();
    let nested = heap.object_from([("k", Value::from("v"))]);
    let obj = heap.object_from([
        ("a", Value::from(1)),
        ("\u{3042}", Value::Undefined),
        ("7", Value::from(7)),
        ("nested", Value::from(nested)),
    ]);
    vec![Value::from(empty), Value::from(obj)]
}

pub fn gen_arrays(heap: &mut Heap) -> Vec<Value> {
    let empty = heap.new_array(0);
    let dense = heap.array_from([Value::from(1), Value::from("two"), Value::Null]);

    let holey = heap.new_array(5);
    heap.set_property(holey, 1u32, 1);
    heap.set_property(holey, 3u32, 3);
    heap.set_property(holey, "name", "holey");

    let sparse = heap.new_array(1000);
    heap.set_property(sparse, 999u32, true);
    heap.set_property(sparse, 3_000_000_000u32, "far");
    heap.set_property(sparse, "tag", Value::Undefined);

    vec![
        Value::from(empty),
        Value::from(dense),
        Value::from(holey),
        Value::from(sparse),
    ]
}

pub fn gen_maps_and_sets(heap: &mut Heap) -> Vec<Value> {
    let key = heap.new_object();
    let map = heap.new_map();
    heap.map_insert(map, key, "object key");
    heap.map_insert(map, f64::NAN, Value::Null);
    heap.map_insert(map, "s", key);

    let set = heap.new_set();
    heap.set_add(set, 1);
    heap.set_add(set, "1");
    heap.set_add(set, map);

    vec![Value::from(map), Value::from(set)]
}

pub fn gen_wrappers(heap: &mut Heap) -> Vec<Value> {
    [
        HeapObject::Date(1_600_000_000_123.0),
        HeapObject::Date(f64::NAN),
        HeapObject::RegExp {
            pattern: String::from("^a(b|c)*$"),
            flags: RegExpFlags::GLOBAL | RegExpFlags::IGNORE_CASE,
        },
        HeapObject::StringObject(HostString::new("wrapped \u{3042}")),
        HeapObject::NumberObject(-2.5),
        HeapObject::BooleanObject(true),
        HeapObject::BooleanObject(false),
    ]
    .into_iter()
    .map(|object| Value::from(heap.alloc(object)))
    .collect()
}

pub fn gen_binary(heap: &mut Heap) -> Vec<Value> {
    let buffer = heap.new_array_buffer((0..16).collect());
    let views = [
        (ArrayBufferViewKind::Uint8, 0, 16),
        (ArrayBufferViewKind::Int16, 2, 6),
        (ArrayBufferViewKind::Float64, 8, 8),
        (ArrayBufferViewKind::DataView, 3, 5),
    ]
    .into_iter()
    .map(|(kind, byte_offset, byte_length)| {
        Value::from(heap.alloc(HeapObject::ArrayBufferView(ArrayBufferView {
            kind,
            buffer,
            byte_offset,
            byte_length,
        })))
    })
    .collect::<Vec<_>>();
    let image = heap.alloc(HeapObject::ImageData(ImageDataInfo {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 255, 0, 128],
    }));

    let mut values = vec![Value::from(heap.new_array_buffer(vec![]))];
    values.extend(views);
    values.push(Value::from(image));
    values
}

pub fn sample_file(name: &str) -> FileInfo {
    FileInfo {
        path: format!("/home/user/{name}"),
        name: name.to_string(),
        relative_path: format!("dir/{name}"),
        uuid: format!("uuid-{name}"),
        content_type: String::from("text/plain"),
        snapshot: Some(FileSnapshot {
            size: 42,
            last_modified_ms: 1_500_000_000_000.0,
        }),
        user_visible: true,
    }
}

pub fn gen_blobs(heap: &mut Heap) -> Vec<Value> {
    let blob = heap.alloc(HeapObject::Blob(BlobInfo {
        uuid: String::from("uuid-blob"),
        content_type: String::from("application/json"),
        size: 5,
    }));
    let file = heap.alloc(HeapObject::File(sample_file("a.txt")));
    let unsnapshotted = heap.alloc(HeapObject::File(FileInfo {
        snapshot: None,
        user_visible: false,
        ..sample_file("b.txt")
    }));
    let list = heap.alloc(HeapObject::FileList(vec![
        sample_file("c.txt"),
        sample_file("d.txt"),
    ]));
    [blob, file, unsnapshotted, list]
        .into_iter()
        .map(Value::from)
        .collect()
}

pub fn gen_compositor_proxy(heap: &mut Heap) -> Vec<Value> {
    let proxy = heap.alloc(HeapObject::CompositorProxy(CompositorProxyInfo {
        element_id: 1 << 40,
        attributes: 0b101,
    }));
    vec![Value::from(proxy)]
}
