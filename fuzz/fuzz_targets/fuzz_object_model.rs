#![no_main]

use libfuzzer_sys::fuzz_target;
use objmodel::prelude::FxHashSet;
use objmodel::{DescriptorPatch, ModelError, ObjectId, Realm, Value};

const MAX_OPS: usize = 2_000;
const KEYS: [&str; 4] = ["a", "b", "c", "d"];

/// Each byte pair is one operation on a small pool of objects; after every
/// operation the integrity invariants must still hold.
fuzz_target!(|data: &[u8]| {
    let mut realm = Realm::new();
    let mut objects: Vec<ObjectId> = vec![realm.create_object()];
    let mut frozen: Vec<ObjectId> = Vec::new();

    for chunk in data.chunks_exact(2).take(MAX_OPS) {
        let (op, arg) = (chunk[0], chunk[1]);
        let obj = objects[arg as usize % objects.len()];
        let key = KEYS[(arg >> 4) as usize % KEYS.len()];

        let result: Result<(), ModelError> = match op % 9 {
            0 => realm
                .create_object_with_proto(Some(obj))
                .map(|child| objects.push(child)),
            1 => realm.put(obj, key, i32::from(arg)),
            2 => realm.get(obj, key).map(|_| ()),
            3 => realm.define_property(
                obj,
                key,
                DescriptorPatch {
                    value: (arg & 1 == 1).then(|| Value::from(i32::from(arg))),
                    writable: (arg & 2 == 2).then_some(arg & 4 == 4),
                    enumerable: (arg & 8 == 8).then_some(arg & 16 == 16),
                    configurable: (arg & 32 == 32).then_some(arg & 64 == 64),
                    ..DescriptorPatch::default()
                },
            ),
            4 => realm.prevent_extensions(obj),
            5 => realm.seal(obj),
            6 => realm.freeze(obj).map(|_| frozen.push(obj)),
            7 => realm.delete_property(obj, key).map(|_| ()),
            _ => realm.enumerable_keys_in_chain(obj).map(|keys| {
                let keys: Vec<_> = keys.collect();
                let unique: FxHashSet<_> = keys.iter().collect();
                assert_eq!(keys.len(), unique.len());
            }),
        };

        // Conflicts are expected; any other error is a bug
        if let Err(err) = result {
            assert!(err.is_type_conflict(), "unexpected error: {err}");
        }

        for &obj in &frozen {
            assert!(realm.is_frozen(obj).unwrap());
        }
    }
});
