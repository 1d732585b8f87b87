#![no_main]

use std::collections::HashMap;
use std::rc::Rc;

use guise_core::logging::capture_warnings;
use guise_core::objects::js_object::ObjectRef;
use guise_core::objects::property::{Accessor, Property, PropertyAttributes};
use guise_core::objects::value::JsValue;
use guise_core::spy::{self, SpyHandle};
use libfuzzer_sys::fuzz_target;

// Fuzz random spy-lifecycle soups over one object and verify the engine's
// invariants: dedup keeps one record per property, a record's installed
// state always agrees with registry membership, restored records reject
// every operation, and a final bulk restore returns the object to an
// all-data (or original-accessor) property layout.
//
// Each operation is encoded in two bytes:
//   byte 0  bits [2:0] – operation selector
//           bits [7:3] – value payload (interpreted as Smi)
//   byte 1  bits [2:0] – property key index
//
// The key space includes spyable data properties, absent properties, one
// non-configurable property, and one accessor property, so both acceptance
// and every rejection path stay hot.
const KEYS: [&str; 8] = ["k0", "k1", "k2", "k3", "k4", "k5", "frozen", "derived"];

fuzz_target!(|data: &[u8]| {
    let object = ObjectRef::new();
    object.set("k0", JsValue::Smi(10)).unwrap();
    object
        .set("k1", JsValue::String("one".to_string()))
        .unwrap();
    object
        .define_own_property(
            "frozen",
            Property::new_data(
                JsValue::Smi(1),
                PropertyAttributes::WRITABLE | PropertyAttributes::ENUMERABLE,
            ),
        )
        .unwrap();
    object
        .define_own_property(
            "derived",
            Property::new_accessor(
                Accessor::new(Some(Rc::new(|| JsValue::Smi(2))), None),
                PropertyAttributes::CONFIGURABLE,
            ),
        )
        .unwrap();
    let target = JsValue::Object(object.clone());

    let (expected_warnings, warnings) = capture_warnings(|| {
        let mut handles: HashMap<&str, SpyHandle> = HashMap::new();
        let mut expected_warnings = 0usize;
        const MAX_OPS: usize = 256;
        let mut ops = 0;

        for chunk in data.chunks_exact(2) {
            if ops >= MAX_OPS {
                break;
            }
            ops += 1;

            let op = chunk[0] & 0x7;
            let payload = i32::from(chunk[0] >> 3);
            let key = KEYS[usize::from(chunk[1] & 0x7)];

            match op {
                0 => {
                    // Spying on an absent property emits exactly one advisory;
                    // a deduplicated repeat emits none.
                    if !spy::is_spied(&target, key) && !object.has_own_property(key) {
                        expected_warnings += 1;
                    }
                    match spy::spy_on_property(&target, key) {
                        Ok(handle) => {
                            assert!(key != "frozen" && key != "derived");
                            assert!(handle.is_installed());
                            handles.insert(key, handle);
                        }
                        Err(_) => assert!(key == "frozen" || key == "derived"),
                    }
                }
                1 => {
                    if let Some(handle) = handles.get(key) {
                        let installed = handle.is_installed();
                        assert_eq!(handle.mock_value(JsValue::Smi(payload)).is_ok(), installed);
                    }
                }
                2 => {
                    if let Some(handle) = handles.get(key) {
                        let installed = handle.is_installed();
                        assert_eq!(
                            handle.mock_value_once(JsValue::Smi(payload)).is_ok(),
                            installed
                        );
                    }
                }
                3 => {
                    let _ = object.get(key);
                }
                4 => {
                    // Writes through traps, plain slots, or rejecting
                    // accessors; only the last is an error, discarded.
                    let _ = object.set(key, JsValue::Smi(payload));
                }
                5 => {
                    if let Some(handle) = handles.get(key) {
                        let installed = handle.is_installed();
                        assert_eq!(handle.mock_reset().is_ok(), installed);
                    }
                }
                6 => {
                    if let Some(handle) = handles.get(key) {
                        let installed = handle.is_installed();
                        assert_eq!(handle.mock_restore().is_ok(), installed);
                        assert!(!handle.is_installed());
                    }
                }
                _ => {
                    // The held handle is always the latest record for its
                    // key, so its state must agree with the registry.
                    if let Some(handle) = handles.get(key) {
                        assert_eq!(handle.is_installed(), spy::is_spied(&target, key));
                    }
                }
            }
        }

        expected_warnings
    });

    // Post-condition: a full sweep detaches every trap and the object is
    // back to data properties everywhere except the seeded accessor.
    spy::restore_all_spies();
    for key in KEYS {
        assert!(!spy::is_spied(&target, key));
    }
    for name in object.own_property_names() {
        let descriptor = object.own_property(&name).expect("listed property exists");
        if name == "derived" {
            assert!(descriptor.is_accessor());
        } else {
            assert!(descriptor.is_data());
        }
    }
    assert!(!object.own_property("frozen").unwrap().is_configurable());

    assert_eq!(warnings.len(), expected_warnings);
    for warning in warnings {
        assert!(warning.starts_with("Spying on an undefined property"));
    }
});
