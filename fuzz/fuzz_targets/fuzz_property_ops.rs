#![no_main]

use guise_core::objects::js_object::ObjectRef;
use guise_core::objects::property::{Property, PropertyAttributes};
use guise_core::objects::value::JsValue;
use libfuzzer_sys::fuzz_target;

// Fuzz random property `set` / `get` / `delete` / `define` operations on an
// object and verify that descriptor bookkeeping never leaves it in an
// inconsistent state.
//
// Each operation is encoded in two bytes:
//   byte 0  bits [1:0] – operation selector (0=set, 1=get, 2=delete, 3=define)
//           bits [7:2] – value payload (interpreted as Smi)
//   byte 1  bits [3:0] – property key index k0–k15
//           bits [7:5] – attribute flags for define
//
// Using a small bounded key space (k0–k15) ensures that the fuzzer quickly
// exercises redefinition, deletion, and attribute-constraint paths on the
// same keys.
fuzz_target!(|data: &[u8]| {
    let object = ObjectRef::new();
    const MAX_OPS: usize = 256;
    let mut ops = 0;

    for chunk in data.chunks_exact(2) {
        if ops >= MAX_OPS {
            break;
        }
        ops += 1;

        let op_byte = chunk[0];
        let key_byte = chunk[1];

        let op = op_byte & 0x3;
        let smi_val = i32::from(op_byte >> 2);
        let key_idx = key_byte & 0xf;
        let key = format!("k{key_idx}");

        match op {
            0 => {
                // [[Set]]: writable properties accept the new value; read-only
                // ones return a TypeError, which we discard.
                let _ = object.set(&key, JsValue::Smi(smi_val));
            }
            1 => {
                // [[Get]]: returns the value or Undefined; must not panic.
                let _ = object.get(&key);
            }
            2 => {
                // [[Delete]]: succeeds exactly when the property is absent or
                // configurable.
                let deletable = object
                    .own_property(&key)
                    .is_none_or(|descriptor| descriptor.is_configurable());
                assert_eq!(object.delete_own_property(&key), deletable);
            }
            _ => {
                // [[DefineOwnProperty]]: attribute flags come from the key
                // byte's high bits; illegal redefinitions are TypeErrors,
                // which we discard.
                let attrs = PropertyAttributes::from_bits_truncate(key_byte >> 5);
                let _ = object
                    .define_own_property(&key, Property::new_data(JsValue::Smi(smi_val), attrs));
            }
        }
    }

    // Post-condition: every surviving descriptor must be listable and
    // internally consistent regardless of the operation history.
    for key in object.own_property_names() {
        let descriptor = object.own_property(&key).expect("listed property exists");
        assert!(descriptor.is_data() != descriptor.is_accessor());
        if descriptor.is_data() {
            assert!(descriptor.data_value().is_some());
        }
    }
});
