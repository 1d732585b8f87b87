//! Spy-creation validation.
//!
//! Decides, before any trap is installed, whether a (target, property) pair
//! may legally be intercepted, and captures the original descriptor the
//! restore path will need. Every rejection happens here, synchronously, so
//! a failed spy never leaves partial state behind.

use crate::error::{GuiseError, GuiseResult};
use crate::logging;
use crate::objects::js_object::ObjectRef;
use crate::objects::property::Property;
use crate::objects::value::JsValue;

/// Checks that `property` on `target` is interceptable.
///
/// On success returns the property table the trap will be installed on,
/// together with the original descriptor — `None` when the property does
/// not exist yet. Absent properties are spyable: the validator emits an
/// advisory warning and proceeds, so optional/environment-style properties
/// can be mocked into existence.
///
/// Fails with [`GuiseError::InvalidTarget`] for primitive targets,
/// [`GuiseError::NotConfigurable`] for descriptors that could not be
/// restored, and [`GuiseError::NotADataProperty`] for accessors and
/// function-valued slots, which belong to the host framework's call spy.
pub(crate) fn validate(
    target: &JsValue,
    property: &str,
) -> GuiseResult<(ObjectRef, Option<Property>)> {
    let Some(object) = target.as_property_target() else {
        return Err(GuiseError::InvalidTarget {
            type_name: target.type_name(),
            value: target.to_string(),
        });
    };

    let Some(descriptor) = object.own_property(property) else {
        logging::warn(&format!("Spying on an undefined property '{property}'."));
        return Ok((object, None));
    };

    if !descriptor.is_configurable() {
        return Err(GuiseError::NotConfigurable {
            property: property.to_string(),
        });
    }

    match descriptor.data_value() {
        None => Err(GuiseError::NotADataProperty {
            property: property.to_string(),
            offender: "an accessor",
        }),
        Some(value) if value.is_function() => Err(GuiseError::NotADataProperty {
            property: property.to_string(),
            offender: "a function",
        }),
        Some(_) => Ok((object, Some(descriptor))),
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::logging::capture_warnings;
    use crate::objects::function::JsFunction;
    use crate::objects::property::{Accessor, PropertyAttributes};

    fn object_with(key: &str, value: JsValue) -> (JsValue, ObjectRef) {
        let object = ObjectRef::new();
        object.set(key, value).unwrap();
        (JsValue::Object(object.clone()), object)
    }

    // ── Accepted targets ──────────────────────────────────────────────────────

    #[test]
    fn test_plain_data_property_is_valid() {
        let (target, object) = object_with("name", JsValue::String("ada".to_string()));
        let (table, original) = validate(&target, "name").unwrap();
        assert_eq!(table, object);
        let descriptor = original.unwrap();
        assert!(descriptor.is_data());
        assert_eq!(
            descriptor.data_value(),
            Some(&JsValue::String("ada".to_string()))
        );
        assert_eq!(descriptor.attributes(), PropertyAttributes::DATA_DEFAULT);
    }

    #[test]
    fn test_absent_property_returns_no_descriptor() {
        let (target, _object) = object_with("other", JsValue::Smi(1));
        let ((_, original), warnings) =
            capture_warnings(|| validate(&target, "missing").unwrap());
        assert!(original.is_none());
        assert_eq!(warnings, vec![
            "Spying on an undefined property 'missing'.".to_string()
        ]);
    }

    #[test]
    fn test_defined_property_emits_no_warning() {
        let (target, _object) = object_with("present", JsValue::Smi(1));
        let (_, warnings) = capture_warnings(|| validate(&target, "present").unwrap());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_function_target_is_object_like() {
        let function = Rc::new(JsFunction::noop("f"));
        function.properties().set("flag", JsValue::Boolean(true)).unwrap();
        let target = JsValue::Function(function);
        let (_, original) = validate(&target, "flag").unwrap();
        assert!(original.is_some());
    }

    // ── InvalidTarget ─────────────────────────────────────────────────────────

    #[test]
    fn test_primitive_targets_are_rejected() {
        let primitives = [
            JsValue::Undefined,
            JsValue::Null,
            JsValue::Boolean(true),
            JsValue::Smi(5),
            JsValue::Number(5.5),
            JsValue::String("s".to_string()),
        ];
        for target in primitives {
            let err = validate(&target, "x").unwrap_err();
            assert!(
                matches!(err, GuiseError::InvalidTarget { .. }),
                "expected InvalidTarget for {target}"
            );
        }
    }

    #[test]
    fn test_invalid_target_names_the_runtime_type() {
        let err = validate(&JsValue::Smi(5), "x").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("number"));
        assert!(message.contains('5'));
    }

    // ── NotConfigurable ───────────────────────────────────────────────────────

    #[test]
    fn test_non_configurable_property_is_rejected() {
        let object = ObjectRef::new();
        object
            .define_own_property(
                "frozen",
                Property::new_data(
                    JsValue::Smi(1),
                    PropertyAttributes::WRITABLE | PropertyAttributes::ENUMERABLE,
                ),
            )
            .unwrap();
        let target = JsValue::Object(object);
        let err = validate(&target, "frozen").unwrap_err();
        assert!(matches!(
            err,
            GuiseError::NotConfigurable { ref property } if property == "frozen"
        ));
    }

    // ── NotADataProperty ──────────────────────────────────────────────────────

    #[test]
    fn test_accessor_property_is_rejected() {
        let object = ObjectRef::new();
        object
            .define_own_property(
                "computed",
                Property::new_accessor(
                    Accessor::new(Some(Rc::new(|| JsValue::Smi(1))), None),
                    PropertyAttributes::CONFIGURABLE,
                ),
            )
            .unwrap();
        let target = JsValue::Object(object);
        let err = validate(&target, "computed").unwrap_err();
        assert!(matches!(
            err,
            GuiseError::NotADataProperty { offender: "an accessor", .. }
        ));
    }

    #[test]
    fn test_function_valued_property_is_rejected() {
        let (target, _object) = object_with(
            "callback",
            JsValue::Function(Rc::new(JsFunction::noop("callback"))),
        );
        let err = validate(&target, "callback").unwrap_err();
        assert!(matches!(
            err,
            GuiseError::NotADataProperty { offender: "a function", .. }
        ));
        assert!(err.to_string().contains("call spy"));
    }

    // ── Precedence ────────────────────────────────────────────────────────────

    #[test]
    fn test_non_configurable_wins_over_not_a_data_property() {
        let object = ObjectRef::new();
        object
            .define_own_property(
                "locked",
                Property::new_accessor(
                    Accessor::new(Some(Rc::new(|| JsValue::Smi(1))), None),
                    PropertyAttributes::empty(),
                ),
            )
            .unwrap();
        let target = JsValue::Object(object);
        let err = validate(&target, "locked").unwrap_err();
        assert!(matches!(err, GuiseError::NotConfigurable { .. }));
    }
}
