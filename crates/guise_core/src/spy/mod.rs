//! The spy engine: property interception, override records, and the
//! registry behind the bulk lifecycle verbs.
//!
//! [`spy_on_property`] is the entry point: it validates the target, swaps
//! the named property for a getter/setter trap, and returns a [`SpyHandle`]
//! that overrides what reads observe (`mock_value`, `mock_value_once`),
//! reverts the override (`mock_reset` / `mock_clear`), or undoes the
//! interception entirely (`mock_restore`). Requests are deduplicated: one
//! record exists per (target, property) pair, and repeated calls hand back
//! the same record until it is restored. The bulk verbs sweep every live
//! record at once, which is what test-framework lifecycle hooks want.

mod record;
mod registry;
mod validate;

pub use record::SpyHandle;

use crate::error::GuiseResult;
use crate::objects::value::JsValue;

/// Starts (or resumes) spying on a property of `target`.
///
/// The target must be object-like (an object or a function); the property
/// must be absent or a configurable, non-callable data property. On success
/// the property is served by an interception trap and the returned handle
/// controls what reads observe. Spying on an absent property logs an
/// advisory and proceeds; the property materializes as `undefined`.
///
/// Calling this again for the same (target, property) pair returns a handle
/// to the already-installed record, with all pending override state intact.
pub fn spy_on_property(target: &JsValue, property: &str) -> GuiseResult<SpyHandle> {
    // Dedup before validation: an installed trap is an accessor and would
    // not validate as a spyable data property.
    if let Some(object) = target.as_property_target()
        && let Some(existing) = registry::get(object.id(), property)
    {
        return Ok(existing);
    }

    let (object, original) = validate::validate(target, property)?;
    let handle = record::install(&object, property, original)?;
    registry::insert(object.id(), property, handle.clone());
    Ok(handle)
}

/// Returns `true` if a spy is currently installed on (target, property).
///
/// Backed solely by the registry, never by inspecting the property itself:
/// an accessor property that merely looks like a trap does not count.
pub fn is_spied(target: &JsValue, property: &str) -> bool {
    target
        .as_property_target()
        .is_some_and(|object| registry::contains(object.id(), property))
}

/// Reverts every installed spy to its spy-creation value. Traps stay
/// installed; equivalent to calling `mock_clear` on each record.
pub fn clear_all_spies() {
    registry::clear_all();
}

/// Reverts every installed spy to its spy-creation value. Traps stay
/// installed; equivalent to calling `mock_reset` on each record.
pub fn reset_all_spies() {
    registry::reset_all();
}

/// Restores every installed spy, reinstating original descriptors and
/// emptying the registry.
pub fn restore_all_spies() {
    registry::restore_all();
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuiseError;
    use crate::logging::capture_warnings;
    use crate::objects::function::JsFunction;
    use crate::objects::js_object::ObjectRef;
    use crate::objects::property::{Accessor, Property, PropertyAttributes};
    use std::rc::Rc;

    fn object_with(key: &str, value: JsValue) -> (JsValue, ObjectRef) {
        let object = ObjectRef::new();
        object.set(key, value).unwrap();
        (JsValue::Object(object.clone()), object)
    }

    // ── Installation and dedup ────────────────────────────────────────────────

    #[test]
    fn test_spy_on_configurable_data_property() {
        let (target, object) = object_with("x", JsValue::Smi(1));
        let handle = spy_on_property(&target, "x").unwrap();
        assert!(is_spied(&target, "x"));
        assert!(handle.is_installed());
        assert!(object.own_property("x").unwrap().is_accessor());
        handle.mock_restore().unwrap();
    }

    #[test]
    fn test_repeated_spy_returns_the_same_record() {
        let (target, _object) = object_with("x", JsValue::Smi(1));
        let first = spy_on_property(&target, "x").unwrap();
        first.mock_value_once(JsValue::Smi(9)).unwrap();

        // Re-validation would reject the installed accessor trap; dedup must
        // answer before validation and keep the pending override state.
        let second = spy_on_property(&target, "x").unwrap();
        assert!(first.shares_record(&second));
        assert_eq!(target.as_property_target().unwrap().get("x"), JsValue::Smi(9));
        first.mock_restore().unwrap();
    }

    #[test]
    fn test_spy_after_restore_creates_a_fresh_record() {
        let (target, object) = object_with("x", JsValue::Smi(1));
        let first = spy_on_property(&target, "x").unwrap();
        first.mock_restore().unwrap();

        let second = spy_on_property(&target, "x").unwrap();
        assert!(!first.shares_record(&second));
        assert!(is_spied(&target, "x"));
        // The old handle stays terminal.
        assert!(matches!(
            first.mock_value(JsValue::Smi(2)).unwrap_err(),
            GuiseError::SpyRestored { .. }
        ));
        second.mock_value(JsValue::Smi(3)).unwrap();
        assert_eq!(object.get("x"), JsValue::Smi(3));
        second.mock_restore().unwrap();
    }

    #[test]
    fn test_spy_on_function_target_property() {
        let function = Rc::new(JsFunction::noop("fetchData"));
        function
            .properties()
            .set("timeout", JsValue::Smi(30))
            .unwrap();
        let target = JsValue::Function(function);

        let handle = spy_on_property(&target, "timeout").unwrap();
        handle.mock_value(JsValue::Smi(5)).unwrap();
        assert_eq!(
            target.as_property_target().unwrap().get("timeout"),
            JsValue::Smi(5)
        );
        assert!(is_spied(&target, "timeout"));
        handle.mock_restore().unwrap();
        assert_eq!(
            target.as_property_target().unwrap().get("timeout"),
            JsValue::Smi(30)
        );
    }

    // ── Round-trip ────────────────────────────────────────────────────────────

    #[test]
    fn test_spy_then_restore_is_observably_identity() {
        let object = ObjectRef::new();
        object
            .define_own_property(
                "x",
                Property::new_data(
                    JsValue::String("original".to_string()),
                    PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE,
                ),
            )
            .unwrap();
        let target = JsValue::Object(object.clone());

        let handle = spy_on_property(&target, "x").unwrap();
        handle.mock_value(JsValue::Smi(99)).unwrap();
        handle.mock_restore().unwrap();

        let descriptor = object.own_property("x").unwrap();
        assert!(descriptor.is_data());
        assert_eq!(
            descriptor.data_value(),
            Some(&JsValue::String("original".to_string()))
        );
        assert_eq!(
            descriptor.attributes(),
            PropertyAttributes::WRITABLE | PropertyAttributes::CONFIGURABLE
        );
        assert!(!is_spied(&target, "x"));
    }

    #[test]
    fn test_undefined_property_full_scenario() {
        let object = ObjectRef::new();
        let target = JsValue::Object(object.clone());

        let (handle, warnings) = capture_warnings(|| spy_on_property(&target, "x"));
        let handle = handle.unwrap();
        assert_eq!(warnings, vec!["Spying on an undefined property 'x'.".to_string()]);

        handle.mock_value(JsValue::Smi(1)).unwrap();
        assert_eq!(object.get("x"), JsValue::Smi(1));

        object.set("x", JsValue::Smi(5)).unwrap();
        assert_eq!(object.get("x"), JsValue::Smi(5));

        handle.mock_restore().unwrap();
        assert_eq!(object.get("x"), JsValue::Undefined);
        assert!(!object.has_own_property("x"));
        assert!(!is_spied(&target, "x"));
    }

    // ── Override semantics through the facade ─────────────────────────────────

    #[test]
    fn test_once_values_then_persistent() {
        let (target, object) = object_with("x", JsValue::Smi(0));
        let handle = spy_on_property(&target, "x").unwrap();
        handle
            .mock_value_once(JsValue::Smi(1))
            .unwrap()
            .mock_value_once(JsValue::Smi(2))
            .unwrap();
        assert_eq!(object.get("x"), JsValue::Smi(1));
        assert_eq!(object.get("x"), JsValue::Smi(2));
        assert_eq!(object.get("x"), JsValue::Smi(0));
        handle.mock_restore().unwrap();
    }

    #[test]
    fn test_reset_keeps_the_spy_installed() {
        let (target, object) = object_with("x", JsValue::Smi(1));
        let handle = spy_on_property(&target, "x").unwrap();
        handle.mock_value(JsValue::Smi(9)).unwrap();
        handle.mock_reset().unwrap();
        assert_eq!(object.get("x"), JsValue::Smi(1));
        assert!(is_spied(&target, "x"));
        handle.mock_restore().unwrap();
    }

    // ── Rejections ────────────────────────────────────────────────────────────

    #[test]
    fn test_rejected_targets_install_nothing() {
        for target in [
            JsValue::Undefined,
            JsValue::Null,
            JsValue::Boolean(true),
            JsValue::Smi(5),
            JsValue::Number(5.5),
            JsValue::String("s".to_string()),
        ] {
            assert!(matches!(
                spy_on_property(&target, "x").unwrap_err(),
                GuiseError::InvalidTarget { .. }
            ));
            assert!(!is_spied(&target, "x"));
        }
    }

    #[test]
    fn test_function_valued_property_is_rejected_untouched() {
        let (target, object) = object_with(
            "handler",
            JsValue::Function(Rc::new(JsFunction::noop("handler"))),
        );
        assert!(matches!(
            spy_on_property(&target, "handler").unwrap_err(),
            GuiseError::NotADataProperty { .. }
        ));
        assert!(!is_spied(&target, "handler"));
        assert!(object.own_property("handler").unwrap().is_data());
    }

    #[test]
    fn test_accessor_property_is_rejected_untouched() {
        let object = ObjectRef::new();
        object
            .define_own_property(
                "derived",
                Property::new_accessor(
                    Accessor::new(Some(Rc::new(|| JsValue::Smi(1))), None),
                    PropertyAttributes::CONFIGURABLE,
                ),
            )
            .unwrap();
        let target = JsValue::Object(object.clone());

        assert!(matches!(
            spy_on_property(&target, "derived").unwrap_err(),
            GuiseError::NotADataProperty { .. }
        ));
        assert!(!is_spied(&target, "derived"));
        assert!(object.own_property("derived").unwrap().is_accessor());
    }

    #[test]
    fn test_non_configurable_property_is_rejected_untouched() {
        let object = ObjectRef::new();
        object
            .define_own_property(
                "frozen",
                Property::new_data(JsValue::Smi(1), PropertyAttributes::WRITABLE),
            )
            .unwrap();
        let target = JsValue::Object(object.clone());

        assert!(matches!(
            spy_on_property(&target, "frozen").unwrap_err(),
            GuiseError::NotConfigurable { .. }
        ));
        assert!(!is_spied(&target, "frozen"));
        let descriptor = object.own_property("frozen").unwrap();
        assert!(descriptor.is_data());
        assert_eq!(descriptor.data_value(), Some(&JsValue::Smi(1)));
    }

    #[test]
    fn test_no_warning_when_spying_a_defined_property() {
        let (target, _object) = object_with("x", JsValue::Smi(1));
        let (handle, warnings) = capture_warnings(|| spy_on_property(&target, "x"));
        assert!(warnings.is_empty());
        handle.unwrap().mock_restore().unwrap();
    }

    // ── Bulk verbs ────────────────────────────────────────────────────────────

    #[test]
    fn test_restore_all_spies_over_two_properties() {
        let object = ObjectRef::new();
        object.set("a", JsValue::Smi(1)).unwrap();
        object.set("b", JsValue::Smi(2)).unwrap();
        let target = JsValue::Object(object.clone());

        let a = spy_on_property(&target, "a").unwrap();
        let b = spy_on_property(&target, "b").unwrap();
        a.mock_value(JsValue::Smi(10)).unwrap();
        b.mock_value(JsValue::Smi(20)).unwrap();

        restore_all_spies();
        assert!(!is_spied(&target, "a"));
        assert!(!is_spied(&target, "b"));
        assert_eq!(object.get("a"), JsValue::Smi(1));
        assert_eq!(object.get("b"), JsValue::Smi(2));
        assert!(object.own_property("a").unwrap().is_data());
        assert!(object.own_property("b").unwrap().is_data());
    }

    #[test]
    fn test_reset_all_spies_keeps_records_registered() {
        let (target, object) = object_with("x", JsValue::Smi(1));
        let handle = spy_on_property(&target, "x").unwrap();
        handle.mock_value(JsValue::Smi(9)).unwrap();

        reset_all_spies();
        assert_eq!(object.get("x"), JsValue::Smi(1));
        assert!(is_spied(&target, "x"));
        handle.mock_restore().unwrap();
    }

    #[test]
    fn test_clear_all_spies_reverts_like_reset() {
        let (target, object) = object_with("x", JsValue::Smi(1));
        let handle = spy_on_property(&target, "x").unwrap();
        handle.mock_value_once(JsValue::Smi(9)).unwrap();

        clear_all_spies();
        assert_eq!(object.get("x"), JsValue::Smi(1));
        assert!(is_spied(&target, "x"));
        handle.mock_restore().unwrap();
    }
}
