//! The spy record and its accessor trap.
//!
//! A spy record owns the override-value state machine for one (target,
//! property) pair. Installation captures the original descriptor and swaps
//! the property for a getter/setter pair that routes every read and write
//! through the record; restoration reinstalls the captured descriptor (or
//! deletes the property when it never existed) and deregisters the record.
//!
//! The record is shared: the two trap closures and every [`SpyHandle`]
//! returned to callers hold the same `Rc<RefCell<SpyState>>`. The record
//! holds its target weakly, so a spy never extends the lifetime of the
//! object it is installed on.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::error::{GuiseError, GuiseResult};
use crate::objects::js_object::{ObjectRef, WeakObjectRef};
use crate::objects::property::{Accessor, Getter, Property, PropertyAttributes, Setter};
use crate::objects::value::JsValue;
use crate::spy::registry;

/// Mutable state of one spy record.
///
/// The state machine has two states: installed (trap active) and restored
/// (terminal). Every mutator checks `installed` first, so a handle kept
/// around after restore fails instead of touching a detached record.
pub(crate) struct SpyState {
    /// The spied object; weak so the record never keeps it alive.
    target: WeakObjectRef,
    /// Registry coordinate: the target's process-unique id.
    object_id: u64,
    /// Registry coordinate: the intercepted property name.
    property: String,
    /// Descriptor captured before interception; `None` when the property
    /// did not exist. Immutable once captured.
    original: Option<Property>,
    /// The property's data value at spy-creation time; `undefined` when the
    /// property was absent. Reset reverts to this.
    initial_value: JsValue,
    /// The value returned once the one-time queue is exhausted.
    persistent: JsValue,
    /// One-time override values, consumed front-first.
    once_queue: VecDeque<JsValue>,
    installed: bool,
}

impl SpyState {
    fn ensure_installed(&self) -> GuiseResult<()> {
        if self.installed {
            Ok(())
        } else {
            Err(GuiseError::SpyRestored {
                property: self.property.clone(),
            })
        }
    }

    /// Getter trap: consume the front of the once queue, else return the
    /// persistent value. The persistent value is never consumed.
    fn read(&mut self) -> JsValue {
        self.once_queue
            .pop_front()
            .unwrap_or_else(|| self.persistent.clone())
    }

    /// Setter trap: plain assignment becomes a persistent override, wiping
    /// any pending one-time values.
    fn write(&mut self, value: JsValue) {
        self.once_queue.clear();
        self.persistent = value;
    }
}

/// Installs the accessor trap for `property` on `object` and returns a
/// handle to the new record.
///
/// `original` must be the descriptor captured by validation (`None` for a
/// previously absent property); it is what restore will reinstall. The trap
/// descriptor is always configurable and keeps the original's enumerability,
/// with absent properties installing as enumerable like any fresh data
/// property.
pub(crate) fn install(
    object: &ObjectRef,
    property: &str,
    original: Option<Property>,
) -> GuiseResult<SpyHandle> {
    let initial_value = original
        .as_ref()
        .and_then(|descriptor| descriptor.data_value().cloned())
        .unwrap_or(JsValue::Undefined);

    let mut attributes = PropertyAttributes::CONFIGURABLE;
    if original.as_ref().is_none_or(Property::is_enumerable) {
        attributes |= PropertyAttributes::ENUMERABLE;
    }

    let state = Rc::new(RefCell::new(SpyState {
        target: object.downgrade(),
        object_id: object.id(),
        property: property.to_string(),
        original,
        initial_value: initial_value.clone(),
        persistent: initial_value,
        once_queue: VecDeque::new(),
        installed: true,
    }));

    let getter: Getter = {
        let state = Rc::clone(&state);
        Rc::new(move || state.borrow_mut().read())
    };
    let setter: Setter = {
        let state = Rc::clone(&state);
        Rc::new(move |value| state.borrow_mut().write(value))
    };
    object.define_own_property(
        property,
        Property::new_accessor(Accessor::new(Some(getter), Some(setter)), attributes),
    )?;

    Ok(SpyHandle { state })
}

/// A handle to an installed spy record.
///
/// Handles are cheap to clone and all clones drive the same record; the
/// registry hands out the same record for repeated spy requests on one
/// (target, property) pair. After [`mock_restore`][SpyHandle::mock_restore]
/// the record is terminal and every operation fails with
/// [`GuiseError::SpyRestored`].
#[derive(Clone)]
pub struct SpyHandle {
    state: Rc<RefCell<SpyState>>,
}

impl SpyHandle {
    /// Sets the persistent override value, wiping any pending one-time
    /// values. Observable on the next access. Chainable.
    pub fn mock_value(&self, value: JsValue) -> GuiseResult<&Self> {
        let mut state = self.state.borrow_mut();
        state.ensure_installed()?;
        state.write(value);
        Ok(self)
    }

    /// Appends a one-time override value. One-time values are consumed in
    /// enqueue order, one per access; when the queue empties, access falls
    /// back to the persistent value. Chainable.
    pub fn mock_value_once(&self, value: JsValue) -> GuiseResult<&Self> {
        let mut state = self.state.borrow_mut();
        state.ensure_installed()?;
        state.once_queue.push_back(value);
        Ok(self)
    }

    /// Reverts the override to the value the property had at spy-creation
    /// time. The trap stays installed and the record stays registered.
    pub fn mock_reset(&self) -> GuiseResult<()> {
        let mut state = self.state.borrow_mut();
        state.ensure_installed()?;
        let initial = state.initial_value.clone();
        state.write(initial);
        Ok(())
    }

    /// A value spy keeps no call history, so there is nothing to clear;
    /// this reverts the overridden value exactly like
    /// [`mock_reset`][SpyHandle::mock_reset].
    pub fn mock_clear(&self) -> GuiseResult<()> {
        self.mock_reset()
    }

    /// Undoes the interception entirely: reinstalls the captured original
    /// descriptor (or deletes the property when it never existed) and
    /// deregisters the record. Terminal — every further operation on this
    /// record fails with [`GuiseError::SpyRestored`].
    pub fn mock_restore(&self) -> GuiseResult<()> {
        let mut state = self.state.borrow_mut();
        state.ensure_installed()?;
        state.installed = false;
        let object_id = state.object_id;
        let property = state.property.clone();
        let original = state.original.clone();
        let target = state.target.upgrade();
        drop(state);

        registry::remove(object_id, &property);

        // A dropped target has nothing to reinstall; deregistering the
        // record is all that is left to do.
        if let Some(object) = target {
            match original {
                Some(descriptor) => object.define_own_property(&property, descriptor)?,
                None => {
                    object.delete_own_property(&property);
                }
            }
        }
        Ok(())
    }

    /// Returns the name of the intercepted property.
    pub fn property_name(&self) -> String {
        self.state.borrow().property.clone()
    }

    /// Returns `true` while the trap is installed; `false` once restored.
    pub fn is_installed(&self) -> bool {
        self.state.borrow().installed
    }

    /// Returns `true` if both handles drive the same record.
    pub(crate) fn shares_record(&self, other: &SpyHandle) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for SpyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SpyHandle")
            .field("property", &state.property)
            .field("installed", &state.installed)
            .finish()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
