//! Dynamic ordinary objects with descriptor-based property storage.
//!
//! # Storage model
//!
//! A [`JsObject`] keeps its named properties in dictionary mode: each entry
//! of the backing [`HashMap`] carries a full [`Property`] descriptor (data
//! slot or accessor pair plus attribute flags). Property interception swaps
//! a data descriptor for an accessor descriptor in place, so the dictionary
//! is the natural storage shape for every object this engine touches.
//!
//! # Identity
//!
//! Every object is stamped with a process-unique 64-bit id at creation. The
//! spy registry keys on that id rather than on addresses, so identities
//! survive allocator address reuse.
//!
//! # Sharing
//!
//! Objects are shared through [`ObjectRef`], a reference-counted handle.
//! `ObjectRef::get` and `ObjectRef::set` clone the accessor callback out of
//! the descriptor and release the object borrow before invoking it, so an
//! accessor may freely re-enter the object it is installed on.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{GuiseError, GuiseResult};
use crate::objects::property::{Property, PropertyAttributes};
use crate::objects::value::JsValue;

/// Global counter for process-unique object ids.
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// A dynamic ordinary object: a property table keyed by name, where every
/// entry is a full [`Property`] descriptor.
#[derive(Debug)]
pub struct JsObject {
    /// Unique object id, assigned at creation and never reused.
    id: u64,
    /// Named-property backing store.
    properties: HashMap<String, Property>,
}

impl JsObject {
    /// Creates an empty object with a fresh id.
    pub fn new() -> Self {
        Self {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            properties: HashMap::new(),
        }
    }

    /// Returns this object's process-unique id.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the descriptor of an own property without invoking accessors,
    /// or `None` if the property does not exist.
    pub fn own_property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Returns `true` if this object has an own property named `key`.
    pub fn has_own_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Returns the names of all own properties; order is unspecified.
    pub fn own_property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// `[[DefineOwnProperty]]`: defines or redefines an own property with an
    /// explicit descriptor, enforcing the constraints on existing
    /// non-configurable properties:
    ///
    /// * `[[Configurable]]` cannot change from `false` to `true`.
    /// * `[[Enumerable]]` cannot change.
    /// * The slot kind cannot switch between data and accessor.
    /// * `[[Writable]]` cannot change from `false` to `true`.
    ///
    /// Returns [`GuiseError::TypeError`] when a constraint is violated.
    pub fn define_own_property(&mut self, key: &str, property: Property) -> GuiseResult<()> {
        if let Some(existing) = self.properties.get(key)
            && !existing.is_configurable()
        {
            if property.is_configurable() {
                return Err(GuiseError::TypeError(format!(
                    "Cannot redefine property '{key}': \
                     [[Configurable]] cannot change from false to true"
                )));
            }
            if property.is_enumerable() != existing.is_enumerable() {
                return Err(GuiseError::TypeError(format!(
                    "Cannot redefine property '{key}': \
                     [[Enumerable]] cannot change on a non-configurable property"
                )));
            }
            if property.is_data() != existing.is_data() {
                return Err(GuiseError::TypeError(format!(
                    "Cannot redefine property '{key}': cannot switch between a data \
                     property and an accessor on a non-configurable property"
                )));
            }
            if existing.is_data() && !existing.is_writable() && property.is_writable() {
                return Err(GuiseError::TypeError(format!(
                    "Cannot redefine property '{key}': \
                     [[Writable]] cannot change from false to true"
                )));
            }
        }
        self.properties.insert(key.to_string(), property);
        Ok(())
    }

    /// `[[Delete]]`: removes an own property.
    ///
    /// Returns `true` if the property was deleted or did not exist, `false`
    /// if it is non-configurable and therefore cannot be deleted.
    pub fn delete_own_property(&mut self, key: &str) -> bool {
        match self.properties.get(key) {
            None => true,
            Some(property) if !property.is_configurable() => false,
            Some(_) => {
                self.properties.remove(key);
                true
            }
        }
    }
}

impl Default for JsObject {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// ObjectRef
// ──────────────────────────────────────────────────────────────────────────────

/// A shared, cheaply clonable handle to a [`JsObject`].
///
/// Equality is identity: two handles compare equal only when they point at
/// the same object.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<JsObject>>);

impl ObjectRef {
    /// Creates a fresh empty object and returns the handle to it.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(JsObject::new())))
    }

    /// Returns the object's process-unique id.
    pub fn id(&self) -> u64 {
        self.0.borrow().id()
    }

    /// Returns a clone of the descriptor of an own property without invoking
    /// accessors, or `None` if the property does not exist.
    pub fn own_property(&self, key: &str) -> Option<Property> {
        self.0.borrow().own_property(key).cloned()
    }

    /// Returns `true` if the object has an own property named `key`.
    pub fn has_own_property(&self, key: &str) -> bool {
        self.0.borrow().has_own_property(key)
    }

    /// Returns the names of all own properties; order is unspecified.
    pub fn own_property_names(&self) -> Vec<String> {
        self.0.borrow().own_property_names()
    }

    /// `[[Get]]`: returns the property's value.
    ///
    /// Data slots return a clone of the stored value. Accessor properties
    /// invoke their getter with the object borrow released, so the getter
    /// may re-enter this object. Missing properties and getter-less
    /// accessors read as `undefined`.
    pub fn get(&self, key: &str) -> JsValue {
        let getter = {
            let object = self.0.borrow();
            let Some(property) = object.own_property(key) else {
                return JsValue::Undefined;
            };
            if let Some(value) = property.data_value() {
                return value.clone();
            }
            property.accessor().and_then(|accessor| accessor.getter())
        };
        match getter {
            Some(getter) => getter(),
            None => JsValue::Undefined,
        }
    }

    /// `[[Set]]`: ordinary assignment.
    ///
    /// Updates an existing writable data slot, routes through the setter of
    /// an accessor property (with the object borrow released), or creates a
    /// new data property with [`PropertyAttributes::DATA_DEFAULT`] flags.
    ///
    /// Returns [`GuiseError::TypeError`] when the data slot is read-only or
    /// the accessor has no setter.
    pub fn set(&self, key: &str, value: JsValue) -> GuiseResult<()> {
        let setter = {
            let mut object = self.0.borrow_mut();
            match object.properties.entry(key.to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(Property::new_data(
                        value,
                        PropertyAttributes::DATA_DEFAULT,
                    ));
                    return Ok(());
                }
                Entry::Occupied(mut slot) => {
                    let property = slot.get_mut();
                    if property.is_data() {
                        if !property.is_writable() {
                            return Err(GuiseError::TypeError(format!(
                                "Cannot assign to read-only property '{key}'"
                            )));
                        }
                        property.set_data_value(value);
                        return Ok(());
                    }
                    let Some(setter) = property.accessor().and_then(|accessor| accessor.setter())
                    else {
                        return Err(GuiseError::TypeError(format!(
                            "Cannot set property '{key}' which has only a getter"
                        )));
                    };
                    setter
                }
            }
        };
        setter(value);
        Ok(())
    }

    /// `[[DefineOwnProperty]]` on the shared object; see
    /// [`JsObject::define_own_property`].
    pub fn define_own_property(&self, key: &str, property: Property) -> GuiseResult<()> {
        self.0.borrow_mut().define_own_property(key, property)
    }

    /// `[[Delete]]` on the shared object; see
    /// [`JsObject::delete_own_property`].
    pub fn delete_own_property(&self, key: &str) -> bool {
        self.0.borrow_mut().delete_own_property(key)
    }

    /// Returns a weak handle that does not keep the object alive.
    pub fn downgrade(&self) -> WeakObjectRef {
        WeakObjectRef(Rc::downgrade(&self.0))
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity: two handles are equal only when they share the same object.
impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(f, "ObjectRef(#{})", object.id()),
            Err(_) => write!(f, "ObjectRef(<borrowed>)"),
        }
    }
}

/// A non-owning handle to a shared [`JsObject`].
///
/// Spy records hold their target through this type so that a record never
/// extends the lifetime of the object it spies on.
#[derive(Debug, Clone)]
pub struct WeakObjectRef(Weak<RefCell<JsObject>>);

impl WeakObjectRef {
    /// Attempts to upgrade to a strong handle.
    ///
    /// Returns `None` if every [`ObjectRef`] to the object has been dropped.
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
