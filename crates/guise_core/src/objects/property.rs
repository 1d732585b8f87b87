//! Property descriptors: attribute flags, accessor pairs, and data slots.
//!
//! Every named property on a [`JsObject`][crate::objects::js_object::JsObject]
//! is backed by a full [`Property`] descriptor: either a plain data slot or a
//! getter/setter pair, combined with its [`PropertyAttributes`] flags. The
//! descriptor — not the current value — is what the spy engine captures
//! before interception and reinstalls on restore.

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::objects::value::JsValue;

bitflags! {
    /// ECMAScript-style property attribute flags.
    ///
    /// `WRITABLE` only applies to data slots; accessor properties carry the
    /// other two flags and route writes through their setter instead.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PropertyAttributes: u8 {
        /// The value may be changed by ordinary assignment.
        const WRITABLE = 1 << 0;
        /// The property shows up in enumeration.
        const ENUMERABLE = 1 << 1;
        /// The property may be redefined or deleted.
        const CONFIGURABLE = 1 << 2;
    }
}

impl PropertyAttributes {
    /// The attribute set given to properties created by plain assignment.
    pub const DATA_DEFAULT: Self = Self::WRITABLE
        .union(Self::ENUMERABLE)
        .union(Self::CONFIGURABLE);
}

// ──────────────────────────────────────────────────────────────────────────────
// Accessor
// ──────────────────────────────────────────────────────────────────────────────

/// A getter callback installed on an accessor property.
pub type Getter = Rc<dyn Fn() -> JsValue>;

/// A setter callback installed on an accessor property.
pub type Setter = Rc<dyn Fn(JsValue)>;

/// The getter/setter pair of an accessor property.
///
/// Either side may be absent: reading through a getter-less accessor yields
/// `undefined`, and writing through a setter-less accessor is a `TypeError`.
#[derive(Clone, Default)]
pub struct Accessor {
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl Accessor {
    /// Creates an accessor from optional getter and setter callbacks.
    pub fn new(getter: Option<Getter>, setter: Option<Setter>) -> Self {
        Self { getter, setter }
    }

    /// Returns a shared handle to the getter, if one is installed.
    pub fn getter(&self) -> Option<Getter> {
        self.getter.clone()
    }

    /// Returns a shared handle to the setter, if one is installed.
    pub fn setter(&self) -> Option<Setter> {
        self.setter.clone()
    }

    /// Returns `true` if a getter is installed.
    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    /// Returns `true` if a setter is installed.
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }
}

// Implement Debug manually because closures don't implement Debug.
impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("getter", &self.getter.as_ref().map(|_| "<fn>"))
            .field("setter", &self.setter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Property
// ──────────────────────────────────────────────────────────────────────────────

/// The slot a property descriptor is backed by.
#[derive(Debug, Clone)]
enum Slot {
    /// A plain value slot.
    Data(JsValue),
    /// A getter/setter pair.
    Accessor(Accessor),
}

/// A full property descriptor: a data or accessor slot plus its attribute
/// flags.
///
/// Combines the slot and the flags so that the owning map's key alone is
/// sufficient to look up both.
#[derive(Debug, Clone)]
pub struct Property {
    slot: Slot,
    attributes: PropertyAttributes,
}

impl Property {
    /// Creates a data descriptor with the given value and attribute flags.
    pub fn new_data(value: JsValue, attributes: PropertyAttributes) -> Self {
        Self {
            slot: Slot::Data(value),
            attributes,
        }
    }

    /// Creates an accessor descriptor with the given callbacks and flags.
    pub fn new_accessor(accessor: Accessor, attributes: PropertyAttributes) -> Self {
        Self {
            slot: Slot::Accessor(accessor),
            attributes,
        }
    }

    /// Returns `true` if this descriptor is backed by a plain value slot.
    pub fn is_data(&self) -> bool {
        matches!(self.slot, Slot::Data(_))
    }

    /// Returns `true` if this descriptor is backed by a getter/setter pair.
    pub fn is_accessor(&self) -> bool {
        matches!(self.slot, Slot::Accessor(_))
    }

    /// Returns the stored data value, or `None` for accessor descriptors.
    pub fn data_value(&self) -> Option<&JsValue> {
        match &self.slot {
            Slot::Data(value) => Some(value),
            Slot::Accessor(_) => None,
        }
    }

    /// Returns the accessor pair, or `None` for data descriptors.
    pub fn accessor(&self) -> Option<&Accessor> {
        match &self.slot {
            Slot::Data(_) => None,
            Slot::Accessor(accessor) => Some(accessor),
        }
    }

    /// Replaces the stored data value; no-op on accessor descriptors.
    pub(crate) fn set_data_value(&mut self, value: JsValue) {
        if let Slot::Data(slot) = &mut self.slot {
            *slot = value;
        }
    }

    /// Returns the property attribute flags.
    pub fn attributes(&self) -> PropertyAttributes {
        self.attributes
    }

    /// Returns `true` if the `WRITABLE` flag is set.
    pub fn is_writable(&self) -> bool {
        self.attributes.contains(PropertyAttributes::WRITABLE)
    }

    /// Returns `true` if the `ENUMERABLE` flag is set.
    pub fn is_enumerable(&self) -> bool {
        self.attributes.contains(PropertyAttributes::ENUMERABLE)
    }

    /// Returns `true` if the `CONFIGURABLE` flag is set.
    pub fn is_configurable(&self) -> bool {
        self.attributes.contains(PropertyAttributes::CONFIGURABLE)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
