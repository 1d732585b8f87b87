//! Callable function objects.
//!
//! A [`JsFunction`] pairs a native Rust callback with a name and an own
//! property table. The property table is an ordinary [`JsObject`] shared
//! through [`ObjectRef`], which makes functions property-bearing spy targets
//! exactly like plain objects: only the function's *callable* nature is out
//! of the value-spy engine's reach.
//!
//! [`JsObject`]: crate::objects::js_object::JsObject

use std::fmt;

use crate::error::GuiseResult;
use crate::objects::js_object::ObjectRef;
use crate::objects::value::JsValue;

/// A host-side (Rust) callback implementing a function's behaviour.
///
/// The callback receives a slice of [`JsValue`] arguments and returns a
/// [`GuiseResult`]`<`[`JsValue`]`>`. The first element of `args` is the
/// `this` value by convention; subsequent elements are the positional
/// arguments.
pub type NativeFn = fn(&[JsValue]) -> GuiseResult<JsValue>;

/// A function object: a named native callback carrying its own property
/// table.
pub struct JsFunction {
    /// The function's declared name; empty for anonymous functions.
    name: String,
    /// The Rust callback invoked by [`call`][JsFunction::call].
    native: NativeFn,
    /// Own properties of the function object.
    properties: ObjectRef,
}

impl JsFunction {
    /// Creates a function from a name and a native callback.
    pub fn new(name: impl Into<String>, native: NativeFn) -> Self {
        Self {
            name: name.into(),
            native,
            properties: ObjectRef::new(),
        }
    }

    /// Creates a function whose callback ignores its arguments and returns
    /// `undefined`.
    pub fn noop(name: impl Into<String>) -> Self {
        Self::new(name, |_| Ok(JsValue::Undefined))
    }

    /// Returns the function's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the function's own property table.
    pub fn properties(&self) -> &ObjectRef {
        &self.properties
    }

    /// Invokes the native callback.
    ///
    /// `args` should follow the convention that `args[0]` is `this` and
    /// subsequent elements are positional arguments.
    pub fn call(&self, args: &[JsValue]) -> GuiseResult<JsValue> {
        (self.native)(args)
    }
}

// Implement Debug manually so the fn pointer renders as a placeholder.
impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsFunction")
            .field("name", &self.name)
            .field("native", &"<fn>")
            .field("properties", &self.properties)
            .finish()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
