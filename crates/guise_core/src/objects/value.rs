//! Dynamic value representation.
//!
//! This module provides [`JsValue`], the top-level enum that can hold any
//! value the spy engine traffics in, together with type-checking predicates,
//! strict-equality comparison, and the display rendering used by
//! diagnostics. Primitive variants carry their data inline; `Object` and
//! `Function` hold reference-counted handles whose identity (not contents)
//! defines equality.

use std::fmt;
use std::rc::Rc;

use crate::objects::function::JsFunction;
use crate::objects::js_object::ObjectRef;

/// Any engine value.
///
/// An integral number that fits 31 bits is usually stored as a [`Smi`]
/// ([`JsValue::Smi`]); fractional or large numbers use [`Number`]
/// ([`JsValue::Number`]). The two compare equal under [`PartialEq`] when
/// they denote the same mathematical value, mirroring strict equality.
#[derive(Debug, Clone)]
pub enum JsValue {
    /// The `undefined` primitive.
    Undefined,
    /// The `null` primitive.
    Null,
    /// A boolean (`true` or `false`).
    Boolean(bool),
    /// A small (31-bit signed) integer, stored inline.
    Smi(i32),
    /// A double-precision floating-point number.
    Number(f64),
    /// A string value.
    String(String),
    /// A shared handle to an ordinary object.
    Object(ObjectRef),
    /// A shared handle to a function object.
    Function(Rc<JsFunction>),
}

// ──────────────────────────────────────────────────────────────────────────────
// Type-checking predicates
// ──────────────────────────────────────────────────────────────────────────────

impl JsValue {
    /// Returns `true` if this value is `undefined`.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` if this value is `null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this value is any numeric type (`Smi` or `Number`).
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Smi(_) | Self::Number(_))
    }

    /// Returns `true` if this value is an ordinary object.
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns `true` if this value is callable.
    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Returns the numeric value of `Smi` / `Number`, or `None` otherwise.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Smi(n) => Some(f64::from(*n)),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the runtime type name used in diagnostics.
    ///
    /// Follows `typeof` with one divergence: `null` reports `"null"` rather
    /// than the historical `"object"`, because the name feeds error messages
    /// where precision beats bug-compatibility.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Smi(_) | Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
        }
    }

    /// Returns the property table behind this value, if it has one.
    ///
    /// Ordinary objects expose their own table; functions expose the table
    /// they carry as property-bearing objects. Primitives return `None` —
    /// this is the object-likeness test the spy validator builds on.
    pub fn as_property_target(&self) -> Option<ObjectRef> {
        match self {
            Self::Object(object) => Some(object.clone()),
            Self::Function(function) => Some(function.properties().clone()),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Strict equality
// ──────────────────────────────────────────────────────────────────────────────

/// Strict-equality semantics: primitives compare by value (numbers across
/// the `Smi`/`Number` split; `NaN` is not equal to itself), objects and
/// functions compare by identity.
impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Display rendering
// ──────────────────────────────────────────────────────────────────────────────

/// Renders the value the way a JavaScript-side string coercion would,
/// which keeps spy diagnostics readable next to the host framework's own
/// messages.
impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Smi(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{}", number_to_string(*n)),
            Self::String(s) => write!(f, "{s}"),
            Self::Object(_) => write!(f, "[object Object]"),
            Self::Function(function) => {
                write!(f, "function {}() {{ [native code] }}", function.name())
            }
        }
    }
}

/// Formats an `f64` as a JavaScript number string.
///
/// Special cases: `NaN → "NaN"`, `+∞ → "Infinity"`, `-∞ → "-Infinity"`,
/// and both `+0.0` and `-0.0` → `"0"`. All other values use Rust's default
/// `f64` `Display` formatting, which provides a minimal decimal
/// representation for common values.
fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        // Both +0.0 and -0.0 produce "0".
        "0".to_string()
    } else {
        format!("{n}")
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
