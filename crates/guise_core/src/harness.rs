//! Bridge between a host test framework and the value-property spy engine.
//!
//! The host owns call spying and the per-suite lifecycle hooks; this engine
//! owns value-property spying. [`extend`] wraps a host so the two stay in
//! step: each bulk lifecycle verb drives both subsystems, and
//! [`Extended::spy_on`] gives callers one entry point that prefers the
//! host's native spy and falls back to a value spy when the host refuses.

use std::fmt;

use crate::error::{GuiseError, GuiseResult};
use crate::objects::value::JsValue;
use crate::spy::{self, SpyHandle};

/// Which accessor side a native spy should intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Intercept reads (the property's getter).
    Get,
    /// Intercept writes (the property's setter).
    Set,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Set => write!(f, "set"),
        }
    }
}

/// A host framework's refusal to spy on a member natively.
///
/// Not an error by itself: without a pinned [`AccessKind`] the bridge treats
/// a rejection as the signal to fall back to a value spy. It only surfaces
/// as [`GuiseError::NativeRejected`] when the caller demanded native
/// interception.
#[derive(Debug, Clone)]
pub struct NativeRejection {
    reason: String,
}

impl NativeRejection {
    /// Creates a rejection with the host's stated reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The host's stated reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn into_reason(self) -> String {
        self.reason
    }
}

/// The host test framework as the bridge sees it.
///
/// # Contract
/// `try_spy_on` must either install a native spy and return the host's spy
/// object, or return a [`NativeRejection`] having installed **nothing** —
/// the bridge falls back to a value spy on rejection, and a half-installed
/// native spy would leave the member intercepted twice. The three bulk verbs
/// apply the host's clear/reset/restore semantics to every native mock.
pub trait MockFramework {
    /// The host's own spy object type.
    type NativeSpy;

    /// Attempts to install a native spy on (target, property).
    ///
    /// `access` pins the accessor side to intercept; `None` requests the
    /// host's default members-that-are-callable spying.
    fn try_spy_on(
        &mut self,
        target: &JsValue,
        property: &str,
        access: Option<AccessKind>,
    ) -> Result<Self::NativeSpy, NativeRejection>;

    /// Clears every native mock's recorded state.
    fn clear_all_mocks(&mut self);

    /// Resets every native mock to its initial configuration.
    fn reset_all_mocks(&mut self);

    /// Restores every natively-spied member to its original implementation.
    fn restore_all_mocks(&mut self);
}

/// The spy installed by [`Extended::spy_on`]: the host's native spy or this
/// engine's value spy, dispatched by tag rather than by error handling.
#[derive(Debug)]
pub enum PropertySpy<N> {
    /// The host framework accepted the member.
    Native(N),
    /// The host refused and the engine installed a value spy.
    Value(SpyHandle),
}

impl<N> PropertySpy<N> {
    /// Returns `true` for the host-native branch.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Returns `true` for the value-spy branch.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns the native spy object, if this is the native branch.
    pub fn as_native(&self) -> Option<&N> {
        match self {
            Self::Native(native) => Some(native),
            Self::Value(_) => None,
        }
    }

    /// Returns the value-spy handle, if this is the value branch.
    pub fn as_value(&self) -> Option<&SpyHandle> {
        match self {
            Self::Native(_) => None,
            Self::Value(handle) => Some(handle),
        }
    }
}

/// Wraps `framework` so its lifecycle verbs also drive the value-spy
/// registry.
pub fn extend<F: MockFramework>(framework: F) -> Extended<F> {
    Extended { framework }
}

/// A host framework extended with value-property spying.
#[derive(Debug)]
pub struct Extended<F> {
    framework: F,
}

impl<F: MockFramework> Extended<F> {
    /// Spies on (target, property), native first.
    ///
    /// With an explicit `access` kind the request is native-only: the host's
    /// rejection surfaces as [`GuiseError::NativeRejected`], because a value
    /// spy cannot honor a get-only or set-only contract. Without one, the
    /// host gets the first try and a rejection falls back to
    /// [`spy::spy_on_property`].
    pub fn spy_on(
        &mut self,
        target: &JsValue,
        property: &str,
        access: Option<AccessKind>,
    ) -> GuiseResult<PropertySpy<F::NativeSpy>> {
        match self.framework.try_spy_on(target, property, access) {
            Ok(native) => Ok(PropertySpy::Native(native)),
            Err(rejection) if access.is_some() => Err(GuiseError::NativeRejected {
                property: property.to_string(),
                reason: rejection.into_reason(),
            }),
            Err(_) => spy::spy_on_property(target, property).map(PropertySpy::Value),
        }
    }

    /// Returns `true` if a value spy is installed on (target, property).
    ///
    /// Native spies are the host's bookkeeping; this answers for the value
    /// registry only.
    pub fn is_spied(&self, target: &JsValue, property: &str) -> bool {
        spy::is_spied(target, property)
    }

    /// Clears the host's mocks and every value spy's override.
    pub fn clear_all_mocks(&mut self) {
        self.framework.clear_all_mocks();
        spy::clear_all_spies();
    }

    /// Resets the host's mocks and every value spy's override.
    pub fn reset_all_mocks(&mut self) {
        self.framework.reset_all_mocks();
        spy::reset_all_spies();
    }

    /// Restores the host's mocks and every value spy.
    pub fn restore_all_mocks(&mut self) {
        self.framework.restore_all_mocks();
        spy::restore_all_spies();
    }

    /// Borrows the wrapped host framework.
    pub fn framework(&self) -> &F {
        &self.framework
    }

    /// Mutably borrows the wrapped host framework.
    pub fn framework_mut(&mut self) -> &mut F {
        &mut self.framework
    }

    /// Unwraps the bridge, returning the host framework.
    pub fn into_inner(self) -> F {
        self.framework
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
