//! Error types for the Guise engine.

use thiserror::Error;

/// All errors that can be produced by the Guise engine.
///
/// The first variant covers the object substrate itself (descriptor
/// violations surface the way a JavaScript runtime would report them); the
/// remaining variants form the spy-creation and spy-lifecycle taxonomy.
/// Every spy failure names the offending property and, where relevant, the
/// runtime type of the target, so a misused spy is immediately debuggable.
#[derive(Debug, Error)]
pub enum GuiseError {
    /// A property-descriptor violation in the object model: assignment to a
    /// read-only property, an illegal redefinition of a non-configurable
    /// property, or a write through a getter-only accessor.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// The spy target is not an object-like value.
    ///
    /// Only objects and functions carry a property table; `undefined`,
    /// `null`, booleans, numbers, and strings cannot host a trap.
    #[error("cannot spy on a primitive value; {type_name} `{value}` given")]
    InvalidTarget {
        /// Runtime type of the rejected target (`"number"`, `"null"`, ...).
        type_name: &'static str,
        /// Display rendering of the rejected target.
        value: String,
    },

    /// The property exists but its descriptor is non-configurable, so a trap
    /// could not be installed and later removed without corrupting it.
    #[error("cannot spy on the property `{property}` because it is not configurable")]
    NotConfigurable {
        /// The property that was asked for.
        property: String,
    },

    /// The property is not a plain data slot: it is an accessor, or its
    /// value is callable. Such members belong to the host framework's call
    /// spy, not to this engine.
    #[error(
        "cannot spy on the property `{property}` because it is {offender}; \
         use the host framework's call spy instead"
    )]
    NotADataProperty {
        /// The property that was asked for.
        property: String,
        /// `"a function"` or `"an accessor"`.
        offender: &'static str,
    },

    /// An operation was invoked on a spy record that has already been
    /// restored. Restore is terminal: the record left the registry and its
    /// trap was detached.
    #[error("the spy on property `{property}` has already been restored")]
    SpyRestored {
        /// The property the expired spy was installed on.
        property: String,
    },

    /// The host framework refused an explicit-access native property spy.
    ///
    /// Only produced by the bridge when the caller pinned an
    /// [`AccessKind`][crate::harness::AccessKind]; without one the bridge
    /// falls back to this engine instead of failing.
    #[error("the host framework rejected spying on `{property}`: {reason}")]
    NativeRejected {
        /// The property that was asked for.
        property: String,
        /// The host framework's stated reason.
        reason: String,
    },
}

/// Convenient `Result` alias for fallible engine operations.
pub type GuiseResult<T> = Result<T, GuiseError>;
