//! `guise_core` — a value-property spy engine for dynamic objects.
//!
//! Test frameworks mock callable members; Guise covers the rest. It installs
//! a getter/setter trap over a plain data property of a dynamic object,
//! hands back a handle that overrides what reads observe (persistently or
//! one access at a time), and undoes the whole interception on restore,
//! bit-for-bit down to the property's original descriptor. A registry keyed
//! by object identity deduplicates spies and powers the bulk lifecycle verbs
//! test harnesses hook into.
//!
//! Spying is defined over the crate's own dynamic object model ([`objects`])
//! rather than arbitrary Rust structs: interception needs properties backed
//! by swappable descriptors, which is a capability boundary, not an
//! implementation detail.
//!
//! # Crate layout
//!
//! - [`objects`] — Dynamic value representation and descriptor-based
//!   property storage.
//! - [`spy`] — The spy engine: validation, interception, records, registry.
//! - [`harness`] — Bridge wrapping a host test framework's spy and
//!   lifecycle verbs.
//! - [`error`] — The [`GuiseError`][error::GuiseError] taxonomy.
//! - [`logging`] — Warning emission with a per-thread capture hook.

/// Error taxonomy and the crate-wide result alias.
pub mod error;
/// Bridge wrapping a host test framework's spy and lifecycle verbs.
pub mod harness;
/// Warning emission with a per-thread capture hook for tests.
pub mod logging;
/// Dynamic value representation and descriptor-based property storage.
pub mod objects;
/// The spy engine: validation, interception, records, and the registry.
pub mod spy;
