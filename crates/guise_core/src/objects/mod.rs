/// Callable function objects with their own property tables.
pub mod function;
/// Dynamic ordinary objects with descriptor-based property storage.
pub mod js_object;
/// Property descriptors: attribute flags, accessor pairs, and data slots.
pub mod property;
/// Top-level dynamic value enum with strict equality and display rendering.
pub mod value;
