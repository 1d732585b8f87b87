//! Process-wide bookkeeping of installed spy records.
//!
//! The registry is a two-level map keyed by object id, then property name.
//! It backs the dedup guarantee (one record per (target, property) pair)
//! and the bulk verbs that sweep every live record at once. Spy records are
//! thread-confined, so the registry lives in a thread local; each test
//! thread sees its own.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::spy::record::SpyHandle;

thread_local! {
    static REGISTRY: RefCell<HashMap<u64, HashMap<String, SpyHandle>>> =
        RefCell::new(HashMap::new());
}

/// Looks up the record registered for (object, property), if any.
pub(crate) fn get(object_id: u64, property: &str) -> Option<SpyHandle> {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .get(&object_id)
            .and_then(|properties| properties.get(property))
            .cloned()
    })
}

/// Registers a record under (object, property), replacing any stale entry.
pub(crate) fn insert(object_id: u64, property: &str, handle: SpyHandle) {
    REGISTRY.with(|registry| {
        registry
            .borrow_mut()
            .entry(object_id)
            .or_default()
            .insert(property.to_string(), handle);
    });
}

/// Removes the record registered for (object, property). An object with no
/// remaining records is pruned so ids of dead objects do not accumulate.
pub(crate) fn remove(object_id: u64, property: &str) {
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if let Some(properties) = registry.get_mut(&object_id) {
            properties.remove(property);
            if properties.is_empty() {
                registry.remove(&object_id);
            }
        }
    });
}

/// Returns `true` if a record is registered for (object, property).
pub(crate) fn contains(object_id: u64, property: &str) -> bool {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .get(&object_id)
            .is_some_and(|properties| properties.contains_key(property))
    })
}

/// Snapshots every registered record.
///
/// Bulk verbs iterate the snapshot rather than the live map: restore
/// mutates the registry mid-sweep, and a record restored earlier in the
/// sweep simply reports itself as such when touched again.
pub(crate) fn records() -> Vec<SpyHandle> {
    REGISTRY.with(|registry| {
        registry
            .borrow()
            .values()
            .flat_map(|properties| properties.values().cloned())
            .collect()
    })
}

/// Reverts every registered record to its spy-creation value. Traps stay
/// installed.
pub fn clear_all() {
    for record in records() {
        let _ = record.mock_clear();
    }
}

/// Reverts every registered record to its spy-creation value. Traps stay
/// installed.
pub fn reset_all() {
    for record in records() {
        let _ = record.mock_reset();
    }
}

/// Restores every registered record, emptying the registry. Records already
/// restored by an overlapping sweep are skipped.
pub fn restore_all() {
    for record in records() {
        let _ = record.mock_restore();
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
