//! Warning emission for the spy engine.
//!
//! The engine raises exactly one advisory — "spying on an undefined
//! property" — and routes it through the [`log`] facade under the `"guise"`
//! target, so embedders control the backend. Tests (and callers that want to
//! assert on advisories) can temporarily divert warnings into a buffer with
//! [`capture_warnings`]; the diversion is per thread and nests.

use std::cell::RefCell;

thread_local! {
    /// Capture buffer for the current thread, or `None` when warnings go to
    /// the `log` facade.
    static CAPTURE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Emits a human-readable warning.
///
/// Goes to the active capture buffer if [`capture_warnings`] is in effect on
/// this thread, otherwise to `log::warn!` under the `"guise"` target.
pub(crate) fn warn(message: &str) {
    let captured = CAPTURE.with(|capture| {
        if let Some(buffer) = capture.borrow_mut().as_mut() {
            buffer.push(message.to_string());
            true
        } else {
            false
        }
    });
    if !captured {
        log::warn!(target: "guise", "{message}");
    }
}

/// Runs `f` with warnings diverted into a buffer and returns the closure's
/// result together with every warning emitted on this thread while it ran.
///
/// Nested captures are supported: the inner capture sees only its own
/// warnings, and the outer buffer is reinstated when the inner call returns.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let previous = CAPTURE.with(|capture| capture.borrow_mut().replace(Vec::new()));
    let result = f();
    let warnings = CAPTURE.with(|capture| {
        let mut slot = capture.borrow_mut();
        let collected = slot.take().unwrap_or_default();
        *slot = previous;
        collected
    });
    (result, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_collects_warnings_in_order() {
        let ((), warnings) = capture_warnings(|| {
            warn("first");
            warn("second");
        });
        assert_eq!(warnings, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_capture_returns_closure_result() {
        let (value, warnings) = capture_warnings(|| 42);
        assert_eq!(value, 42);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_nested_capture_keeps_outer_buffer() {
        let ((), outer) = capture_warnings(|| {
            warn("outer-before");
            let ((), inner) = capture_warnings(|| warn("inner"));
            assert_eq!(inner, vec!["inner".to_string()]);
            warn("outer-after");
        });
        assert_eq!(
            outer,
            vec!["outer-before".to_string(), "outer-after".to_string()]
        );
    }

    #[test]
    fn test_warn_without_capture_does_not_panic() {
        // Routed to the `log` facade; with no logger installed this is a
        // silent no-op.
        warn("unobserved");
    }
}
