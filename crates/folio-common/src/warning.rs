//! Converter warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! The renderer uses it for elements it has no markup for; parse issues are
//! reported through the parser's own callback instead.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn warning_key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about something a component skipped (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("LaTeX", "no markup for <span>, rendering its children only");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(warning_key(component, message));

    if should_print {
        eprintln!("{}", format!("[Folio {component}] ⚠ {message}").yellow());
    }
}

/// Returns true if this exact warning has been printed since the last
/// [`clear_warnings`].
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&warning_key(component, message)))
}

/// Clear all recorded warnings (call before converting a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded_once() {
        warn_once("Test", "recorded warning");
        warn_once("Test", "recorded warning");
        assert!(has_warned("Test", "recorded warning"));
        assert!(!has_warned("Test", "never printed"));
    }
}
