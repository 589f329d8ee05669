//! Text input feeding the counter.
//!
//! Text that doesn't parse to a finite number is dropped without telling the
//! user; surfacing a validation message is left to whatever renders the field.

use crate::action::increment_by_amount;
use crate::store::CounterStore;

/// Parses user text into an increment amount.
///
/// Accepts decimal numbers as `f64::from_str` reads them (`"2.5"`, `"-3"`,
/// `"1e3"`), ignoring surrounding whitespace. Empty text, hex or other radix
/// literals (`"0x1A"`), `NaN` and infinities all yield `None`, so blank input
/// is dropped rather than treated as `0`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Dispatches `Increment` for `text` if it parses; returns whether it did.
pub fn dispatch_amount(store: &CounterStore, text: &str) -> bool {
    match parse_amount(text) {
        Some(amount) => {
            store.dispatch(increment_by_amount(amount));
            true
        }
        None => {
            log::debug!("ignoring non-numeric amount {text:?}");
            false
        }
    }
}
