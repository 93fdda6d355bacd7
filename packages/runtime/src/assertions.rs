//! Internal invariant checks for the builder and block bookkeeping.
//!
//! Failing one means the builder protocol was broken, e.g. closing more
//! elements than were opened.

#[track_caller]
pub fn existing<T>(value: Option<T>, what: &str) -> T {
    match value {
        Some(value) => value,
        None => panic!("BUG: expected {what} to be present"),
    }
}
