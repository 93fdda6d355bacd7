//! Internal invariant checks.
//!
//! These guard the compiler's own bookkeeping (parser state stacks, scope
//! frames). Template errors never reach them.

/// Unwraps a value the surrounding code requires, panicking with
/// `expected {what} to be present` otherwise.
#[track_caller]
pub fn existing<T>(value: Option<T>, what: &str) -> T {
    match value {
        Some(value) => value,
        None => panic!("BUG: expected {what} to be present"),
    }
}

/// Asserts that a stack pop matched the frame the caller expected.
#[track_caller]
pub fn assert_balanced(expected: &str, actual: &str) {
    if expected != actual {
        panic!("BUG: unbalanced state stack, expected {expected} but found {actual}");
    }
}
