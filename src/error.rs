//! Error types for the heapkit library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (debug-only `check_invariants` methods).
//! - [`KeyNotFoundError`]: Returned by update-only operations
//!   ([`HeapMap::set_priority`](crate::map::HeapMap::set_priority)) when the
//!   key is not present.
//!
//! Absence on lookups and emptiness on peeks/pops are expressed as
//! `Option::None`, not as error values; only the operations whose contract
//! is "the key must already exist" carry a dedicated error type.

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal heap invariants are violated.
///
/// Produced by debug-only `check_invariants` methods on
/// [`MinMaxHeap`](crate::ds::MinMaxHeap) and [`HeapMap`](crate::map::HeapMap).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// KeyNotFoundError
// ---------------------------------------------------------------------------

/// Error returned by update-only operations when the key is absent.
///
/// # Example
///
/// ```
/// use heapkit::error::KeyNotFoundError;
/// use heapkit::HeapMap;
///
/// let mut map: HeapMap<&str, i32> = HeapMap::new();
/// assert_eq!(map.set_priority(&"missing", 1), Err(KeyNotFoundError));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNotFoundError;

impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key is not present in the map")
    }
}

impl std::error::Error for KeyNotFoundError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("slot count mismatch");
        assert_eq!(err.to_string(), "slot count mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }

    // -- KeyNotFoundError -------------------------------------------------

    #[test]
    fn key_not_found_display() {
        assert_eq!(
            KeyNotFoundError.to_string(),
            "key is not present in the map"
        );
    }

    #[test]
    fn key_not_found_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<KeyNotFoundError>();
    }
}
