//! Error types shared by every table operation.

use thiserror::Error;

/// Failures surfaced by fallible table operations.
///
/// Lookup and removal misses are not errors: `find` returns `None` and
/// `remove` returns `false`/`None` for absent keys. Errors are reserved for
/// growth failures and broken hash/capacity pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The capacity schedule has no further value to grow into.
    ///
    /// Fatal to the insert that needed the growth, non-fatal to the table:
    /// the pre-resize contents remain fully intact and queryable.
    #[error("capacity schedule exhausted, cannot grow the table")]
    CapacityExhausted,

    /// A probe sequence failed to terminate within `capacity` attempts even
    /// though the table still has free slots.
    ///
    /// This indicates a broken hash/capacity pairing, typically a non-prime
    /// capacity paired with double hashing, and is reported rather than
    /// looped on.
    #[error("probe sequence did not terminate within {capacity} attempts")]
    ProbeCycle {
        /// Capacity of the table whose probe sequence cycled.
        capacity: usize,
    },
}
