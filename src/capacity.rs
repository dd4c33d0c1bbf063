//! The capacity schedule: a predetermined list of table sizes consumed
//! front to back as a table grows.

use alloc::collections::VecDeque;

use crate::error::Error;

/// An ordered list of table capacities, consumed strictly front to back.
///
/// A schedule stands in for the usual grow-by-doubling formula: operators
/// decide the exact sizes a table may pass through, and growth beyond the
/// last size is a hard failure. Each table owns its schedule, so two tables
/// never share or race on the same list.
///
/// Double hashing relies on prime capacities for its full-cycle probing
/// guarantee, so schedules feeding a double-hashing table should contain
/// primes only.
///
/// # Examples
///
/// ```rust
/// use tri_hash::CapacitySchedule;
///
/// let mut schedule = CapacitySchedule::new([7, 13, 29]);
/// assert_eq!(schedule.next_capacity(), Ok(7));
/// assert_eq!(schedule.peek(), Some(13));
/// assert_eq!(schedule.remaining(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacitySchedule {
    remaining: VecDeque<usize>,
}

impl CapacitySchedule {
    /// Creates a schedule from an ordered list of capacities.
    ///
    /// # Panics
    ///
    /// Panics if any capacity is zero; a capacity is used as a modulus and
    /// must be positive.
    pub fn new(capacities: impl IntoIterator<Item = usize>) -> Self {
        let mut schedule = Self {
            remaining: VecDeque::new(),
        };
        schedule.configure(capacities);
        schedule
    }

    /// Replaces the remaining schedule with a new list.
    ///
    /// Already-consumed capacities are unaffected; only future growth sees
    /// the new list.
    ///
    /// # Panics
    ///
    /// Panics if any capacity is zero.
    pub fn configure(&mut self, capacities: impl IntoIterator<Item = usize>) {
        self.remaining = capacities.into_iter().collect();
        assert!(
            self.remaining.iter().all(|&capacity| capacity > 0),
            "capacities must be positive"
        );
    }

    /// Consumes and returns the next capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] when the schedule is empty. There
    /// is no synthesized fallback; the caller must not grow further.
    pub fn next_capacity(&mut self) -> Result<usize, Error> {
        self.remaining.pop_front().ok_or(Error::CapacityExhausted)
    }

    /// Returns the next capacity without consuming it.
    pub fn peek(&self) -> Option<usize> {
        self.remaining.front().copied()
    }

    /// Returns how many capacities are left.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Returns `true` if no further capacity is available.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}

impl FromIterator<usize> for CapacitySchedule {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::new(iter)
    }
}
