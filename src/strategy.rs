//! Collision-resolution strategies and their probe sequences.

/// The collision-resolution policy of a table, fixed at construction.
///
/// The variant set is closed and small, so strategies are a plain enum with
/// static dispatch rather than a trait object.
///
/// - [`Chaining`](Strategy::Chaining) keeps one append-ordered bucket per
///   primary index; capacity bounds bucket count, not total entries.
/// - [`LinearProbing`](Strategy::LinearProbing) scans slots `h1 + i` for
///   attempt `i`, wrapping at capacity. Any capacity gives a full cycle.
/// - [`DoubleHashing`](Strategy::DoubleHashing) scans `h1 + i * h2` where
///   the step `h2` is derived from the primary hash and never zero. The
///   full-cycle guarantee requires a prime capacity so the step is coprime
///   with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Separate chaining with append-ordered per-index buckets.
    Chaining,
    /// Open addressing with a step of one slot per attempt.
    LinearProbing,
    /// Open addressing with a hash-derived step per attempt.
    DoubleHashing,
}

impl Strategy {
    /// The load-factor threshold used when a table is built without an
    /// explicit one.
    ///
    /// Open addressing grows once occupancy would exceed 0.7 of capacity;
    /// chaining tolerates an average bucket length of 1.0 before growing.
    pub fn default_load_factor(self) -> f64 {
        match self {
            Strategy::Chaining => 1.0,
            Strategy::LinearProbing | Strategy::DoubleHashing => 0.7,
        }
    }

    pub(crate) fn is_open_addressing(self) -> bool {
        !matches!(self, Strategy::Chaining)
    }

    /// Primary index of `hash` in a table of `capacity` slots or buckets.
    pub(crate) fn home_index(self, hash: u64, capacity: usize) -> usize {
        (hash % capacity as u64) as usize
    }

    /// The ordered candidate indices for `hash`, bounded to `capacity`
    /// attempts so a degenerate hash/capacity pairing terminates instead of
    /// cycling forever.
    pub(crate) fn probe(self, hash: u64, capacity: usize) -> ProbeSeq {
        let step = match self {
            Strategy::Chaining | Strategy::LinearProbing => 1,
            Strategy::DoubleHashing => double_hash_step(hash, capacity),
        };
        ProbeSeq {
            next: self.home_index(hash, capacity),
            step,
            capacity,
            remaining: capacity,
        }
    }
}

/// Secondary hash step for double hashing, in `1..capacity`.
///
/// The step is derived from the primary hash with a bit mixer instead of a
/// second pass over the key, so a resize can replay probe sequences from the
/// stored hash alone. The `1 +` keeps it non-zero; a prime capacity then
/// makes it coprime with the capacity.
pub(crate) fn double_hash_step(hash: u64, capacity: usize) -> usize {
    if capacity <= 1 {
        return 1;
    }
    1 + (spread(hash) % (capacity as u64 - 1)) as usize
}

/// Murmur3's 64-bit finalizer. Deterministic and stateless, with no fixed
/// points in the low bits for the small moduli we reduce into.
fn spread(hash: u64) -> u64 {
    let mut mixed = hash;
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xff51_afd7_ed55_8ccd);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    mixed ^ (mixed >> 33)
}

/// Iterator over the candidate slot indices for one key.
///
/// Yields at most `capacity` indices and then stops.
pub(crate) struct ProbeSeq {
    next: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl Iterator for ProbeSeq {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.next;
        self.next = (self.next + self.step) % self.capacity;
        Some(index)
    }
}
