//! The hash table engine: slot storage, probing, and schedule-driven growth.
//!
//! [`HashTable`] is value-generic and hash-agnostic: callers supply a 64-bit
//! hash and an equality closure per operation, and the table handles slot
//! placement, collision resolution, tombstoning, and resizing. The keyed
//! wrappers in [`hash_map`](crate::hash_map) and [`hash_set`](crate::hash_set)
//! layer a `BuildHasher` on top.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::fmt::Write as _;
use core::mem;

use crate::capacity::CapacitySchedule;
use crate::error::Error;
use crate::strategy::Strategy;

/// A live entry: the caller-supplied hash and the stored value.
///
/// The hash is retained so a resize can replay probe sequences without
/// recomputing hashes, which keeps rehashing reproducible.
#[derive(Debug, Clone)]
struct Stored<V> {
    hash: u64,
    value: V,
}

/// One open-addressing slot.
///
/// `Tombstone` marks a slot that once held an entry since removed. Probing
/// scans through tombstones and stops only at `Empty`; collapsing a tombstone
/// to `Empty` would cut probe chains and lose reachable keys.
#[derive(Debug, Clone)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(Stored<V>),
}

/// The underlying storage, shaped by the strategy at construction.
#[derive(Debug, Clone)]
enum Store<V> {
    /// One optional entry per slot; linear probing and double hashing.
    Open(Vec<Slot<V>>),
    /// One append-ordered bucket per primary index; separate chaining.
    Chained(Vec<Vec<Stored<V>>>),
}

impl<V> Store<V> {
    fn with_capacity(strategy: Strategy, capacity: usize) -> Self {
        if strategy.is_open_addressing() {
            Store::Open((0..capacity).map(|_| Slot::Empty).collect())
        } else {
            Store::Chained((0..capacity).map(|_| Vec::new()).collect())
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Store::Open(slots) => slots.len(),
            Store::Chained(buckets) => buckets.len(),
        }
    }
}

/// Where `locate` found an entry.
#[derive(Debug, Clone, Copy)]
enum Location {
    Slot(usize),
    Bucket { bucket: usize, pos: usize },
}

/// Outcome of probing for a key.
enum Located {
    Found(Location),
    /// Key absent. For open addressing, `free` is the slot an insert should
    /// use: the first tombstone on the probe path if any, else the first
    /// empty slot. `None` means the probe exhausted `capacity` attempts
    /// without finding either.
    Vacant { free: Option<usize> },
}

/// A hash table with a fixed collision-resolution strategy and an explicit
/// capacity schedule.
///
/// The table is single-threaded and synchronous: every operation, including
/// a resize, completes within the call that triggered it. Growth consumes
/// the next value from the table's [`CapacitySchedule`]; when the schedule
/// is exhausted the triggering insert fails with
/// [`Error::CapacityExhausted`] and the table is left untouched.
///
/// # Examples
///
/// ```rust
/// use tri_hash::CapacitySchedule;
/// use tri_hash::HashTable;
/// use tri_hash::Strategy;
/// use tri_hash::hash_table::Entry;
///
/// let mut table: HashTable<u64> = HashTable::new(
///     Strategy::DoubleHashing,
///     CapacitySchedule::new([7, 13]),
/// )?;
///
/// match table.entry(42, |v| *v == 42) {
///     Entry::Vacant(entry) => {
///         entry.insert(42)?;
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
/// assert_eq!(table.find(42, |v| *v == 42), Some(&42));
/// assert_eq!(table.len(), 1);
/// # Ok::<(), tri_hash::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HashTable<V> {
    store: Store<V>,
    schedule: CapacitySchedule,
    strategy: Strategy,
    load_factor: f64,
    len: usize,
    tombstones: usize,
}

impl<V> HashTable<V> {
    /// Creates a table using the strategy's default load factor.
    ///
    /// The first value of `schedule` is consumed as the initial capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the schedule is empty.
    pub fn new(strategy: Strategy, schedule: CapacitySchedule) -> Result<Self, Error> {
        Self::with_load_factor(strategy, schedule, strategy.default_load_factor())
    }

    /// Creates a table with an explicit load-factor threshold.
    ///
    /// For open addressing the threshold bounds occupancy (live entries plus
    /// tombstones) as a fraction of capacity; for chaining it bounds the
    /// average bucket length. A threshold of `1.0` on an open-addressing
    /// table defers growth until the table is physically full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the schedule is empty.
    pub fn with_load_factor(
        strategy: Strategy,
        mut schedule: CapacitySchedule,
        load_factor: f64,
    ) -> Result<Self, Error> {
        let capacity = schedule.next_capacity()?;
        Ok(Self {
            store: Store::with_capacity(strategy, capacity),
            schedule,
            strategy,
            load_factor,
            len: 0,
            tombstones: 0,
        })
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity: slot count for open addressing, bucket
    /// count for chaining.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Returns the collision-resolution strategy fixed at construction.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the load-factor threshold that triggers growth.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the remaining capacity schedule.
    pub fn schedule(&self) -> &CapacitySchedule {
        &self.schedule
    }

    /// Replaces the remaining capacity schedule.
    ///
    /// The current capacity is unaffected; only future growth consumes the
    /// new list.
    ///
    /// # Panics
    ///
    /// Panics if any capacity is zero.
    pub fn configure_schedule(&mut self, capacities: impl IntoIterator<Item = usize>) {
        self.schedule.configure(capacities);
    }

    /// Looks up the slot for `hash`, returning a view that is either
    /// occupied by a matching entry or vacant.
    ///
    /// `eq` is called on stored values whose hash matches, to confirm key
    /// identity. Inserting through the vacant view may grow the table and is
    /// therefore fallible.
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.locate(hash, &eq) {
            Located::Found(location) => Entry::Occupied(OccupiedEntry {
                table: self,
                location,
            }),
            Located::Vacant { free } => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                free,
            }),
        }
    }

    /// Returns a reference to the entry matching `hash` and `eq`, if any.
    ///
    /// The probe scans through tombstones and gives up only at an empty slot
    /// or after `capacity` attempts, so entries placed past deleted slots
    /// are still found.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        match self.locate(hash, eq) {
            Located::Found(location) => Some(self.value_at(location)),
            Located::Vacant { .. } => None,
        }
    }

    /// Returns a mutable reference to the entry matching `hash` and `eq`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.locate(hash, eq) {
            Located::Found(location) => Some(self.value_at_mut(location)),
            Located::Vacant { .. } => None,
        }
    }

    /// Removes and returns the entry matching `hash` and `eq`, if any.
    ///
    /// Open addressing leaves a tombstone in the slot; chaining removes the
    /// entry from its bucket, preserving the order of the rest.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        match self.locate(hash, eq) {
            Located::Found(location) => Some(self.take_at(location)),
            Located::Vacant { .. } => None,
        }
    }

    /// Returns an iterator over the live entries.
    ///
    /// Entries are yielded in slot (or bucket) index order, which is stable
    /// for a given table state. Mutating the table during iteration is
    /// prevented by the borrow.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: match &self.store {
                Store::Open(slots) => IterInner::Open(slots.iter()),
                Store::Chained(buckets) => IterInner::Chained {
                    outer: buckets.iter(),
                    inner: Default::default(),
                },
            },
        }
    }

    /// Removes and yields every live entry, leaving the table empty.
    ///
    /// The table is emptied immediately; dropping the iterator early drops
    /// the unyielded entries. Capacity and the remaining schedule are kept.
    pub fn drain(&mut self) -> Drain<V> {
        let empty = Store::with_capacity(self.strategy, self.capacity());
        let store = mem::replace(&mut self.store, empty);
        self.len = 0;
        self.tombstones = 0;
        Drain {
            inner: match store {
                Store::Open(slots) => DrainInner::Open(slots.into_iter()),
                Store::Chained(buckets) => DrainInner::Chained {
                    outer: buckets.into_iter(),
                    inner: Vec::new().into_iter(),
                },
            },
        }
    }

    /// Removes all entries and tombstones, keeping capacity and schedule.
    pub fn clear(&mut self) {
        match &mut self.store {
            Store::Open(slots) => {
                for slot in slots {
                    *slot = Slot::Empty;
                }
            }
            Store::Chained(buckets) => {
                for bucket in buckets {
                    bucket.clear();
                }
            }
        }
        self.len = 0;
        self.tombstones = 0;
    }

    /// Renders a human-readable listing of all live entries.
    ///
    /// One line per occupied slot (`index: value`) or per non-empty bucket
    /// (`index: value value ...`), in index order, the same order as
    /// [`iter`](HashTable::iter), so the output is stable for a given table
    /// state.
    pub fn dump(&self) -> String
    where
        V: Debug,
    {
        let mut out = String::new();
        match &self.store {
            Store::Open(slots) => {
                for (index, slot) in slots.iter().enumerate() {
                    if let Slot::Occupied(stored) = slot {
                        let _ = writeln!(out, "{index}: {:?}", stored.value);
                    }
                }
            }
            Store::Chained(buckets) => {
                for (index, bucket) in buckets.iter().enumerate() {
                    if bucket.is_empty() {
                        continue;
                    }
                    let _ = write!(out, "{index}:");
                    for stored in bucket {
                        let _ = write!(out, " {:?}", stored.value);
                    }
                    let _ = writeln!(out);
                }
            }
        }
        out
    }

    /// Probes for `hash`, classifying the outcome for insert, find, and
    /// remove alike. This is the single probing implementation; everything
    /// else routes through it.
    fn locate(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Located {
        match &self.store {
            Store::Open(slots) => {
                let mut free = None;
                for index in self.strategy.probe(hash, slots.len()) {
                    match &slots[index] {
                        Slot::Empty => {
                            return Located::Vacant {
                                free: Some(free.unwrap_or(index)),
                            };
                        }
                        Slot::Tombstone => {
                            if free.is_none() {
                                free = Some(index);
                            }
                        }
                        Slot::Occupied(stored) => {
                            if stored.hash == hash && eq(&stored.value) {
                                return Located::Found(Location::Slot(index));
                            }
                        }
                    }
                }
                // Full probe cycle without an empty slot; a tombstone along
                // the path is still usable for insertion.
                Located::Vacant { free }
            }
            Store::Chained(buckets) => {
                let bucket = self.strategy.home_index(hash, buckets.len());
                let pos = buckets[bucket]
                    .iter()
                    .position(|stored| stored.hash == hash && eq(&stored.value));
                match pos {
                    Some(pos) => Located::Found(Location::Bucket { bucket, pos }),
                    None => Located::Vacant { free: None },
                }
            }
        }
    }

    /// First reusable slot for `hash`, ignoring entry identity. Only valid
    /// when the key is known absent, i.e. right after a grow.
    fn probe_free(&self, hash: u64) -> Option<usize> {
        match &self.store {
            Store::Open(slots) => self
                .strategy
                .probe(hash, slots.len())
                .find(|&index| matches!(slots[index], Slot::Empty | Slot::Tombstone)),
            Store::Chained(_) => None,
        }
    }

    fn value_at(&self, location: Location) -> &V {
        match (&self.store, location) {
            (Store::Open(slots), Location::Slot(index)) => match &slots[index] {
                Slot::Occupied(stored) => &stored.value,
                _ => unreachable!("located slot is occupied"),
            },
            (Store::Chained(buckets), Location::Bucket { bucket, pos }) => {
                &buckets[bucket][pos].value
            }
            _ => unreachable!("location matches the store kind"),
        }
    }

    fn value_at_mut(&mut self, location: Location) -> &mut V {
        match (&mut self.store, location) {
            (Store::Open(slots), Location::Slot(index)) => match &mut slots[index] {
                Slot::Occupied(stored) => &mut stored.value,
                _ => unreachable!("located slot is occupied"),
            },
            (Store::Chained(buckets), Location::Bucket { bucket, pos }) => {
                &mut buckets[bucket][pos].value
            }
            _ => unreachable!("location matches the store kind"),
        }
    }

    fn take_at(&mut self, location: Location) -> V {
        match (&mut self.store, location) {
            (Store::Open(slots), Location::Slot(index)) => {
                let slot = mem::replace(&mut slots[index], Slot::Tombstone);
                self.len -= 1;
                self.tombstones += 1;
                match slot {
                    Slot::Occupied(stored) => stored.value,
                    _ => unreachable!("located slot is occupied"),
                }
            }
            (Store::Chained(buckets), Location::Bucket { bucket, pos }) => {
                self.len -= 1;
                buckets[bucket].remove(pos).value
            }
            _ => unreachable!("location matches the store kind"),
        }
    }

    /// Whether placing one more entry would push the table past its
    /// load-factor threshold. Tombstones count toward occupancy so a table
    /// clogged with them still resizes and reclaims the space.
    fn should_grow(&self) -> bool {
        let occupied = self.len + self.tombstones;
        (occupied + 1) as f64 / self.capacity() as f64 > self.load_factor
    }

    /// Grows into the next scheduled capacity, rehashing every live entry
    /// and dropping all tombstones.
    ///
    /// Destinations are planned from the stored hashes before anything
    /// moves, so on error the table is exactly as it was. The schedule value
    /// is consumed either way; growth is attempted once per triggering
    /// insert.
    fn grow(&mut self) -> Result<(), Error> {
        let new_capacity = self.schedule.next_capacity()?;
        match &mut self.store {
            Store::Open(slots) => {
                let targets = plan_open(slots, self.strategy, new_capacity)?;
                let old = mem::take(slots);
                let mut new_slots: Vec<Slot<V>> = (0..new_capacity).map(|_| Slot::Empty).collect();
                let occupied = old.into_iter().filter_map(|slot| match slot {
                    Slot::Occupied(stored) => Some(stored),
                    _ => None,
                });
                for (stored, index) in occupied.zip(targets) {
                    new_slots[index] = Slot::Occupied(stored);
                }
                *slots = new_slots;
            }
            Store::Chained(buckets) => {
                let old = mem::take(buckets);
                let mut new_buckets: Vec<Vec<Stored<V>>> =
                    (0..new_capacity).map(|_| Vec::new()).collect();
                for stored in old.into_iter().flatten() {
                    let bucket = self.strategy.home_index(stored.hash, new_capacity);
                    new_buckets[bucket].push(stored);
                }
                *buckets = new_buckets;
            }
        }
        self.tombstones = 0;
        Ok(())
    }

    /// Places a new entry, assuming the key is absent.
    fn place(&mut self, hash: u64, free: Option<usize>, value: V) -> Result<&mut V, Error> {
        match &mut self.store {
            Store::Open(slots) => {
                let index = free.ok_or(Error::ProbeCycle {
                    capacity: slots.len(),
                })?;
                if matches!(slots[index], Slot::Tombstone) {
                    self.tombstones -= 1;
                }
                slots[index] = Slot::Occupied(Stored { hash, value });
                self.len += 1;
                match &mut slots[index] {
                    Slot::Occupied(stored) => Ok(&mut stored.value),
                    _ => unreachable!("slot was just filled"),
                }
            }
            Store::Chained(buckets) => {
                let bucket = self.strategy.home_index(hash, buckets.len());
                buckets[bucket].push(Stored { hash, value });
                self.len += 1;
                let pos = buckets[bucket].len() - 1;
                Ok(&mut buckets[bucket][pos].value)
            }
        }
    }
}

/// Plans the destination slot of every occupied entry for a new capacity,
/// in slot order, without moving anything.
///
/// Replays each entry's probe sequence against an occupancy mask, which
/// matches what sequential reinsertion would do.
fn plan_open<V>(
    slots: &[Slot<V>],
    strategy: Strategy,
    new_capacity: usize,
) -> Result<Vec<usize>, Error> {
    let mut taken = alloc::vec![false; new_capacity];
    let mut targets = Vec::new();
    for slot in slots {
        if let Slot::Occupied(stored) = slot {
            let index = strategy
                .probe(stored.hash, new_capacity)
                .find(|&index| !taken[index])
                .ok_or(Error::ProbeCycle {
                    capacity: new_capacity,
                })?;
            taken[index] = true;
            targets.push(index);
        }
    }
    Ok(targets)
}

/// A view into a single slot of a [`HashTable`], either occupied or vacant.
///
/// Constructed by [`HashTable::entry`].
pub enum Entry<'a, V> {
    /// The slot holds a matching entry.
    Occupied(OccupiedEntry<'a, V>),
    /// No matching entry exists.
    Vacant(VacantEntry<'a, V>),
}

/// A view into an occupied slot.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    location: Location,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the stored value.
    pub fn get(&self) -> &V {
        self.table.value_at(self.location)
    }

    /// Gets a mutable reference to the stored value.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.value_at_mut(self.location)
    }

    /// Converts the view into a mutable reference tied to the table.
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry { table, location } = self;
        table.value_at_mut(location)
    }

    /// Removes the entry, tombstoning its slot under open addressing.
    pub fn remove(self) -> V {
        let OccupiedEntry { table, location } = self;
        table.take_at(location)
    }
}

/// A view into a vacant slot.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    free: Option<usize>,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value`, growing the table first if the insert would cross
    /// the load-factor threshold or no reusable slot was found.
    ///
    /// Reuses the first tombstone on the probe path when one exists.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExhausted`] if growth is needed but the schedule is
    /// empty; the insert is rejected and the table left untouched.
    /// [`Error::ProbeCycle`] if the probe sequence cannot reach a free slot
    /// in a table that is not full, which indicates a non-prime capacity
    /// paired with double hashing.
    pub fn insert(self, value: V) -> Result<&'a mut V, Error> {
        let VacantEntry {
            table,
            hash,
            mut free,
        } = self;
        let open = table.strategy.is_open_addressing();
        if open && free.is_none() && table.len + table.tombstones < table.capacity() {
            return Err(Error::ProbeCycle {
                capacity: table.capacity(),
            });
        }
        if table.should_grow() || (open && free.is_none()) {
            table.grow()?;
            free = table.probe_free(hash);
        }
        table.place(hash, free, value)
    }
}

/// An iterator over the live entries of a [`HashTable`], in index order.
pub struct Iter<'a, V> {
    inner: IterInner<'a, V>,
}

enum IterInner<'a, V> {
    Open(core::slice::Iter<'a, Slot<V>>),
    Chained {
        outer: core::slice::Iter<'a, Vec<Stored<V>>>,
        inner: core::slice::Iter<'a, Stored<V>>,
    },
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Open(slots) => slots.find_map(|slot| match slot {
                Slot::Occupied(stored) => Some(&stored.value),
                _ => None,
            }),
            IterInner::Chained { outer, inner } => loop {
                if let Some(stored) = inner.next() {
                    return Some(&stored.value);
                }
                *inner = outer.next()?.iter();
            },
        }
    }
}

/// An owning iterator over the entries removed by [`HashTable::drain`].
pub struct Drain<V> {
    inner: DrainInner<V>,
}

enum DrainInner<V> {
    Open(alloc::vec::IntoIter<Slot<V>>),
    Chained {
        outer: alloc::vec::IntoIter<Vec<Stored<V>>>,
        inner: alloc::vec::IntoIter<Stored<V>>,
    },
}

impl<V> Iterator for Drain<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            DrainInner::Open(slots) => slots.find_map(|slot| match slot {
                Slot::Occupied(stored) => Some(stored.value),
                _ => None,
            }),
            DrainInner::Chained { outer, inner } => loop {
                if let Some(stored) = inner.next() {
                    return Some(stored.value);
                }
                *inner = outer.next()?.into_iter();
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::strategy::double_hash_step;

    const STRATEGIES: [Strategy; 3] = [
        Strategy::Chaining,
        Strategy::LinearProbing,
        Strategy::DoubleHashing,
    ];

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Item {
        key: u64,
        value: i32,
    }

    fn insert(table: &mut HashTable<Item>, hash: u64, key: u64, value: i32) -> Result<(), Error> {
        match table.entry(hash, |item| item.key == key) {
            Entry::Vacant(entry) => {
                entry.insert(Item { key, value })?;
                Ok(())
            }
            Entry::Occupied(mut entry) => {
                entry.get_mut().value = value;
                Ok(())
            }
        }
    }

    #[test]
    fn insert_find_replace_all_strategies() {
        for strategy in STRATEGIES {
            let mut table: HashTable<Item> =
                HashTable::new(strategy, CapacitySchedule::new([7, 13, 29])).unwrap();

            for key in 0..6u64 {
                insert(&mut table, key * 31, key, key as i32).unwrap();
            }
            assert_eq!(table.len(), 6, "{strategy:?}");

            for key in 0..6u64 {
                let found = table.find(key * 31, |item| item.key == key);
                assert_eq!(
                    found.map(|item| item.value),
                    Some(key as i32),
                    "{strategy:?}"
                );
            }
            assert!(table.find(999, |item| item.key == 999).is_none());

            // Re-insert of an existing key replaces in place.
            insert(&mut table, 2 * 31, 2, -5).unwrap();
            assert_eq!(table.len(), 6, "{strategy:?}");
            let found = table.find(2 * 31, |item| item.key == 2).unwrap();
            assert_eq!(found.value, -5);
        }
    }

    #[test]
    fn remove_is_idempotent() {
        for strategy in STRATEGIES {
            let mut table: HashTable<Item> =
                HashTable::new(strategy, CapacitySchedule::new([13])).unwrap();
            for key in 0..4u64 {
                insert(&mut table, key, key, 0).unwrap();
            }

            assert!(table.remove(2, |item| item.key == 2).is_some());
            assert_eq!(table.len(), 3);
            assert!(table.remove(2, |item| item.key == 2).is_none());
            assert_eq!(table.len(), 3, "{strategy:?}");
            assert!(table.find(2, |item| item.key == 2).is_none());
        }
    }

    #[test]
    fn find_scans_through_tombstones() {
        // Hashes 0, 7, 14 all have home slot 0 in a 7-slot linear table, so
        // they occupy slots 0, 1, 2 in insertion order.
        let mut table: HashTable<Item> =
            HashTable::with_load_factor(Strategy::LinearProbing, CapacitySchedule::new([7]), 1.0)
                .unwrap();
        insert(&mut table, 0, 100, 0).unwrap();
        insert(&mut table, 7, 101, 1).unwrap();
        insert(&mut table, 14, 102, 2).unwrap();

        assert!(table.remove(7, |item| item.key == 101).is_some());
        assert_eq!(table.tombstones, 1);

        // The entry past the tombstone must still be reachable.
        let found = table.find(14, |item| item.key == 102).unwrap();
        assert_eq!(found.value, 2);
    }

    #[test]
    fn insert_reclaims_tombstones() {
        let mut table: HashTable<Item> =
            HashTable::with_load_factor(Strategy::LinearProbing, CapacitySchedule::new([7]), 1.0)
                .unwrap();
        insert(&mut table, 0, 100, 0).unwrap();
        insert(&mut table, 7, 101, 1).unwrap();
        insert(&mut table, 14, 102, 2).unwrap();
        table.remove(7, |item| item.key == 101).unwrap();

        // Hash 21 probes 0 (occupied), 1 (tombstone), 2 (occupied), ...; the
        // tombstone at slot 1 is reused.
        insert(&mut table, 21, 103, 3).unwrap();
        assert_eq!(table.tombstones, 0);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.find(21, |item| item.key == 103).map(|item| item.value),
            Some(3)
        );
        assert_eq!(
            table.find(14, |item| item.key == 102).map(|item| item.value),
            Some(2)
        );
    }

    #[test]
    fn tombstones_count_toward_growth() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::LinearProbing, CapacitySchedule::new([7, 13])).unwrap();
        for key in 0..4u64 {
            insert(&mut table, key, key, key as i32).unwrap();
        }
        table.remove(1, |item| item.key == 1).unwrap();
        table.remove(2, |item| item.key == 2).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.tombstones, 2);

        // Occupancy is 2 live + 2 tombstones; one more entry crosses
        // 0.7 * 7 and forces a rehash that drops the tombstones.
        insert(&mut table, 4, 4, 4).unwrap();
        assert_eq!(table.capacity(), 13);
        assert_eq!(table.tombstones, 0);
        assert_eq!(table.len(), 3);
        for key in [0u64, 3, 4] {
            assert!(table.find(key, |item| item.key == key).is_some());
        }
        assert!(table.find(1, |item| item.key == 1).is_none());
    }

    #[test]
    fn full_cycle_fills_every_slot() {
        for strategy in [Strategy::LinearProbing, Strategy::DoubleHashing] {
            let mut table: HashTable<Item> =
                HashTable::with_load_factor(strategy, CapacitySchedule::new([7]), 1.0).unwrap();

            for key in 0..7u64 {
                insert(&mut table, key.wrapping_mul(0x9E37_79B9), key, key as i32)
                    .unwrap_or_else(|err| panic!("{strategy:?} insert {key}: {err}"));
            }
            assert_eq!(table.len(), 7);
            assert_eq!(table.iter().count(), 7);
            for key in 0..7u64 {
                let hash = key.wrapping_mul(0x9E37_79B9);
                assert_eq!(
                    table.find(hash, |item| item.key == key).map(|i| i.value),
                    Some(key as i32),
                    "{strategy:?}"
                );
            }

            // The eighth insert needs growth and the schedule is spent.
            let err = insert(&mut table, 7u64.wrapping_mul(0x9E37_79B9), 7, 7).unwrap_err();
            assert_eq!(err, Error::CapacityExhausted);
            assert_eq!(table.len(), 7);
        }
    }

    #[test]
    fn resize_consumes_schedule_and_keeps_entries() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::DoubleHashing, CapacitySchedule::new([7, 13])).unwrap();
        assert_eq!(table.capacity(), 7);

        // The fifth insert pushes occupancy to 5/7 > 0.7 and grows to 13.
        for key in 0..6u64 {
            insert(&mut table, key * 101, key, key as i32).unwrap();
        }
        assert_eq!(table.capacity(), 13);
        assert_eq!(table.len(), 6);
        assert!(table.schedule().is_exhausted());
        for key in 0..6u64 {
            assert_eq!(
                table
                    .find(key * 101, |item| item.key == key)
                    .map(|i| i.value),
                Some(key as i32)
            );
        }
    }

    #[test]
    fn exhaustion_rejects_insert_and_preserves_table() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::DoubleHashing, CapacitySchedule::new([7])).unwrap();
        for key in 0..4u64 {
            insert(&mut table, key * 17, key, key as i32).unwrap();
        }

        let err = insert(&mut table, 4 * 17, 4, 4).unwrap_err();
        assert_eq!(err, Error::CapacityExhausted);
        assert_eq!(table.len(), 4);
        assert_eq!(table.capacity(), 7);
        for key in 0..4u64 {
            assert_eq!(
                table.find(key * 17, |item| item.key == key).map(|i| i.value),
                Some(key as i32)
            );
        }
        assert!(table.find(4 * 17, |item| item.key == 4).is_none());
    }

    #[test]
    fn probe_cycle_is_reported_not_looped() {
        // Capacity 8 is not prime; hashes whose derived step is 2 only ever
        // visit slots {0, 2, 4, 6}. Fill that cycle, then insert one more
        // such key into a half-empty table.
        let mut hashes = Vec::new();
        for hash in (0..1u64 << 20).step_by(8) {
            if double_hash_step(hash, 8) == 2 {
                hashes.push(hash);
                if hashes.len() == 5 {
                    break;
                }
            }
        }
        assert_eq!(hashes.len(), 5);

        let mut table: HashTable<Item> =
            HashTable::with_load_factor(Strategy::DoubleHashing, CapacitySchedule::new([8]), 1.0)
                .unwrap();
        for (value, &hash) in hashes[..4].iter().enumerate() {
            insert(&mut table, hash, hash, value as i32).unwrap();
        }
        assert_eq!(table.len(), 4);

        let err = insert(&mut table, hashes[4], hashes[4], 4).unwrap_err();
        assert_eq!(err, Error::ProbeCycle { capacity: 8 });
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn chaining_preserves_bucket_order() {
        let mut table: HashTable<Item> =
            HashTable::with_load_factor(Strategy::Chaining, CapacitySchedule::new([3]), 10.0)
                .unwrap();
        // All of these land in bucket 0.
        for (value, hash) in [0u64, 3, 6, 9].into_iter().enumerate() {
            insert(&mut table, hash, hash, value as i32).unwrap();
        }

        let values: Vec<i32> = table.iter().map(|item| item.value).collect();
        assert_eq!(values, vec![0, 1, 2, 3]);

        // Removing from the middle keeps the rest in order.
        table.remove(3, |item| item.key == 3).unwrap();
        let values: Vec<i32> = table.iter().map(|item| item.value).collect();
        assert_eq!(values, vec![0, 2, 3]);
    }

    #[test]
    fn chaining_grows_on_average_bucket_length() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::Chaining, CapacitySchedule::new([3, 7])).unwrap();
        for key in 0..3u64 {
            insert(&mut table, key, key, 0).unwrap();
        }
        assert_eq!(table.capacity(), 3);

        // A fourth entry would push the average chain length past 1.0.
        insert(&mut table, 3, 3, 0).unwrap();
        assert_eq!(table.capacity(), 7);
        assert_eq!(table.len(), 4);
        for key in 0..4u64 {
            assert!(table.find(key, |item| item.key == key).is_some());
        }
    }

    #[test]
    fn chaining_exhaustion_preserves_table() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::Chaining, CapacitySchedule::new([2])).unwrap();
        insert(&mut table, 0, 0, 0).unwrap();
        insert(&mut table, 1, 1, 1).unwrap();

        let err = insert(&mut table, 2, 2, 2).unwrap_err();
        assert_eq!(err, Error::CapacityExhausted);
        assert_eq!(table.len(), 2);
        assert!(table.find(0, |item| item.key == 0).is_some());
        assert!(table.find(1, |item| item.key == 1).is_some());
    }

    #[test]
    fn iteration_is_stable_for_unchanged_table() {
        for strategy in STRATEGIES {
            let mut table: HashTable<Item> =
                HashTable::new(strategy, CapacitySchedule::new([13])).unwrap();
            for key in 0..8u64 {
                insert(&mut table, key * 5, key, key as i32).unwrap();
            }

            let first: Vec<u64> = table.iter().map(|item| item.key).collect();
            let second: Vec<u64> = table.iter().map(|item| item.key).collect();
            assert_eq!(first, second, "{strategy:?}");
            assert_eq!(first.len(), 8);
        }
    }

    #[test]
    fn drain_empties_but_keeps_capacity() {
        for strategy in STRATEGIES {
            let mut table: HashTable<Item> =
                HashTable::new(strategy, CapacitySchedule::new([13])).unwrap();
            for key in 0..5u64 {
                insert(&mut table, key, key, key as i32).unwrap();
            }

            let mut drained: Vec<u64> = table.drain().map(|item| item.key).collect();
            drained.sort_unstable();
            assert_eq!(drained, vec![0, 1, 2, 3, 4]);
            assert!(table.is_empty());
            assert_eq!(table.capacity(), 13);

            insert(&mut table, 99, 99, 0).unwrap();
            assert_eq!(table.len(), 1);
        }
    }

    #[test]
    fn clear_keeps_capacity_and_schedule() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::LinearProbing, CapacitySchedule::new([7, 13])).unwrap();
        for key in 0..3u64 {
            insert(&mut table, key, key, 0).unwrap();
        }
        table.remove(0, |item| item.key == 0).unwrap();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.tombstones, 0);
        assert_eq!(table.capacity(), 7);
        assert_eq!(table.schedule().remaining(), 1);
    }

    #[test]
    fn configure_schedule_feeds_future_growth() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::LinearProbing, CapacitySchedule::new([3])).unwrap();
        table.configure_schedule([11]);

        for key in 0..5u64 {
            insert(&mut table, key, key, 0).unwrap();
        }
        assert_eq!(table.capacity(), 11);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn dump_lists_entries_in_slot_order() {
        let mut table: HashTable<Item> =
            HashTable::with_load_factor(Strategy::LinearProbing, CapacitySchedule::new([7]), 1.0)
                .unwrap();
        insert(&mut table, 3, 200, 20).unwrap();
        insert(&mut table, 1, 100, 10).unwrap();

        let dump = table.dump();
        let expected_first = format!("1: {:?}", Item {
            key: 100,
            value: 10,
        });
        let expected_second = format!("3: {:?}", Item {
            key: 200,
            value: 20,
        });
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(
            lines,
            vec![expected_first.as_str(), expected_second.as_str()]
        );
        assert_eq!(table.dump(), dump);
    }

    #[test]
    fn find_mut_modifies_in_place() {
        for strategy in STRATEGIES {
            let mut table: HashTable<Item> =
                HashTable::new(strategy, CapacitySchedule::new([7])).unwrap();
            insert(&mut table, 5, 5, 1).unwrap();

            if let Some(item) = table.find_mut(5, |item| item.key == 5) {
                item.value += 9;
            }
            assert_eq!(
                table.find(5, |item| item.key == 5).map(|i| i.value),
                Some(10)
            );
        }
    }

    #[test]
    fn occupied_entry_remove_tombstones_slot() {
        let mut table: HashTable<Item> =
            HashTable::new(Strategy::DoubleHashing, CapacitySchedule::new([7])).unwrap();
        insert(&mut table, 6, 6, 6).unwrap();

        match table.entry(6, |item| item.key == 6) {
            Entry::Occupied(entry) => {
                let removed = entry.remove();
                assert_eq!(removed.key, 6);
            }
            Entry::Vacant(_) => panic!("entry should be occupied"),
        }
        assert_eq!(table.len(), 0);
        assert_eq!(table.tombstones, 1);
    }
}
