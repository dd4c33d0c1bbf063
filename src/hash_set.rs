//! A membership set over the strategy-driven [`HashTable`].

use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::capacity::CapacitySchedule;
use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::strategy::Strategy;

/// A hash set whose collision resolution and growth schedule are chosen at
/// construction.
///
/// `HashSet<T, S>` stores distinct values of `T: Hash + Eq` directly in a
/// [`HashTable`], sharing the map's strategy, capacity-schedule, and error
/// semantics. Inserting a value already in the set is a no-op that cannot
/// trigger growth.
///
/// # Examples
///
/// ```rust
/// use tri_hash::CapacitySchedule;
/// use tri_hash::HashSet;
/// use tri_hash::Strategy;
///
/// let mut words: HashSet<&str> = HashSet::new(Strategy::DoubleHashing, CapacitySchedule::new([7, 13]))?;
/// assert!(words.insert("moby")?);
/// assert!(!words.insert("moby")?);
/// assert!(words.contains(&"moby"));
/// assert_eq!(words.len(), 1);
/// # Ok::<(), tri_hash::Error>(())
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a set with the given hasher builder.
    ///
    /// The first value of `schedule` is consumed as the initial capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the schedule is empty.
    pub fn with_hasher(
        strategy: Strategy,
        schedule: CapacitySchedule,
        hash_builder: S,
    ) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::new(strategy, schedule)?,
            hash_builder,
        })
    }

    /// Creates a set with an explicit load-factor threshold and hasher
    /// builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the schedule is empty.
    pub fn with_load_factor_and_hasher(
        strategy: Strategy,
        schedule: CapacitySchedule,
        load_factor: f64,
        hash_builder: S,
    ) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_load_factor(strategy, schedule, load_factor)?,
            hash_builder,
        })
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current capacity of the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the collision-resolution strategy fixed at construction.
    pub fn strategy(&self) -> Strategy {
        self.table.strategy()
    }

    /// Returns the load-factor threshold that triggers growth.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the remaining capacity schedule.
    pub fn schedule(&self) -> &CapacitySchedule {
        self.table.schedule()
    }

    /// Replaces the remaining capacity schedule.
    ///
    /// # Panics
    ///
    /// Panics if any capacity is zero.
    pub fn configure_schedule(&mut self, capacities: impl IntoIterator<Item = usize>) {
        self.table.configure_schedule(capacities);
    }

    /// Removes all values, keeping capacity and schedule.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was newly inserted, `false` if it was
    /// already present. A duplicate never grows the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if growth was needed but the
    /// schedule is empty; the insert is rejected and the set unchanged.
    pub fn insert(&mut self, value: T) -> Result<bool, Error> {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |stored| stored == &value) {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.insert(value)?;
                Ok(true)
            }
        }
    }

    /// Returns `true` if the set contains the value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |stored| stored == value)
    }

    /// Removes a value, returning `true` if it was present.
    ///
    /// Absent values are not an error; `false` is returned.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |stored| stored == value)
    }

    /// Returns an iterator over the values.
    ///
    /// Values are yielded in the underlying slot/bucket order, which is
    /// stable for a given set state.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields all values, leaving the set empty.
    pub fn drain(&mut self) -> Drain<T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Renders a human-readable listing of all values in slot/bucket order.
    /// Intended for diagnostics and reporting.
    pub fn dump(&self) -> alloc::string::String
    where
        T: Debug,
    {
        self.table.dump()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a set using the default hasher builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the schedule is empty.
    pub fn new(strategy: Strategy, schedule: CapacitySchedule) -> Result<Self, Error> {
        Self::with_hasher(strategy, schedule, S::default())
    }

    /// Creates a set with an explicit load-factor threshold, using the
    /// default hasher builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the schedule is empty.
    pub fn with_load_factor(
        strategy: Strategy,
        schedule: CapacitySchedule,
        load_factor: f64,
    ) -> Result<Self, Error> {
        Self::with_load_factor_and_hasher(strategy, schedule, load_factor, S::default())
    }
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Hash + Eq + Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An owning iterator over the values removed by [`HashSet::drain`].
pub struct Drain<T> {
    inner: crate::hash_table::Drain<T>,
}

impl<T> Iterator for Drain<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
