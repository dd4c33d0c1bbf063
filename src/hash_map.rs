//! A key-value map over the strategy-driven [`HashTable`].

use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::mem;

use crate::DefaultHashBuilder;
use crate::capacity::CapacitySchedule;
use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::strategy::Strategy;

/// A hash map whose collision resolution and growth schedule are chosen at
/// construction.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq`, hashing them through a configurable hasher builder `S`. The
/// underlying [`HashTable`] resolves collisions with the [`Strategy`] fixed
/// at construction and grows along the map's [`CapacitySchedule`].
///
/// Inserts are fallible: growth past the end of the schedule fails with
/// [`Error::CapacityExhausted`] and rejects the triggering insert, leaving
/// the map's prior contents intact.
///
/// # Examples
///
/// ```rust
/// use tri_hash::CapacitySchedule;
/// use tri_hash::HashMap;
/// use tri_hash::Strategy;
///
/// let mut map: HashMap<&str, i32> = HashMap::new(Strategy::Chaining, CapacitySchedule::new([7, 13]))?;
/// map.insert("alpha", 1)?;
/// map.insert("beta", 2)?;
/// assert_eq!(map.get(&"alpha"), Some(&1));
/// assert_eq!(map.len(), 2);
/// # Ok::<(), tri_hash::Error>(())
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a map with the given hasher builder.
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

    /// Creates a map with an explicit load-factor threshold and hasher
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

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
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

    /// Removes all entries, keeping capacity and schedule.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Inserts a key-value pair.
    ///
    /// If the key was already present its value is replaced in place and the
    /// old value returned; the map never grows on replacement. A new key may
    /// trigger growth along the capacity schedule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if growth was needed but the
    /// schedule is empty; the insert is rejected and the map unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tri_hash::CapacitySchedule;
    /// use tri_hash::HashMap;
    /// use tri_hash::Strategy;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new(Strategy::LinearProbing, CapacitySchedule::new([7]))?;
    /// assert_eq!(map.insert(37, "a")?, None);
    /// assert_eq!(map.insert(37, "b")?, Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// # Ok::<(), tri_hash::Error>(())
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value))?;
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key, returning its value if it was present.
    ///
    /// Absent keys are not an error; `None` is returned.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes a key, returning the stored key and value if present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Returns an iterator over the key-value pairs.
    ///
    /// Pairs are yielded in the underlying slot/bucket order, which is
    /// stable for a given map state.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Removes and yields all key-value pairs, leaving the map empty.
    pub fn drain(&mut self) -> Drain<K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Renders a human-readable listing of all entries in slot/bucket
    /// order. Intended for diagnostics and reporting.
    pub fn dump(&self) -> alloc::string::String
    where
        K: Debug,
        V: Debug,
    {
        self.table.dump()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a map using the default hasher builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the schedule is empty.
    pub fn new(strategy: Strategy, schedule: CapacitySchedule) -> Result<Self, Error> {
        Self::with_hasher(strategy, schedule, S::default())
    }

    /// Creates a map with an explicit load-factor threshold, using the
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

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Hash + Eq + Debug,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// An owning iterator over the pairs removed by [`HashMap::drain`].
pub struct Drain<K, V> {
    inner: crate::hash_table::Drain<(K, V)>,
}

impl<K, V> Iterator for Drain<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
