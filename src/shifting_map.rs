// Copyright 2018 Mohammad Rezaei.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Portions copyright The Rust Project Developers. Licensed under
// the MIT License.

//! # `ShiftingMap`: a bounded map that evicts its oldest pairs.
//! The map keeps keys and values in two `ShiftingStore`s of the same shape.
//! Slot *i* of the key store pairs with slot *i* of the value store, and every
//! operation that moves slots (insertion, removal, compaction, resizing) runs
//! on both stores in the same call, so the two can never drift apart.
//!
//! The views returned by `key_set`, `values` and `entry_set` (and their `_mut`
//! counterparts) borrow the map directly; nothing is copied. Removing through
//! a view removes the whole pair.
//!
//! For positions that need to outlive a borrow there is `ShiftingEntry`, a
//! plain index stamped with the owning map's id and layout version. It follows
//! in-place value updates but resolves to `None` once the layout has changed,
//! and always resolves to `None` against any other map, clones included.

use shifting_store::{self, ShiftingStore};

use std::fmt::{self, Debug};
use std::iter::{Enumerate, FromIterator, FusedIterator, Zip};
use std::mem;
use std::ops::Index;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_MAP_ID: AtomicUsize = AtomicUsize::new(0);

#[inline]
fn next_map_id() -> usize {
    NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed)
}

/// A map holding at most `capacity` pairs, newest first. Putting a new key
/// into a full map evicts the pair that was inserted longest ago; overwriting
/// the value of an existing key does not change its position.
///
/// Keys are compared with [`PartialEq`] by a linear scan.
///
/// # Examples
///
/// ```
/// use shiftingcollections::shifting_map::ShiftingMap;
///
/// let mut map = ShiftingMap::new(3, 0.75);
/// map.put("a", 1);
/// map.put("b", 2);
/// map.put("c", 3);
/// map.put("d", 4);
///
/// assert_eq!(map.get(&"a"), None);
/// assert_eq!(map.get(&"d"), Some(&4));
/// assert_eq!(map.len(), 3);
/// ```
///
/// [`PartialEq`]: ../../std/cmp/trait.PartialEq.html
pub struct ShiftingMap<K, V> {
    keys: ShiftingStore<K>,
    values: ShiftingStore<V>,
    id: usize,
    epoch: u64,
}

/// A detached position in a `ShiftingMap`.
///
/// Obtained from [`ShiftingMap::entry_at`] or [`Entry::handle`], and read back
/// through the map. A handle taken before a new key was put, a pair was
/// removed or evicted, or the map was cleared is stale and reads as `None`.
/// A handle never resolves against a map other than the one it came from.
///
/// ```
/// use shiftingcollections::shifting_map::ShiftingMap;
///
/// let mut map = ShiftingMap::with_capacity(4);
/// map.put("x", 1);
/// let e = map.entry_at(0).unwrap();
///
/// map.put("x", 2);
/// assert_eq!(map.value_of(e), Some(&2));
///
/// map.put("y", 3);
/// assert_eq!(map.key_of(e), None);
/// ```
///
/// [`ShiftingMap::entry_at`]: struct.ShiftingMap.html#method.entry_at
/// [`Entry::handle`]: struct.Entry.html#method.handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShiftingEntry {
    index: usize,
    owner: usize,
    epoch: u64,
}

impl ShiftingEntry {
    /// Position the handle points at, 0 being the newest pair.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<K, V> ShiftingMap<K, V> {
    /// Creates an empty map holding at most `capacity` pairs.
    ///
    /// A `capacity` of 0 is replaced by the default capacity (20), and a
    /// `load_factor` outside `(0.1, 1.0)` by 0.75.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    /// let map: ShiftingMap<u64, i32> = ShiftingMap::new(16, 0.5);
    /// assert_eq!(map.capacity(), 16);
    /// assert_eq!(map.backing_len(), 1);
    /// ```
    pub fn new(capacity: usize, load_factor: f64) -> ShiftingMap<K, V> {
        ShiftingMap {
            keys: ShiftingStore::new(capacity, load_factor),
            values: ShiftingStore::new(capacity, load_factor),
            id: next_map_id(),
            epoch: 0,
        }
    }

    /// Creates an empty map holding at most `capacity` pairs, with the
    /// default load factor.
    #[inline]
    pub fn with_capacity(capacity: usize) -> ShiftingMap<K, V> {
        ShiftingMap::new(capacity, shifting_store::DEFAULT_LOAD_FACTOR)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.keys.load_factor()
    }

    /// Length of the backing slot arrays (both have the same length).
    #[inline]
    pub fn backing_len(&self) -> usize {
        self.keys.backing_len()
    }

    /// Returns the number of pairs in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Removes every pair and shrinks both backing arrays to a single slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut a = ShiftingMap::with_capacity(8);
    /// a.put(1, "one");
    /// a.clear();
    /// assert!(a.is_empty());
    /// assert_eq!(a.backing_len(), 1);
    /// ```
    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.bump();
    }

    /// Removes the pair at position `index`, 0 being the newest.
    pub fn remove_at(&mut self, index: usize) -> Option<(K, V)> {
        if index >= self.len() {
            return None;
        }
        let key = self.keys.bury_at(index);
        let value = self.values.bury_at(index);
        debug_assert_eq!(key.is_some(), value.is_some());
        self.settle();
        match (key, value) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }

    /// Retains only the pairs for which `f` returns `true`. Both stores are
    /// compacted once, after the scan.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut map: ShiftingMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
        where F: FnMut(&K, &mut V) -> bool
    {
        let end = self.len();
        let mut removed = false;
        for i in 0..end {
            let keep = match (self.keys.slot(i), self.values.slot_mut(i)) {
                (Some(k), Some(v)) => f(k, v),
                _ => continue,
            };
            if !keep {
                drop(self.keys.bury_at(i));
                drop(self.values.bury_at(i));
                removed = true;
            }
        }
        if removed {
            self.settle();
        }
    }

    /// Pairs from the newest to the oldest.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut map = ShiftingMap::with_capacity(4);
    /// map.put("a", 1);
    /// map.put("b", 2);
    ///
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, vec![(&"b", &2), (&"a", &1)]);
    /// ```
    pub fn iter(&self) -> Iter<K, V> {
        Iter { inner: self.keys.iter().zip(self.values.iter()) }
    }

    /// Pairs from the newest to the oldest, with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<K, V> {
        IterMut { inner: self.keys.iter().zip(self.values.iter_mut()) }
    }

    /// Keys from the newest to the oldest.
    #[inline]
    pub fn keys(&self) -> Keys<K> {
        self.keys.iter()
    }

    /// A live view of the keys.
    #[inline]
    pub fn key_set(&self) -> KeySet<K, V> {
        KeySet { map: self }
    }

    /// A live view of the values, in the same order as the keys.
    #[inline]
    pub fn values(&self) -> ValueCollection<K, V> {
        ValueCollection { map: self }
    }

    /// A live view of the pairs.
    #[inline]
    pub fn entry_set(&self) -> EntrySet<K, V> {
        EntrySet { map: self }
    }

    /// The key view, with removal routed through the map.
    #[inline]
    pub fn key_set_mut(&mut self) -> KeySetMut<K, V> {
        KeySetMut { map: self }
    }

    /// The value view, with removal routed through the map and mutable
    /// iteration.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut map = ShiftingMap::with_capacity(4);
    /// map.put("a", 1);
    /// map.put("b", 2);
    /// for v in map.values_mut() {
    ///     *v *= 10;
    /// }
    /// assert_eq!(map.get(&"b"), Some(&20));
    /// ```
    #[inline]
    pub fn values_mut(&mut self) -> ValueCollectionMut<K, V> {
        ValueCollectionMut { map: self }
    }

    #[inline]
    pub fn entry_set_mut(&mut self) -> EntrySetMut<K, V> {
        EntrySetMut { map: self }
    }

    /// A handle to the pair currently at position `index`.
    pub fn entry_at(&self, index: usize) -> Option<ShiftingEntry> {
        if index >= self.len() {
            return None;
        }
        Some(self.handle_at(index))
    }

    /// The key behind `entry`, or `None` if the handle is stale.
    pub fn key_of(&self, entry: ShiftingEntry) -> Option<&K> {
        if !self.is_live(entry) {
            return None;
        }
        self.keys.get(entry.index)
    }

    /// The value behind `entry`, or `None` if the handle is stale.
    pub fn value_of(&self, entry: ShiftingEntry) -> Option<&V> {
        if !self.is_live(entry) {
            return None;
        }
        self.values.get(entry.index)
    }

    /// Replaces the value behind `entry`, returning the old one. A stale
    /// handle gets `value` back as the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut map = ShiftingMap::with_capacity(4);
    /// map.put("k", 1);
    /// let e = map.entry_at(0).unwrap();
    /// assert_eq!(map.set_value(e, 2), Ok(1));
    /// map.remove(&"k");
    /// assert_eq!(map.set_value(e, 3), Err(3));
    /// ```
    pub fn set_value(&mut self, entry: ShiftingEntry, value: V) -> Result<V, V> {
        if !self.is_live(entry) {
            return Err(value);
        }
        match self.values.get_mut(entry.index) {
            Some(slot) => Ok(mem::replace(slot, value)),
            None => Err(value),
        }
    }

    #[inline]
    fn handle_at(&self, index: usize) -> ShiftingEntry {
        ShiftingEntry { index, owner: self.id, epoch: self.epoch }
    }

    #[inline]
    fn is_live(&self, entry: ShiftingEntry) -> bool {
        entry.owner == self.id && entry.epoch == self.epoch
    }

    #[inline]
    fn bump(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn settle(&mut self) {
        self.keys.settle();
        self.values.settle();
        self.bump();
        debug_assert_eq!(self.keys.len(), self.values.len());
        debug_assert_eq!(self.keys.backing_len(), self.values.backing_len());
    }
}

impl<K: PartialEq, V> ShiftingMap<K, V> {
    /// Puts a key-value pair into the map.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value returned; the pair keeps its position. Otherwise the pair goes
    /// to the front, evicting the oldest pair if the map is full, and `None`
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut map = ShiftingMap::with_capacity(4);
    /// assert_eq!(map.put("x", 1), None);
    /// assert_eq!(map.put("x", 2), Some(1));
    /// assert_eq!(map.get(&"x"), Some(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(old) = self.keys.index_of(&key).and_then(|i| self.values.get_mut(i)) {
            return Some(mem::replace(old, value));
        }
        let evicted_key = self.keys.push_front(key);
        let evicted_value = self.values.push_front(value);
        debug_assert_eq!(evicted_key.is_some(), evicted_value.is_some());
        debug_assert_eq!(self.keys.len(), self.values.len());
        self.bump();
        None
    }

    /// Puts every pair yielded by `other`, in order. Later pairs overwrite
    /// earlier values of the same key and, once the map is full, evict the
    /// oldest pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut map = ShiftingMap::with_capacity(3);
    /// map.put(1, "one");
    /// map.put_all(vec![(2, "two"), (1, "uno"), (3, "three"), (4, "four")]);
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get(&1), None);
    /// assert_eq!(map.get(&4), Some(&"four"));
    /// ```
    pub fn put_all<I>(&mut self, other: I)
        where I: IntoIterator<Item=(K, V)>
    {
        for (k, v) in other {
            self.put(k, v);
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.keys.index_of(key)?;
        self.values.get(index)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.keys.index_of(key)?;
        self.values.get_mut(index)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let index = self.keys.index_of(key)?;
        match (self.keys.get(index), self.values.get(index)) {
            (Some(k), Some(v)) => Some((k, v)),
            _ => None,
        }
    }

    /// Position of `key`, 0 being the newest pair.
    #[inline]
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.keys.index_of(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_map::ShiftingMap;
    ///
    /// let mut map = ShiftingMap::with_capacity(4);
    /// map.put(7, 123);
    /// assert_eq!(map.remove(&7), Some(123));
    /// assert_eq!(map.remove(&7), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.keys.index_of(key)?;
        self.remove_at(index)
    }
}

impl<K, V: PartialEq> ShiftingMap<K, V> {
    #[inline]
    pub fn contains_value(&self, value: &V) -> bool {
        self.values.contains(value)
    }
}

impl<'a, K: PartialEq, V> Index<&'a K> for ShiftingMap<K, V> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `ShiftingMap`.
    #[inline]
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Debug, V: Debug> Debug for ShiftingMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Debug, V: Debug> ShiftingMap<K, V> {
    pub fn debug(&self) {
        println!("map {} epoch {}", self.id, self.epoch);
        print!("keys: ");
        self.keys.debug();
        print!("values: ");
        self.values.debug();
    }
}

impl<K: PartialEq, V> ShiftingMap<K, V> {
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.keys.debug_validate_invariants();
        self.values.debug_validate_invariants();
        assert_eq!(self.keys.len(), self.values.len());
        assert_eq!(self.keys.backing_len(), self.values.backing_len());
        for (i, k) in self.keys.iter().enumerate() {
            assert_eq!(self.keys.index_of(k), Some(i), "duplicate key at slot {}", i);
        }
    }
}

impl<K: Clone, V: Clone> Clone for ShiftingMap<K, V> {
    /// The clone gets its own id, so handles taken from `self` do not
    /// resolve against it.
    fn clone(&self) -> ShiftingMap<K, V> {
        ShiftingMap {
            keys: self.keys.clone(),
            values: self.values.clone(),
            id: next_map_id(),
            epoch: self.epoch,
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for ShiftingMap<K, V> {
    fn eq(&self, other: &ShiftingMap<K, V>) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter().all(|(key, value)| other.get(key).map_or(false, |v| *value == *v))
    }
}

impl<K: Eq, V: Eq> Eq for ShiftingMap<K, V> {}

impl<K, V> Default for ShiftingMap<K, V> {
    fn default() -> ShiftingMap<K, V> {
        ShiftingMap::new(shifting_store::DEFAULT_CAPACITY, shifting_store::DEFAULT_LOAD_FACTOR)
    }
}

impl<K: PartialEq, V> Extend<(K, V)> for ShiftingMap<K, V> {
    fn extend<T: IntoIterator<Item=(K, V)>>(&mut self, iter: T) {
        self.put_all(iter);
    }
}

impl<'a, K, V> Extend<(&'a K, &'a V)> for ShiftingMap<K, V>
    where K: PartialEq + Copy,
          V: Copy
{
    fn extend<T: IntoIterator<Item=(&'a K, &'a V)>>(&mut self, iter: T) {
        self.put_all(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for ShiftingMap<K, V> {
    /// Collects into a map just large enough to keep every pair.
    fn from_iter<T: IntoIterator<Item=(K, V)>>(iter: T) -> ShiftingMap<K, V> {
        let pairs: Vec<(K, V)> = iter.into_iter().collect();
        let mut map = ShiftingMap::with_capacity(pairs.len());
        map.put_all(pairs);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a ShiftingMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut ShiftingMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for ShiftingMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { inner: self.keys.into_iter().zip(self.values.into_iter()) }
    }
}

pub struct Iter<'a, K: 'a, V: 'a> {
    inner: Zip<shifting_store::Iter<'a, K>, shifting_store::Iter<'a, V>>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter { inner: self.inner.clone() }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct IterMut<'a, K: 'a, V: 'a> {
    inner: Zip<shifting_store::Iter<'a, K>, shifting_store::IterMut<'a, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.inner.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

pub struct IntoIter<K, V> {
    inner: Zip<shifting_store::IntoIter<K>, shifting_store::IntoIter<V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

pub type Keys<'a, K> = shifting_store::Iter<'a, K>;
pub type Values<'a, V> = shifting_store::Iter<'a, V>;
pub type ValuesMut<'a, V> = shifting_store::IterMut<'a, V>;

/// A pair seen through an [`EntrySet`].
///
/// [`EntrySet`]: struct.EntrySet.html
pub struct Entry<'a, K: 'a, V: 'a> {
    key: &'a K,
    value: &'a V,
    handle: ShiftingEntry,
}

impl<'a, K, V> Entry<'a, K, V> {
    #[inline]
    pub fn key(&self) -> &'a K {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &'a V {
        self.value
    }

    /// A detached handle to this pair's position, usable after the borrow
    /// ends.
    #[inline]
    pub fn handle(&self) -> ShiftingEntry {
        self.handle
    }
}

impl<'a, K: Debug, V: Debug> Debug for Entry<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}={:?}", self.key, self.value)
    }
}

pub struct Entries<'a, K: 'a, V: 'a> {
    inner: Enumerate<Iter<'a, K, V>>,
    map: &'a ShiftingMap<K, V>,
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = Entry<'a, K, V>;

    fn next(&mut self) -> Option<Entry<'a, K, V>> {
        let (index, (key, value)) = self.inner.next()?;
        Some(Entry { key, value, handle: self.map.handle_at(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for Entries<'a, K, V> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a, K, V> FusedIterator for Entries<'a, K, V> {}

/// Live view of a map's keys.
pub struct KeySet<'a, K: 'a, V: 'a> {
    map: &'a ShiftingMap<K, V>,
}

impl<'a, K, V> Clone for KeySet<'a, K, V> {
    fn clone(&self) -> Self {
        KeySet { map: self.map }
    }
}

impl<'a, K, V> Copy for KeySet<'a, K, V> {}

impl<'a, K, V> KeySet<'a, K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Keys<'a, K> {
        self.map.keys.iter()
    }
}

impl<'a, K: PartialEq, V> KeySet<'a, K, V> {
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
}

impl<'a, K, V> IntoIterator for KeySet<'a, K, V> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K>;

    fn into_iter(self) -> Keys<'a, K> {
        self.iter()
    }
}

impl<'a, K: Debug, V> Debug for KeySet<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Live view of a map's values.
pub struct ValueCollection<'a, K: 'a, V: 'a> {
    map: &'a ShiftingMap<K, V>,
}

impl<'a, K, V> Clone for ValueCollection<'a, K, V> {
    fn clone(&self) -> Self {
        ValueCollection { map: self.map }
    }
}

impl<'a, K, V> Copy for ValueCollection<'a, K, V> {}

impl<'a, K, V> ValueCollection<'a, K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Values<'a, V> {
        self.map.values.iter()
    }
}

impl<'a, K, V: PartialEq> ValueCollection<'a, K, V> {
    #[inline]
    pub fn contains(&self, value: &V) -> bool {
        self.map.contains_value(value)
    }
}

impl<'a, K, V> IntoIterator for ValueCollection<'a, K, V> {
    type Item = &'a V;
    type IntoIter = Values<'a, V>;

    fn into_iter(self) -> Values<'a, V> {
        self.iter()
    }
}

impl<'a, K, V: Debug> Debug for ValueCollection<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Live view of a map's pairs.
pub struct EntrySet<'a, K: 'a, V: 'a> {
    map: &'a ShiftingMap<K, V>,
}

impl<'a, K, V> Clone for EntrySet<'a, K, V> {
    fn clone(&self) -> Self {
        EntrySet { map: self.map }
    }
}

impl<'a, K, V> Copy for EntrySet<'a, K, V> {}

impl<'a, K, V> EntrySet<'a, K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Entries<'a, K, V> {
        Entries { inner: self.map.iter().enumerate(), map: self.map }
    }
}

impl<'a, K: PartialEq, V: PartialEq> EntrySet<'a, K, V> {
    /// `true` if `key` is present and mapped to `value`.
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.map.get(key).map_or(false, |v| *v == *value)
    }
}

impl<'a, K, V> IntoIterator for EntrySet<'a, K, V> {
    type Item = Entry<'a, K, V>;
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Entries<'a, K, V> {
        self.iter()
    }
}

/// Key view with removal. Removing a key removes its whole pair.
pub struct KeySetMut<'a, K: 'a, V: 'a> {
    map: &'a mut ShiftingMap<K, V>,
}

impl<'a, K, V> KeySetMut<'a, K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Keys<K> {
        self.map.keys.iter()
    }

    pub fn retain<F>(&mut self, mut f: F)
        where F: FnMut(&K) -> bool
    {
        self.map.retain(|k, _| f(k))
    }
}

impl<'a, K: PartialEq, V> KeySetMut<'a, K, V> {
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Removes `key` and its value. Returns `true` if the key was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }
}

/// Value view with removal and mutable iteration.
pub struct ValueCollectionMut<'a, K: 'a, V: 'a> {
    map: &'a mut ShiftingMap<K, V>,
}

impl<'a, K, V> ValueCollectionMut<'a, K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Values<V> {
        self.map.values.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> ValuesMut<V> {
        self.map.values.iter_mut()
    }

    pub fn retain<F>(&mut self, mut f: F)
        where F: FnMut(&V) -> bool
    {
        self.map.retain(|_, v| f(v))
    }
}

impl<'a, K, V: PartialEq> ValueCollectionMut<'a, K, V> {
    #[inline]
    pub fn contains(&self, value: &V) -> bool {
        self.map.contains_value(value)
    }

    /// Removes the newest pair holding `value`. Returns `true` if there was
    /// one.
    pub fn remove(&mut self, value: &V) -> bool {
        match self.map.values.index_of(value) {
            Some(index) => self.map.remove_at(index).is_some(),
            None => false,
        }
    }
}

impl<'a, K, V> IntoIterator for ValueCollectionMut<'a, K, V> {
    type Item = &'a mut V;
    type IntoIter = ValuesMut<'a, V>;

    fn into_iter(self) -> ValuesMut<'a, V> {
        let map = self.map;
        map.values.iter_mut()
    }
}

/// Pair view with removal and mutable iteration.
pub struct EntrySetMut<'a, K: 'a, V: 'a> {
    map: &'a mut ShiftingMap<K, V>,
}

impl<'a, K, V> EntrySetMut<'a, K, V> {
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Entries<K, V> {
        Entries { inner: self.map.iter().enumerate(), map: &*self.map }
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<K, V> {
        self.map.iter_mut()
    }

    pub fn retain<F>(&mut self, f: F)
        where F: FnMut(&K, &mut V) -> bool
    {
        self.map.retain(f)
    }
}

impl<'a, K: PartialEq, V> EntrySetMut<'a, K, V> {
    /// Removes the pair stored under `key`.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        self.map.remove_entry(key)
    }
}
