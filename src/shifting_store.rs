// Copyright 2018 Mohammad Rezaei.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

//! # `ShiftingStore`: the bounded, insertion-ordered slot array.
//! Every shifting collection is built on this store. It keeps its values
//! packed at the front of a slot array, newest first, and never holds more
//! than its capacity: once full, each new value pushes the oldest one out.
//!
//! The backing array follows the population instead of a power-of-two
//! schedule. After every operation its length is
//! `clamp(ceil(len / load_factor), 1, capacity)`, so a store that shrinks
//! gives memory back, and `clear` drops all the way down to one slot.
//!
//! Removals leave a `Tombstone` behind which is compacted away (`shift`)
//! before the operation returns.

use shifting_slot::*;

use std::cmp;
use std::fmt::{self, Debug};
use std::iter::FusedIterator;
use std::marker;
use std::mem;
use std::num::NonZeroUsize;
use std::slice;
use std::vec;

/// Capacity used when a store is constructed with a capacity of 0.
pub const DEFAULT_CAPACITY: usize = 20;

/// Load factor used when a store is constructed with one outside `(0.1, 1.0)`.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// A fixed-capacity, insertion-ordered store that evicts its oldest values.
///
/// Slot 0 always holds the most recently inserted value and the highest
/// populated slot the oldest one. `insert` has set semantics: a value equal to
/// one already present is rejected.
///
/// # Examples
///
/// ```
/// use shiftingcollections::shifting_store::ShiftingStore;
///
/// let mut store = ShiftingStore::new(3, 0.75);
/// store.insert("a");
/// store.insert("b");
/// store.insert("c");
/// store.insert("d"); // "a" is evicted
///
/// assert_eq!(store.len(), 3);
/// assert!(!store.contains(&"a"));
/// assert_eq!(store.iter().cloned().collect::<Vec<_>>(), vec!["d", "c", "b"]);
/// ```
#[derive(Clone)]
pub struct ShiftingStore<E> {
    slots: Vec<Slot<E>>,
    occupied: usize,
    max_size: usize,
    load: f64,
}

#[inline]
fn single_slot<E>() -> Vec<Slot<E>> {
    let mut slots = Vec::with_capacity(1);
    slots.push(Slot::Empty);
    slots
}

#[inline]
fn sanitize_capacity(capacity: usize) -> usize {
    if capacity == 0 { DEFAULT_CAPACITY } else { capacity }
}

#[inline]
fn sanitize_load(load_factor: f64) -> f64 {
    // NaN fails both comparisons
    if load_factor > 0.1 && load_factor < 1.0 { load_factor } else { DEFAULT_LOAD_FACTOR }
}

impl<E> ShiftingStore<E> {
    /// Creates an empty store holding at most `capacity` values.
    ///
    /// A `capacity` of 0 is replaced by [`DEFAULT_CAPACITY`], and a
    /// `load_factor` outside `(0.1, 1.0)` by [`DEFAULT_LOAD_FACTOR`]. The
    /// backing array starts out as a single empty slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_store::{ShiftingStore, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
    ///
    /// let store: ShiftingStore<u32> = ShiftingStore::new(0, 7.0);
    /// assert_eq!(store.capacity(), DEFAULT_CAPACITY);
    /// assert_eq!(store.load_factor(), DEFAULT_LOAD_FACTOR);
    /// assert_eq!(store.backing_len(), 1);
    /// ```
    ///
    /// [`DEFAULT_CAPACITY`]: constant.DEFAULT_CAPACITY.html
    /// [`DEFAULT_LOAD_FACTOR`]: constant.DEFAULT_LOAD_FACTOR.html
    pub fn new(capacity: usize, load_factor: f64) -> ShiftingStore<E> {
        ShiftingStore {
            slots: single_slot(),
            occupied: 0,
            max_size: sanitize_capacity(capacity),
            load: sanitize_load(load_factor),
        }
    }

    /// Creates an empty store holding at most `capacity` values, with the
    /// default load factor.
    #[inline]
    pub fn with_capacity(capacity: usize) -> ShiftingStore<E> {
        ShiftingStore::new(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// The maximum number of values the store retains.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.load
    }

    /// Returns the number of values in the store.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Current length of the backing slot array.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_store::ShiftingStore;
    ///
    /// let mut store = ShiftingStore::new(100, 0.5);
    /// for i in 0..10 {
    ///     store.insert(i);
    /// }
    /// assert_eq!(store.backing_len(), 20);
    /// store.clear();
    /// assert_eq!(store.backing_len(), 1);
    /// ```
    #[inline]
    pub fn backing_len(&self) -> usize {
        self.slots.len()
    }

    /// The raw slot layout, front (newest) to back.
    #[inline]
    pub fn slots(&self) -> &[Slot<E>] {
        &self.slots
    }

    /// Returns the value at position `index`, 0 being the newest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&E> {
        if index >= self.occupied {
            return None;
        }
        self.slots[index].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        if index >= self.occupied {
            return None;
        }
        self.slots[index].as_mut()
    }

    /// The newest value.
    #[inline]
    pub fn front(&self) -> Option<&E> {
        self.get(0)
    }

    /// The oldest value, next in line for eviction.
    #[inline]
    pub fn back(&self) -> Option<&E> {
        if self.occupied == 0 {
            return None;
        }
        self.get(self.occupied - 1)
    }

    #[inline]
    fn backing_len_for(&self, population: usize) -> usize {
        let wanted = (population as f64 / self.load).ceil() as usize;
        cmp::max(1, cmp::min(wanted, self.max_size))
    }

    /// Writes `value` to the front of the store without checking for an equal
    /// value, returning whatever was evicted to make room.
    pub(crate) fn push_front(&mut self, value: E) -> Option<E> {
        let mut evicted = self.prepare_populate(NonZeroUsize::MIN);
        debug_assert!(evicted.len() <= 1);
        self.slots[0] = Slot::Occupied(value);
        self.occupied += 1;
        evicted.pop()
    }

    /// Frees the first `count` slots (or all of them, if the backing array
    /// cannot grow that far) by growing the array and sliding the current
    /// values back. Values that slide past the end are returned, newest first.
    ///
    /// The freed front slots are `Empty` and `len` no longer counts them;
    /// the caller fills them and bumps the population before returning.
    pub(crate) fn prepare_populate(&mut self, count: NonZeroUsize) -> Vec<E> {
        let n = cmp::min(count.get(), self.max_size);
        if self.backing_len_for(self.occupied.saturating_add(n)) != self.slots.len() {
            self.adapt_load(cmp::min(n, isize::MAX as usize) as isize);
        }
        let len = self.slots.len();
        let mut evicted = Vec::new();
        if n >= len {
            for slot in self.slots.iter_mut() {
                if let Some(v) = slot.take() {
                    evicted.push(v);
                }
            }
            self.occupied = 0;
            return evicted;
        }
        let keep = len - n;
        if self.occupied > keep {
            for slot in &mut self.slots[keep..self.occupied] {
                if let Some(v) = slot.take() {
                    evicted.push(v);
                }
            }
            self.occupied = keep;
        }
        // the tail [keep, len) is empty now and becomes the front
        self.slots.rotate_right(n);
        evicted
    }

    /// Resizes the backing array to fit `len + delta` values at the
    /// configured load factor, capped at the capacity. Values keep their
    /// positions; if the new array is shorter than the population, the oldest
    /// values are dropped.
    ///
    /// If `len + delta <= 0` the store is reset to a single empty slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_store::ShiftingStore;
    ///
    /// let mut store = ShiftingStore::new(10, 0.5);
    /// store.insert(1);
    /// assert_eq!(store.backing_len(), 2);
    /// store.adapt_load(3);
    /// assert_eq!(store.backing_len(), 8);
    /// store.adapt_load(0);
    /// assert_eq!(store.backing_len(), 2);
    /// ```
    pub fn adapt_load(&mut self, delta: isize) {
        let target = (self.occupied as isize).saturating_add(delta);
        if target <= 0 {
            self.slots = single_slot();
            self.occupied = 0;
            return;
        }
        let new_len = self.backing_len_for(target as usize);
        let len = self.slots.len();
        if new_len > len {
            self.slots.reserve_exact(new_len - len);
            self.slots.resize_with(new_len, Slot::default);
        } else if new_len < len {
            self.slots.truncate(new_len);
            self.slots.shrink_to_fit();
            self.occupied = cmp::min(self.occupied, new_len);
        }
    }

    /// Compacts the slot array: occupied slots slide towards the front in
    /// their current order, and every tombstone becomes a trailing empty slot.
    ///
    /// Running it on an already compacted store changes nothing.
    pub fn shift(&mut self) {
        let mut write = 0;
        for read in 0..self.slots.len() {
            if self.slots[read].is_occupied() {
                if read != write {
                    self.slots.swap(read, write);
                }
                write += 1;
            }
        }
        for slot in &mut self.slots[write..] {
            if slot.is_tombstone() {
                *slot = Slot::Empty;
            }
        }
        debug_assert_eq!(write, self.occupied);
    }

    /// Reads slot `index` directly, ignoring the population. Only meaningful
    /// while a bulk removal has tombstones in flight.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> Option<&E> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut E> {
        self.slots.get_mut(index).and_then(|s| s.as_mut())
    }

    /// Tombstones slot `index` without compacting.
    #[inline]
    pub(crate) fn bury_at(&mut self, index: usize) -> Option<E> {
        let v = self.slots.get_mut(index)?.bury()?;
        self.occupied -= 1;
        Some(v)
    }

    /// Compacts after one or more `bury_at` calls and gives back memory
    /// the smaller population no longer needs.
    pub(crate) fn settle(&mut self) {
        self.shift();
        if self.backing_len_for(self.occupied) < self.slots.len() {
            self.adapt_load(0);
        }
    }

    /// Removes and returns the value at position `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_store::ShiftingStore;
    ///
    /// let mut store = ShiftingStore::with_capacity(4);
    /// store.insert('a');
    /// store.insert('b');
    /// assert_eq!(store.remove_at(1), Some('a'));
    /// assert_eq!(store.remove_at(1), None);
    /// assert_eq!(store.get(0), Some(&'b'));
    /// ```
    pub fn remove_at(&mut self, index: usize) -> Option<E> {
        if index >= self.occupied {
            return None;
        }
        let v = self.bury_at(index)?;
        self.settle();
        Some(v)
    }

    /// Retains only the values for which `f` returns `true`, compacting once
    /// at the end.
    pub fn retain<F>(&mut self, mut f: F)
        where F: FnMut(&E) -> bool
    {
        let end = self.occupied;
        let mut removed = false;
        for i in 0..end {
            let keep = match self.slots[i].as_ref() {
                Some(v) => f(v),
                None => continue,
            };
            if !keep {
                drop(self.bury_at(i));
                removed = true;
            }
        }
        if removed {
            self.settle();
        }
    }

    /// Drops every value and shrinks the backing array back to one slot.
    pub fn clear(&mut self) {
        self.slots = single_slot();
        self.occupied = 0;
    }

    /// Iterates from the newest value to the oldest.
    pub fn iter(&self) -> Iter<E> {
        Iter {
            inner: self.slots[..self.occupied].iter(),
            todo: self.occupied,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<E> {
        let todo = self.occupied;
        IterMut {
            inner: self.slots[..todo].iter_mut(),
            todo,
        }
    }

    /// Empties the store, yielding its values newest first. The backing array
    /// is released right away, as with `clear`.
    pub fn drain(&mut self) -> Drain<E> {
        let todo = self.occupied;
        let mut slots = mem::replace(&mut self.slots, single_slot());
        self.occupied = 0;
        slots.truncate(todo);
        Drain {
            iter: slots.into_iter(),
            todo,
            _marker: marker::PhantomData,
        }
    }
}

impl<E: PartialEq> ShiftingStore<E> {
    /// Position of the first (newest) value equal to `value`.
    pub fn index_of(&self, value: &E) -> Option<usize> {
        self.slots[..self.occupied].iter().position(|s| s.as_ref() == Some(value))
    }

    #[inline]
    pub fn contains(&self, value: &E) -> bool {
        self.index_of(value).is_some()
    }

    /// Inserts `value` at the front. Returns `false`, leaving the store
    /// untouched, if an equal value is already present.
    ///
    /// When the store is full the oldest value is dropped.
    pub fn insert(&mut self, value: E) -> bool {
        if self.contains(&value) {
            return false;
        }
        drop(self.push_front(value));
        true
    }

    /// Removes the first value equal to `value` and returns it.
    pub fn take(&mut self, value: &E) -> Option<E> {
        let index = self.index_of(value)?;
        self.remove_at(index)
    }

    #[inline]
    pub fn remove(&mut self, value: &E) -> bool {
        self.take(value).is_some()
    }
}

impl<E> Default for ShiftingStore<E> {
    fn default() -> ShiftingStore<E> {
        ShiftingStore::new(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }
}

impl<E: Debug> Debug for ShiftingStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<E: Debug> ShiftingStore<E> {
    pub fn debug(&self) {
        println!("occupied {}, backing {}, capacity {}, load {}",
                 self.occupied, self.slots.len(), self.max_size, self.load);
        for (i, slot) in self.slots.iter().enumerate() {
            match *slot {
                Slot::Occupied(ref v) => println!("[{}: {:?}]", i, v),
                _ => println!("[{}: {}]", i, slot.tag()),
            }
        }
    }
}

impl<E> ShiftingStore<E> {
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.max_size >= 1);
        assert!(self.load > 0.1 && self.load < 1.0, "load factor out of range: {}", self.load);
        assert!(self.occupied <= self.max_size);
        assert!(self.occupied <= self.slots.len());
        assert_eq!(self.slots.len(), self.backing_len_for(self.occupied),
                   "backing length does not follow the population");
        for (i, slot) in self.slots.iter().enumerate() {
            if i < self.occupied {
                assert!(slot.is_occupied(), "gap at slot {}", i);
            } else {
                assert!(slot.is_empty(), "slot {} past the population is not empty", i);
            }
        }
    }
}

pub struct Iter<'a, E: 'a> {
    inner: slice::Iter<'a, Slot<E>>,
    todo: usize,
}

impl<'a, E> Clone for Iter<'a, E> {
    fn clone(&self) -> Self {
        Iter { inner: self.inner.clone(), todo: self.todo }
    }
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        while let Some(slot) = self.inner.next() {
            if let Slot::Occupied(ref v) = *slot {
                self.todo -= 1;
                return Some(v);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.todo, Some(self.todo))
    }
}

impl<'a, E> DoubleEndedIterator for Iter<'a, E> {
    fn next_back(&mut self) -> Option<&'a E> {
        while let Some(slot) = self.inner.next_back() {
            if let Slot::Occupied(ref v) = *slot {
                self.todo -= 1;
                return Some(v);
            }
        }
        None
    }
}

impl<'a, E> ExactSizeIterator for Iter<'a, E> {
    #[inline]
    fn len(&self) -> usize {
        self.todo
    }
}

impl<'a, E> FusedIterator for Iter<'a, E> {}

pub struct IterMut<'a, E: 'a> {
    inner: slice::IterMut<'a, Slot<E>>,
    todo: usize,
}

impl<'a, E> Iterator for IterMut<'a, E> {
    type Item = &'a mut E;

    fn next(&mut self) -> Option<&'a mut E> {
        while let Some(slot) = self.inner.next() {
            if let Slot::Occupied(ref mut v) = *slot {
                self.todo -= 1;
                return Some(v);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.todo, Some(self.todo))
    }
}

impl<'a, E> DoubleEndedIterator for IterMut<'a, E> {
    fn next_back(&mut self) -> Option<&'a mut E> {
        while let Some(slot) = self.inner.next_back() {
            if let Slot::Occupied(ref mut v) = *slot {
                self.todo -= 1;
                return Some(v);
            }
        }
        None
    }
}

impl<'a, E> ExactSizeIterator for IterMut<'a, E> {
    #[inline]
    fn len(&self) -> usize {
        self.todo
    }
}

impl<'a, E> FusedIterator for IterMut<'a, E> {}

pub struct IntoIter<E> {
    iter: vec::IntoIter<Slot<E>>,
    todo: usize,
}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        while let Some(slot) = self.iter.next() {
            if let Slot::Occupied(v) = slot {
                self.todo -= 1;
                return Some(v);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.todo, Some(self.todo))
    }
}

impl<E> DoubleEndedIterator for IntoIter<E> {
    fn next_back(&mut self) -> Option<E> {
        while let Some(slot) = self.iter.next_back() {
            if let Slot::Occupied(v) = slot {
                self.todo -= 1;
                return Some(v);
            }
        }
        None
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {
    #[inline]
    fn len(&self) -> usize {
        self.todo
    }
}

impl<E> FusedIterator for IntoIter<E> {}

/// Values drained out of a store, newest first. Whatever is left when the
/// `Drain` is dropped is dropped with it.
pub struct Drain<'a, E: 'a> {
    iter: vec::IntoIter<Slot<E>>,
    todo: usize,
    _marker: marker::PhantomData<&'a mut ShiftingStore<E>>,
}

impl<'a, E> Iterator for Drain<'a, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        while let Some(slot) = self.iter.next() {
            if let Slot::Occupied(v) = slot {
                self.todo -= 1;
                return Some(v);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.todo, Some(self.todo))
    }
}

impl<'a, E> ExactSizeIterator for Drain<'a, E> {
    #[inline]
    fn len(&self) -> usize {
        self.todo
    }
}

impl<'a, E> FusedIterator for Drain<'a, E> {}

impl<'a, E> IntoIterator for &'a ShiftingStore<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}

impl<'a, E> IntoIterator for &'a mut ShiftingStore<E> {
    type Item = &'a mut E;
    type IntoIter = IterMut<'a, E>;

    fn into_iter(self) -> IterMut<'a, E> {
        self.iter_mut()
    }
}

impl<E> IntoIterator for ShiftingStore<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> IntoIter<E> {
        IntoIter {
            iter: self.slots.into_iter(),
            todo: self.occupied,
        }
    }
}

#[cfg(test)]
mod test_store {
    extern crate rand;

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use shifting_store::test_store::rand::prelude::*;

    fn layout<E: Clone>(store: &ShiftingStore<E>) -> Vec<Slot<E>> {
        store.slots().to_vec()
    }

    #[test]
    fn test_construction_defaults() {
        let s: ShiftingStore<i32> = ShiftingStore::new(0, 0.75);
        assert_eq!(s.capacity(), DEFAULT_CAPACITY);

        for &bad in &[0.0, 0.1, 1.0, 1.5, -3.0, ::std::f64::NAN] {
            let s: ShiftingStore<i32> = ShiftingStore::new(5, bad);
            assert_eq!(s.load_factor(), DEFAULT_LOAD_FACTOR);
        }
        let s: ShiftingStore<i32> = ShiftingStore::new(5, 0.5);
        assert_eq!(s.load_factor(), 0.5);
        assert_eq!(s.backing_len(), 1);
        assert!(s.is_empty());
        s.debug_validate_invariants();
    }

    #[test]
    fn test_insert_front_and_evict() {
        let mut s = ShiftingStore::new(3, 0.75);
        assert!(s.insert(1));
        assert!(s.insert(2));
        assert!(s.insert(3));
        s.debug_validate_invariants();
        assert!(s.insert(4));
        s.debug_validate_invariants();
        assert_eq!(s.len(), 3);
        assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![4, 3, 2]);
        assert_eq!(s.front(), Some(&4));
        assert_eq!(s.back(), Some(&2));
        assert!(!s.contains(&1));
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut s = ShiftingStore::with_capacity(4);
        assert!(s.insert("a"));
        assert!(!s.insert("a"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_push_front_reports_eviction() {
        let mut s = ShiftingStore::new(2, 0.75);
        assert_eq!(s.push_front(1), None);
        assert_eq!(s.push_front(1), None);
        assert_eq!(s.push_front(2), Some(1));
        assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_capacity_one() {
        let mut s = ShiftingStore::new(1, 0.5);
        for i in 0..10 {
            s.insert(i);
            s.debug_validate_invariants();
            assert_eq!(s.len(), 1);
            assert_eq!(s.get(0), Some(&i));
        }
    }

    #[test]
    fn test_backing_len_follows_population() {
        let mut s = ShiftingStore::new(100, 0.5);
        for i in 0..30 {
            s.insert(i);
            assert_eq!(s.backing_len(), 2 * (i as usize + 1));
        }
        for i in 0..30 {
            assert!(s.remove(&i));
            s.debug_validate_invariants();
        }
        assert_eq!(s.backing_len(), 1);
    }

    #[test]
    fn test_backing_len_capped() {
        let mut s = ShiftingStore::new(10, 0.3);
        for i in 0..25 {
            s.insert(i);
            assert!(s.backing_len() <= 10);
            s.debug_validate_invariants();
        }
        assert_eq!(s.backing_len(), 10);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut s = ShiftingStore::with_capacity(10);
        for i in 0..6 {
            s.insert(i);
        }
        assert!(s.remove(&3));
        assert!(!s.remove(&3));
        s.debug_validate_invariants();
        assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![5, 4, 2, 1, 0]);
        assert_eq!(s.take(&5), Some(5));
        assert_eq!(s.index_of(&4), Some(0));
        assert_eq!(s.index_of(&0), Some(3));
        assert_eq!(s.index_of(&9), None);
    }

    #[test]
    fn test_shift_is_idempotent() {
        let mut s = ShiftingStore::with_capacity(8);
        for i in 0..8 {
            s.insert(i);
        }
        // tombstone by hand to exercise the compaction pass directly
        s.bury_at(1);
        s.bury_at(4);
        s.bury_at(5);
        s.shift();
        let first = layout(&s);
        s.shift();
        assert_eq!(first, layout(&s));
        assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![7, 5, 4, 1, 0]);
        assert!(s.slots()[5..].iter().all(|slot| slot.is_empty()));
    }

    #[test]
    fn test_adapt_load_reset() {
        let mut s = ShiftingStore::with_capacity(8);
        s.insert(1);
        s.insert(2);
        s.adapt_load(-2);
        assert_eq!(s.backing_len(), 1);
        assert!(s.is_empty());
        s.debug_validate_invariants();
    }

    #[test]
    fn test_adapt_load_truncates_oldest() {
        let mut s = ShiftingStore::new(20, 0.5);
        for i in 0..6 {
            s.insert(i);
        }
        s.adapt_load(-4);
        assert_eq!(s.backing_len(), 4);
        assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![5, 4, 3, 2]);
    }

    #[test]
    fn test_adapt_load_huge_delta_saturates() {
        let mut store = ShiftingStore::new(8, 0.75);
        store.insert(1);
        store.insert(2);
        store.adapt_load(isize::MAX);
        assert_eq!(store.len(), 2);
        assert_eq!(store.backing_len(), store.capacity());
        assert_eq!(store.iter().cloned().collect::<Vec<_>>(), vec![2, 1]);

        store.adapt_load(isize::MIN);
        assert_eq!(store.len(), 0);
        assert_eq!(store.backing_len(), 1);
    }

    #[test]
    fn test_prepare_populate_large_count() {
        let mut store = ShiftingStore::new(4, 0.75);
        store.insert('a');
        store.insert('b');
        let evicted = store.prepare_populate(NonZeroUsize::new(usize::MAX).unwrap());
        assert_eq!(evicted, vec!['b', 'a']);
        assert_eq!(store.len(), 0);
        assert_eq!(store.backing_len(), 4);
    }

    #[test]
    fn test_prepare_populate_evicts_tail() {
        let mut s = ShiftingStore::new(4, 0.75);
        for i in 0..4 {
            s.insert(i);
        }
        let evicted = s.prepare_populate(NonZeroUsize::new(2).unwrap());
        assert_eq!(evicted, vec![1, 0]);
        assert_eq!(s.len(), 2);
        assert!(s.slots()[0].is_empty());
        assert!(s.slots()[1].is_empty());
        assert_eq!(s.slots()[2], Slot::Occupied(3));
        assert_eq!(s.slots()[3], Slot::Occupied(2));

        let evicted = s.prepare_populate(NonZeroUsize::new(9).unwrap());
        assert_eq!(evicted, vec![3, 2]);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_clear_reclaims() {
        let mut s = ShiftingStore::with_capacity(50);
        for i in 0..50 {
            s.insert(i);
        }
        s.clear();
        assert_eq!(s.backing_len(), 1);
        assert_eq!(s.len(), 0);
        s.debug_validate_invariants();
        assert!(s.insert(3));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_retain() {
        let mut s = ShiftingStore::new(10, 0.5);
        for i in 0..10 {
            s.insert(i);
        }
        s.retain(|&v| v % 3 == 0);
        s.debug_validate_invariants();
        assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![9, 6, 3, 0]);
        s.retain(|_| false);
        assert!(s.is_empty());
        assert_eq!(s.backing_len(), 1);
    }

    #[test]
    fn test_iterators() {
        let mut s = ShiftingStore::with_capacity(5);
        for i in 0..5 {
            s.insert(i);
        }
        let mut it = s.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next(), Some(&4));
        assert_eq!(it.next_back(), Some(&0));
        assert_eq!(it.len(), 3);
        assert_eq!(s.iter().rev().cloned().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

        for v in s.iter_mut() {
            *v *= 10;
        }
        assert_eq!(s.get(1), Some(&30));

        let drained: Vec<_> = s.drain().collect();
        assert_eq!(drained, vec![40, 30, 20, 10, 0]);
        assert!(s.is_empty());
        assert_eq!(s.backing_len(), 1);
    }

    #[test]
    fn test_into_iter_owned() {
        let mut s = ShiftingStore::with_capacity(3);
        s.insert(String::from("a"));
        s.insert(String::from("b"));
        let v: Vec<String> = s.into_iter().collect();
        assert_eq!(v, vec![String::from("b"), String::from("a")]);
    }

    thread_local! { static DROPS: RefCell<Vec<i32>> = RefCell::new(Vec::new()) }

    #[derive(PartialEq, Debug)]
    struct Droppable {
        k: usize,
    }

    impl Droppable {
        fn new(k: usize) -> Droppable {
            DROPS.with(|slot| {
                slot.borrow_mut()[k] += 1;
            });
            Droppable { k }
        }
    }

    impl Drop for Droppable {
        fn drop(&mut self) {
            DROPS.with(|slot| {
                slot.borrow_mut()[self.k] -= 1;
            });
        }
    }

    #[test]
    fn test_evicted_values_are_dropped() {
        DROPS.with(|slot| {
            *slot.borrow_mut() = vec![0; 100];
        });
        {
            let mut s = ShiftingStore::with_capacity(10);
            for i in 0..100 {
                s.insert(Droppable::new(i));
            }
            DROPS.with(|v| {
                for i in 0..90 {
                    assert_eq!(v.borrow()[i], 0);
                }
                for i in 90..100 {
                    assert_eq!(v.borrow()[i], 1);
                }
            });
            s.retain(|d| d.k % 2 == 0);
            DROPS.with(|v| {
                assert_eq!(v.borrow()[91], 0);
                assert_eq!(v.borrow()[92], 1);
            });
            let mut drain = s.drain();
            drain.next();
        }
        DROPS.with(|v| {
            for i in 0..100 {
                assert_eq!(v.borrow()[i], 0);
            }
        });
    }

    #[test]
    fn test_random_against_model() {
        let mut rng = thread_rng();
        for &(capacity, load) in &[(1usize, 0.75), (3, 0.75), (7, 0.3), (16, 0.9)] {
            let mut s = ShiftingStore::new(capacity, load);
            let mut model: VecDeque<i32> = VecDeque::new();
            for _ in 0..2_000 {
                let x = rng.gen_range(0, 20);
                if rng.gen_range(0, 3) == 0 {
                    let expected = model.iter().position(|&m| m == x);
                    if let Some(i) = expected {
                        model.remove(i);
                    }
                    assert_eq!(s.remove(&x), expected.is_some());
                } else {
                    let fresh = !model.contains(&x);
                    if fresh {
                        model.push_front(x);
                        model.truncate(capacity);
                    }
                    assert_eq!(s.insert(x), fresh);
                }
                s.debug_validate_invariants();
                assert!(s.iter().cloned().eq(model.iter().cloned()));
            }
        }
    }
}
