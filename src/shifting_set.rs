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

//! # `ShiftingSet`: a bounded set that forgets its oldest elements.
//! `ShiftingSet` is a thin layer over `ShiftingStore`, so it inherits all the
//! properties of the store: newest-first iteration, linear lookups and a
//! backing array sized by the load factor.

use shifting_store::{self, ShiftingStore};

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Chain;
use std::iter::FromIterator;
use std::iter::FusedIterator;

/// A set holding at most `capacity` elements. Inserting a new element into a
/// full set evicts the element that was inserted longest ago.
///
/// Lookups are linear scans using [`PartialEq`], so the set is meant for
/// small windows: recently seen ids, the last few requests, and the like.
///
/// # Examples
///
/// ```
/// use shiftingcollections::shifting_set::ShiftingSet;
///
/// let mut recent = ShiftingSet::with_capacity(3);
///
/// recent.insert("alpha");
/// recent.insert("beta");
/// recent.insert("gamma");
/// assert!(!recent.insert("beta")); // already there, nothing changes
///
/// recent.insert("delta"); // "alpha" falls out
/// assert!(!recent.contains(&"alpha"));
///
/// // Newest first.
/// let order: Vec<_> = recent.iter().cloned().collect();
/// assert_eq!(order, vec!["delta", "gamma", "beta"]);
/// ```
///
/// [`PartialEq`]: ../../std/cmp/trait.PartialEq.html
#[derive(Clone)]
pub struct ShiftingSet<E> {
    store: ShiftingStore<E>,
}

impl<E> ShiftingSet<E> {
    /// Creates an empty set holding at most `capacity` elements.
    ///
    /// A `capacity` of 0 is replaced by the default capacity (20), and a
    /// `load_factor` outside `(0.1, 1.0)` by 0.75.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_set::ShiftingSet;
    /// let set: ShiftingSet<i32> = ShiftingSet::new(10, 0.5);
    /// assert_eq!(set.capacity(), 10);
    /// ```
    #[inline]
    pub fn new(capacity: usize, load_factor: f64) -> ShiftingSet<E> {
        ShiftingSet { store: ShiftingStore::new(capacity, load_factor) }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> ShiftingSet<E> {
        ShiftingSet { store: ShiftingStore::with_capacity(capacity) }
    }

    /// The maximum number of elements the set retains.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.store.load_factor()
    }

    /// Length of the backing slot array.
    #[inline]
    pub fn backing_len(&self) -> usize {
        self.store.backing_len()
    }

    /// Read access to the underlying store.
    #[inline]
    pub fn as_store(&self) -> &ShiftingStore<E> {
        &self.store
    }

    /// An iterator visiting all elements from the newest to the oldest.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_set::ShiftingSet;
    /// let mut set = ShiftingSet::with_capacity(4);
    /// set.insert(7);
    /// set.insert(22);
    ///
    /// let v: Vec<_> = set.iter().collect();
    /// assert_eq!(v, vec![&22, &7]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<E> {
        Iter { iter: self.store.iter() }
    }

    /// Returns the number of elements in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Clears the set, returning all elements newest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_set::ShiftingSet;
    ///
    /// let mut set: ShiftingSet<_> = vec![1, 2, 3].into_iter().collect();
    /// let drained: Vec<_> = set.drain().collect();
    /// assert_eq!(drained, vec![3, 2, 1]);
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    pub fn drain(&mut self) -> Drain<E> {
        Drain { iter: self.store.drain() }
    }

    /// Clears the set and releases its backing array.
    #[inline]
    pub fn clear(&mut self) {
        self.store.clear()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_set::ShiftingSet;
    ///
    /// let mut set: ShiftingSet<i32> = vec![1, 2, 3, 4, 5, 6].into_iter().collect();
    /// set.retain(|&k| k % 2 == 0);
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn retain<F>(&mut self, f: F)
        where F: FnMut(&E) -> bool
    {
        self.store.retain(f)
    }
}

impl<E: PartialEq> ShiftingSet<E> {
    /// Adds a value to the front of the set.
    ///
    /// Returns `false` if an equal value was already present; the set is left
    /// unchanged in that case, and in particular the value does not move to
    /// the front.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_set::ShiftingSet;
    ///
    /// let mut set = ShiftingSet::with_capacity(2);
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.insert(3), true);
    /// assert_eq!(set.insert(4), true);
    /// assert_eq!(set.contains(&2), false);
    /// ```
    #[inline]
    pub fn insert(&mut self, value: E) -> bool {
        self.store.insert(value)
    }

    #[inline]
    pub fn contains(&self, value: &E) -> bool {
        self.store.contains(value)
    }

    /// Returns a reference to the element equal to `value`, if any.
    pub fn get(&self, value: &E) -> Option<&E> {
        let index = self.store.index_of(value)?;
        self.store.get(index)
    }

    /// Removes a value from the set. Returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, value: &E) -> bool {
        self.store.remove(value)
    }

    /// Removes and returns the element equal to `value`, if any.
    #[inline]
    pub fn take(&mut self, value: &E) -> Option<E> {
        self.store.take(value)
    }

    /// Removes every element that is also yielded by `values`.
    /// Returns `true` if anything was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_set::ShiftingSet;
    ///
    /// let mut set: ShiftingSet<i32> = vec![1, 2, 3, 4].into_iter().collect();
    /// assert!(set.remove_all(&[2, 4, 9]));
    /// assert!(!set.remove_all(&[9]));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove_all<'a, I>(&mut self, values: I) -> bool
        where I: IntoIterator<Item=&'a E>,
              E: 'a
    {
        let doomed: Vec<&E> = values.into_iter().collect();
        let before = self.len();
        self.store.retain(|v| !doomed.iter().any(|d| *d == v));
        before != self.len()
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    pub fn is_disjoint(&self, other: &ShiftingSet<E>) -> bool {
        self.iter().all(|v| !other.contains(v))
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use shiftingcollections::shifting_set::ShiftingSet;
    ///
    /// let sup: ShiftingSet<_> = vec![1, 2, 3].into_iter().collect();
    /// let mut set = ShiftingSet::with_capacity(4);
    ///
    /// assert_eq!(set.is_subset(&sup), true);
    /// set.insert(2);
    /// assert_eq!(set.is_subset(&sup), true);
    /// set.insert(4);
    /// assert_eq!(set.is_subset(&sup), false);
    /// ```
    pub fn is_subset(&self, other: &ShiftingSet<E>) -> bool {
        self.iter().all(|v| other.contains(v))
    }

    #[inline]
    pub fn is_superset(&self, other: &ShiftingSet<E>) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if every value yielded by `values` is in the set.
    pub fn contains_all<'a, I>(&self, values: I) -> bool
        where I: IntoIterator<Item=&'a E>,
              E: 'a
    {
        values.into_iter().all(|v| self.contains(v))
    }

    /// Visits the values in `self` but not in `other`, newest first.
    pub fn difference<'a>(&'a self, other: &'a ShiftingSet<E>) -> Difference<'a, E> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Visits the values in `self` or in `other` but not in both.
    pub fn symmetric_difference<'a>(&'a self,
                                    other: &'a ShiftingSet<E>)
                                    -> SymmetricDifference<'a, E> {
        SymmetricDifference { iter: self.difference(other).chain(other.difference(self)) }
    }

    /// Visits the values in both `self` and `other`, in `self`'s order.
    pub fn intersection<'a>(&'a self, other: &'a ShiftingSet<E>) -> Intersection<'a, E> {
        Intersection {
            iter: self.iter(),
            other,
        }
    }

    /// Visits every value of `self`, then the values of `other` that are not
    /// in `self`.
    pub fn union<'a>(&'a self, other: &'a ShiftingSet<E>) -> Union<'a, E> {
        Union { iter: self.iter().chain(other.difference(self)) }
    }
}

impl<E: Clone> ShiftingSet<E> {
    /// Copies the elements out, newest first.
    pub fn to_vec(&self) -> Vec<E> {
        self.iter().cloned().collect()
    }
}

impl<E: PartialEq> PartialEq for ShiftingSet<E> {
    fn eq(&self, other: &ShiftingSet<E>) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter().all(|key| other.contains(key))
    }
}

impl<E: Eq> Eq for ShiftingSet<E> {}

impl<E: Hash> Hash for ShiftingSet<E> {
    // element hashes are summed, so two sets holding the same elements in a
    // different order hash alike
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum = 0u64;
        for v in self.iter() {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            sum = sum.wrapping_add(h.finish());
        }
        state.write_usize(self.len());
        state.write_u64(sum);
    }
}

impl<E: fmt::Debug> fmt::Debug for ShiftingSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<E: PartialEq> FromIterator<E> for ShiftingSet<E> {
    /// Collects into a set just large enough to keep every distinct element.
    fn from_iter<I: IntoIterator<Item=E>>(iter: I) -> ShiftingSet<E> {
        let values: Vec<E> = iter.into_iter().collect();
        let mut set = ShiftingSet::with_capacity(values.len());
        set.extend(values);
        set
    }
}

impl<E: PartialEq> Extend<E> for ShiftingSet<E> {
    fn extend<I: IntoIterator<Item=E>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl<'a, E> Extend<&'a E> for ShiftingSet<E>
    where E: 'a + PartialEq + Copy
{
    fn extend<I: IntoIterator<Item=&'a E>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<E> Default for ShiftingSet<E> {
    fn default() -> ShiftingSet<E> {
        ShiftingSet::new(shifting_store::DEFAULT_CAPACITY, shifting_store::DEFAULT_LOAD_FACTOR)
    }
}

#[derive(Clone)]
pub struct Iter<'a, E: 'a> {
    iter: shifting_store::Iter<'a, E>,
}

pub struct IntoIter<E> {
    iter: shifting_store::IntoIter<E>,
}

pub struct Drain<'a, E: 'a> {
    iter: shifting_store::Drain<'a, E>,
}

#[derive(Clone)]
pub struct Intersection<'a, E: 'a> {
    // iterator of the first set
    iter: Iter<'a, E>,
    // the second set
    other: &'a ShiftingSet<E>,
}

#[derive(Clone)]
pub struct Difference<'a, E: 'a> {
    iter: Iter<'a, E>,
    other: &'a ShiftingSet<E>,
}

#[derive(Clone)]
pub struct SymmetricDifference<'a, E: 'a> {
    iter: Chain<Difference<'a, E>, Difference<'a, E>>,
}

#[derive(Clone)]
pub struct Union<'a, E: 'a> {
    iter: Chain<Iter<'a, E>, Difference<'a, E>>,
}

impl<'a, E> IntoIterator for &'a ShiftingSet<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}

impl<E> IntoIterator for ShiftingSet<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> IntoIter<E> {
        IntoIter { iter: self.store.into_iter() }
    }
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        self.iter.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, E> DoubleEndedIterator for Iter<'a, E> {
    fn next_back(&mut self) -> Option<&'a E> {
        self.iter.next_back()
    }
}

impl<'a, E> ExactSizeIterator for Iter<'a, E> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<'a, E> FusedIterator for Iter<'a, E> {}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        self.iter.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<E> DoubleEndedIterator for IntoIter<E> {
    fn next_back(&mut self) -> Option<E> {
        self.iter.next_back()
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<E> FusedIterator for IntoIter<E> {}

impl<'a, E> Iterator for Drain<'a, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        self.iter.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, E> ExactSizeIterator for Drain<'a, E> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<'a, E> FusedIterator for Drain<'a, E> {}

impl<'a, E: PartialEq> Iterator for Intersection<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        loop {
            let elt = self.iter.next()?;
            if self.other.contains(elt) {
                return Some(elt);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

impl<'a, E: PartialEq> FusedIterator for Intersection<'a, E> {}

impl<'a, E: PartialEq> Iterator for Difference<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        loop {
            let elt = self.iter.next()?;
            if !self.other.contains(elt) {
                return Some(elt);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

impl<'a, E: PartialEq> FusedIterator for Difference<'a, E> {}

impl<'a, E: PartialEq> Iterator for SymmetricDifference<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        self.iter.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, E: PartialEq> FusedIterator for SymmetricDifference<'a, E> {}

impl<'a, E: PartialEq> Iterator for Union<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        self.iter.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, E: PartialEq> FusedIterator for Union<'a, E> {}

#[cfg(test)]
mod test_set {
    use super::ShiftingSet;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(t: &T) -> u64 {
        let mut h = DefaultHasher::new();
        t.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_zero_capacity_means_default() {
        let s: ShiftingSet<u8> = ShiftingSet::with_capacity(0);
        assert_eq!(s.capacity(), 20);
        let d: ShiftingSet<u8> = ShiftingSet::default();
        assert_eq!(d.capacity(), 20);
        assert_eq!(d.load_factor(), 0.75);
    }

    #[test]
    fn test_window() {
        let mut s = ShiftingSet::with_capacity(3);
        for i in 0..10 {
            assert!(s.insert(i));
            assert!(s.len() <= 3);
        }
        assert_eq!(s.to_vec(), vec![9, 8, 7]);
        assert!(!s.contains(&6));
        s.as_store().debug_validate_invariants();
    }

    #[test]
    fn test_duplicate_does_not_refresh() {
        let mut s = ShiftingSet::with_capacity(2);
        s.insert(1);
        s.insert(2);
        assert!(!s.insert(1));
        s.insert(3);
        // 1 was the oldest and re-inserting it did not move it
        assert!(!s.contains(&1));
        assert!(s.contains(&2));
    }

    #[test]
    fn test_get_and_take() {
        let mut s: ShiftingSet<String> = ShiftingSet::with_capacity(4);
        s.insert("a".to_string());
        s.insert("b".to_string());
        assert_eq!(s.get(&"a".to_string()), Some(&"a".to_string()));
        assert_eq!(s.take(&"a".to_string()), Some("a".to_string()));
        assert_eq!(s.take(&"a".to_string()), None);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_algebra() {
        let a: ShiftingSet<i32> = vec![1, 2, 3].into_iter().collect();
        let b: ShiftingSet<i32> = vec![4, 2, 3, 4].into_iter().collect();

        assert_eq!(b.len(), 3);
        assert_eq!(a.difference(&b).cloned().collect::<Vec<_>>(), vec![1]);
        assert_eq!(b.difference(&a).cloned().collect::<Vec<_>>(), vec![4]);
        assert_eq!(a.intersection(&b).cloned().collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(a.symmetric_difference(&b).cloned().collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(a.union(&b).cloned().collect::<Vec<_>>(), vec![3, 2, 1, 4]);
        assert!(!a.is_disjoint(&b));
        assert!(a.contains_all(&[1, 3]));
        assert!(!a.contains_all(&[1, 4]));
    }

    #[test]
    fn test_eq_and_hash_ignore_order() {
        let mut a = ShiftingSet::with_capacity(5);
        let mut b = ShiftingSet::with_capacity(9);
        for i in 0..5 {
            a.insert(i);
            b.insert(4 - i);
        }
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        b.remove(&0);
        assert!(a != b);
    }

    #[test]
    fn test_extend_evicts_in_order() {
        let mut s = ShiftingSet::with_capacity(3);
        s.extend(vec![1, 2, 3, 4, 5]);
        assert_eq!(s.to_vec(), vec![5, 4, 3]);
        s.extend(&[6]);
        assert_eq!(s.to_vec(), vec![6, 5, 4]);
    }

    #[test]
    fn test_debug() {
        let mut s = ShiftingSet::with_capacity(3);
        s.insert(1);
        s.insert(2);
        assert_eq!(format!("{:?}", s), "{2, 1}");
    }
}
