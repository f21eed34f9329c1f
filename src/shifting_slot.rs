// Copyright 2018 Mohammad Rezaei.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

//! The tri-state cell backing every shifting collection.

use std::mem;

/// A single cell of a `ShiftingStore` backing array.
///
/// `Empty` and `Tombstone` are tags, not values, so every `T` can be stored,
/// including `Option<T>::None` or whatever a caller considers "nothing":
///
/// ```
/// use shiftingcollections::shifting_set::ShiftingSet;
///
/// let mut set: ShiftingSet<Option<u8>> = ShiftingSet::with_capacity(4);
/// assert!(set.insert(None));
/// assert!(set.insert(Some(0)));
/// assert!(set.contains(&None));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot<T> {
    /// Never populated, or released by compaction.
    Empty,
    /// Populated once, cleared, waiting for the next compaction.
    Tombstone,
    Occupied(T),
}

impl<T> Slot<T> {
    #[inline(always)]
    pub fn is_occupied(&self) -> bool {
        match *self {
            Slot::Occupied(_) => true,
            _ => false,
        }
    }

    #[inline(always)]
    pub fn is_tombstone(&self) -> bool {
        match *self {
            Slot::Tombstone => true,
            _ => false,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        match *self {
            Slot::Empty => true,
            _ => false,
        }
    }

    #[inline]
    pub fn as_ref(&self) -> Option<&T> {
        match *self {
            Slot::Occupied(ref v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        match *self {
            Slot::Occupied(ref mut v) => Some(v),
            _ => None,
        }
    }

    /// Clears an occupied slot to `Tombstone` and hands back its value.
    /// Slots that hold nothing are left untouched.
    #[inline]
    pub fn bury(&mut self) -> Option<T> {
        if !self.is_occupied() {
            return None;
        }
        match mem::replace(self, Slot::Tombstone) {
            Slot::Occupied(v) => Some(v),
            _ => None,
        }
    }

    /// Empties the slot, returning the value if it held one.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        match mem::replace(self, Slot::Empty) {
            Slot::Occupied(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn tag(&self) -> &'static str {
        match *self {
            Slot::Empty => "_",
            Slot::Tombstone => "x",
            Slot::Occupied(_) => "o",
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Empty
    }
}
