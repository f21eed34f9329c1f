// Copyright 2018 Mohammad Rezaei.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

//! # Shifting Collections for Rust
//! Bounded map and set that remember only the most recent entries.
//!
//! `ShiftingSet` and `ShiftingMap` hold at most `capacity` elements. The newest element sits at
//! position 0; when a new element arrives at a full collection, the oldest one is evicted.
//! Overwriting the value of a key already in a `ShiftingMap` does not move it.
//!
//! Both are built on `ShiftingStore`, a slot array that grows towards its capacity as
//! elements arrive and shrinks back as they are removed, keeping at most
//! `ceil(len / load_factor)` slots. Removed slots are tombstoned first and compacted in a
//! single pass, so bulk removal (`retain`) costs one compaction however much it removes.
//!
//! Lookups are linear scans using `PartialEq`, which suits the small capacities these
//! collections are meant for: recent-history lists, most-recently-seen caches, sliding
//! deduplication windows.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! shiftingcollections = "0.1.0"
//! ```
//!
//! and this to your crate root:
//!
//! ```rust
//! #[macro_use] extern crate shiftingcollections;
//! # fn main() {
//! # }
//! ```
//!

pub mod shifting_slot;
pub mod shifting_store;
pub mod shifting_set;
pub mod shifting_map;

/// Creates a [`ShiftingSet`] containing the arguments.
///
/// There are two forms of this macro:
///
/// - Create a [`ShiftingSet`] sized to hold every listed element:
///
/// ```
/// # #[macro_use] extern crate shiftingcollections;
/// # use shiftingcollections::shifting_set::ShiftingSet;
/// # fn main() {
/// let s: ShiftingSet<i32> = shiftingset![1, 2, 3];
/// assert_eq!(s.capacity(), 3);
/// assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![3, 2, 1]);
/// # }
/// ```
///
/// - Create a [`ShiftingSet`] with an explicit capacity; older elements are evicted:
///
/// ```
/// # #[macro_use] extern crate shiftingcollections;
/// # use shiftingcollections::shifting_set::ShiftingSet;
/// # fn main() {
/// let s: ShiftingSet<i32> = shiftingset![2; 1, 2, 3];
/// assert_eq!(s.iter().cloned().collect::<Vec<_>>(), vec![3, 2]);
/// # }
/// ```
///
/// Duplicates are inserted once, so the resulting set may be smaller than the list.
#[macro_export]
macro_rules! shiftingset {
    // count helper: transform any expression into 1
    (@one $x:expr) => (1usize);
    ($cap:expr; $($x:expr),*$(,)*) => ({
        let mut set = $crate::shifting_set::ShiftingSet::with_capacity($cap);
        $(set.insert($x);)*
        set
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ shiftingset!(@one $x))*;
        let mut set = $crate::shifting_set::ShiftingSet::with_capacity(count);
        $(set.insert($x);)*
        set
    });
}

/// Creates a [`ShiftingMap`] containing the arguments.
///
/// ```
/// # #[macro_use] extern crate shiftingcollections;
/// # use shiftingcollections::shifting_map::ShiftingMap;
/// # fn main() {
/// let m: ShiftingMap<&str, i32> = shiftingmap!{"a" => 1, "b" => 2};
/// assert_eq!(m.capacity(), 2);
/// assert_eq!(m[&"a"], 1);
///
/// let m: ShiftingMap<&str, i32> = shiftingmap!{1; "a" => 1, "b" => 2};
/// assert_eq!(m.len(), 1);
/// assert!(m.contains_key(&"b"));
/// # }
/// ```
#[macro_export]
macro_rules! shiftingmap {
    (@one $x:expr) => (1usize);
    ($cap:expr; $($k:expr => $v:expr),*$(,)*) => ({
        let mut map = $crate::shifting_map::ShiftingMap::with_capacity($cap);
        $(map.put($k, $v);)*
        map
    });
    ($($k:expr => $v:expr),*$(,)*) => ({
        let count = 0usize $(+ shiftingmap!(@one $k))*;
        let mut map = $crate::shifting_map::ShiftingMap::with_capacity(count);
        $(map.put($k, $v);)*
        map
    });
}
