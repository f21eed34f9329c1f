// Copyright 2018 Mohammad Rezaei.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//

#[macro_use]
extern crate shiftingcollections;
extern crate ordered_float;
extern crate rand;
extern crate xoshiro;

use shiftingcollections::shifting_map::ShiftingMap;
use ordered_float::OrderedFloat;
use std::collections::VecDeque;

use rand::*;
use xoshiro::Xoshiro512StarStar;

#[derive(PartialEq, Eq, Debug, Clone)]
struct Color {
    r: u8,
    g: u8,
    b: u8,
}

#[test]
fn custom_key() {
    let mut map = ShiftingMap::new(2, 0.75);
    map.put(Color { r: 0, g: 0, b: 0 }, 17);
    map.put(Color { r: 0, g: 0, b: 1 }, 42);
    map.put(Color { r: 1, g: 1, b: 1 }, 1);

    assert_eq!(None, map.get(&Color { r: 0, g: 0, b: 0 }));
    assert_eq!(42, *map.get(&Color { r: 0, g: 0, b: 1 }).unwrap());
    assert_eq!(1, *map.get(&Color { r: 1, g: 1, b: 1 }).unwrap());
}

#[test]
fn float_keys() {
    let mut map = ShiftingMap::with_capacity(3);
    map.put(OrderedFloat(0.5), "half");
    map.put(OrderedFloat(-0.0), "zero");
    map.put(OrderedFloat(2.0), "two");
    assert_eq!(map.put(OrderedFloat(0.5), "one half"), Some("half"));
    map.put(OrderedFloat(3.0), "three");

    assert!(!map.contains_key(&OrderedFloat(0.5)));
    assert_eq!(map[&OrderedFloat(3.0)], "three");
    assert_eq!(map.len(), 3);
}

#[test]
fn fill_and_evict_in_order() {
    let mut map = ShiftingMap::new(3, 0.75);
    for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        map.put(*k, i);
    }
    let keys: Vec<&str> = map.key_set().iter().cloned().collect();
    assert_eq!(keys, vec!["e", "d", "c"]);
    let values: Vec<usize> = map.values().into_iter().cloned().collect();
    assert_eq!(values, vec![4, 3, 2]);
}

#[test]
fn backing_grows_and_shrinks() {
    let mut map = ShiftingMap::new(100, 0.5);
    assert_eq!(map.backing_len(), 1);
    for i in 0..10 {
        map.put(i, i);
    }
    assert_eq!(map.backing_len(), 20);
    for i in 10..100 {
        map.put(i, i);
    }
    assert_eq!(map.backing_len(), 100);

    map.retain(|k, _| *k < 5);
    assert_eq!(map.len(), 5);
    assert_eq!(map.backing_len(), 10);

    for i in 0..5 {
        map.remove(&i);
    }
    assert!(map.is_empty());
    assert_eq!(map.backing_len(), 1);
}

#[test]
fn view_removal_keeps_pairs() {
    let mut map: ShiftingMap<String, usize> = ShiftingMap::with_capacity(6);
    for i in 0..6 {
        map.put(format!("k{}", i), i);
    }
    assert!(map.key_set_mut().remove(&"k2".to_string()));
    assert!(map.values_mut().remove(&4));
    map.entry_set_mut().retain(|_, v| *v != 0);

    let pairs: Vec<(String, usize)> = map.into_iter().collect();
    assert_eq!(pairs, vec![("k5".to_string(), 5), ("k3".to_string(), 3), ("k1".to_string(), 1)]);
}

#[test]
fn stale_entry_after_remove() {
    let mut map = shiftingmap!{4; 1 => 'a', 2 => 'b', 3 => 'c'};
    let handle = map.entry_set().iter().find(|e| *e.key() == 2).map(|e| e.handle()).unwrap();
    assert_eq!(map.value_of(handle), Some(&'b'));
    map.remove(&3);
    assert_eq!(map.value_of(handle), None);
    assert_eq!(map.key_of(handle), None);
}

#[test]
fn zero_capacity_means_default() {
    let mut map = ShiftingMap::new(0, 0.75);
    assert_eq!(map.capacity(), 20);
    for i in 0..25 {
        map.put(i, ());
    }
    assert_eq!(map.len(), 20);
    assert!(!map.contains_key(&4));
    assert!(map.contains_key(&5));
}

#[test]
fn odd_load_factor_means_default() {
    let a: ShiftingMap<u8, u8> = ShiftingMap::new(10, 1.5);
    let b: ShiftingMap<u8, u8> = ShiftingMap::new(10, 0.05);
    assert_eq!(a.load_factor(), 0.75);
    assert_eq!(b.load_factor(), 0.75);
}

#[test]
fn random_seeded_against_model() {
    let mut rng = Xoshiro512StarStar::from_seed_u64(0x1234_5678_9ABC_DEF1);
    let capacity = 16;
    let mut map = ShiftingMap::new(capacity, 0.6);
    let mut model: VecDeque<(u32, u32)> = VecDeque::new();

    for step in 0..20_000u32 {
        let key = rng.next_u32() % 40;
        if rng.next_u32() % 3 == 0 {
            let expected = model.iter().position(|p| p.0 == key)
                .and_then(|p| model.remove(p))
                .map(|p| p.1);
            assert_eq!(map.remove(&key), expected);
        } else {
            let expected = match model.iter_mut().find(|p| p.0 == key) {
                Some(p) => Some(std::mem::replace(&mut p.1, step)),
                None => {
                    model.push_front((key, step));
                    model.truncate(capacity);
                    None
                }
            };
            assert_eq!(map.put(key, step), expected);
        }
        assert_eq!(map.len(), model.len());
        assert!(map.iter().map(|(k, v)| (*k, *v)).eq(model.iter().cloned()));
    }
}
