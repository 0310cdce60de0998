//! Copy-on-write set operations.

use std::collections::HashSet;
use std::hash::Hash;

/// Return a copy of `set` with `items` added.
pub fn add<T: Clone + Eq + Hash>(
    set: &HashSet<T>,
    items: impl IntoIterator<Item = T>,
) -> HashSet<T> {
    let mut result = set.clone();
    result.extend(items);
    result
}

/// Return a copy of `set` without any of `items`.
pub fn remove<'a, T: Clone + Eq + Hash + 'a>(
    set: &HashSet<T>,
    items: impl IntoIterator<Item = &'a T>,
) -> HashSet<T> {
    let mut result = set.clone();
    for item in items {
        result.remove(item);
    }
    result
}

/// Union of every set in `sets`.
pub fn union<T: Clone + Eq + Hash>(sets: &[&HashSet<T>]) -> HashSet<T> {
    sets.iter().flat_map(|set| set.iter().cloned()).collect()
}

/// Add `item` if absent, remove it if present.
pub fn toggle<T: Clone + Eq + Hash>(set: &HashSet<T>, item: T) -> HashSet<T> {
    if set.contains(&item) {
        remove(set, [&item])
    } else {
        add(set, [item])
    }
}
