//! Copy-on-write map operations.

use std::collections::HashMap;
use std::hash::Hash;

/// Return a copy of `map` with `key` bound to `value`.
pub fn set<K, V>(map: &HashMap<K, V>, key: K, value: V) -> HashMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    let mut result = map.clone();
    result.insert(key, value);
    result
}

/// Return a copy of `map` without `key`.
pub fn remove<K, V>(map: &HashMap<K, V>, key: &K) -> HashMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    let mut result = map.clone();
    result.remove(key);
    result
}
