//! Copy-on-write sequence operations.
//!
//! Each function reads its input slice and returns a new [`List`]. Index
//! arguments are validated up front and rejected with
//! [`ListError::IndexOutOfRange`]; all other operations are total.

use super::List;
use crate::errors::ListError;
use std::collections::HashSet;
use std::hash::Hash;

/// Append `items` to the end of `seq`.
pub fn push<T: Clone>(seq: &[T], items: impl IntoIterator<Item = T>) -> List<T> {
    seq.iter().cloned().chain(items).collect()
}

/// Remove the last element of `seq`. An empty input yields an empty list.
pub fn pop<T: Clone>(seq: &[T]) -> List<T> {
    match seq.split_last() {
        Some((_, rest)) => List::from(rest),
        None => List::new(),
    }
}

/// Prepend `items` to the beginning of `seq`, keeping their order.
pub fn unshift<T: Clone>(seq: &[T], items: impl IntoIterator<Item = T>) -> List<T> {
    items.into_iter().chain(seq.iter().cloned()).collect()
}

/// Insert `item` so that it ends up at `index`.
///
/// `index == seq.len()` appends.
pub fn insert<T: Clone>(seq: &[T], index: usize, item: T) -> Result<List<T>, ListError> {
    if index > seq.len() {
        return Err(ListError::out_of_range(index, seq.len()));
    }

    let mut copy = seq.to_vec();
    copy.insert(index, item);
    Ok(copy.into())
}

/// Replace the element at `index` with `items`.
///
/// A single replacement is `[item]`; several items splice in place of the one
/// element, and an empty iterator removes it.
pub fn replace<T: Clone>(
    seq: &[T],
    index: usize,
    items: impl IntoIterator<Item = T>,
) -> Result<List<T>, ListError> {
    if index >= seq.len() {
        return Err(ListError::out_of_range(index, seq.len()));
    }

    let mut copy = seq.to_vec();
    copy.splice(index..=index, items);
    Ok(copy.into())
}

/// Remove the element at `index`.
pub fn remove<T: Clone>(seq: &[T], index: usize) -> Result<List<T>, ListError> {
    if index >= seq.len() {
        return Err(ListError::out_of_range(index, seq.len()));
    }

    let mut copy = seq.to_vec();
    copy.remove(index);
    Ok(copy.into())
}

/// Move the element at `from` so that it ends up at `to`.
pub fn move_item<T: Clone>(seq: &[T], from: usize, to: usize) -> Result<List<T>, ListError> {
    let len = seq.len();
    if from >= len {
        return Err(ListError::out_of_range(from, len));
    }
    if to >= len {
        return Err(ListError::out_of_range(to, len));
    }

    let mut copy = seq.to_vec();
    if from != to {
        let item = copy.remove(from);
        copy.insert(to, item);
    }
    Ok(copy.into())
}

/// Replace the element at `index` with `body(element)`.
///
/// A missing index is not an error; the result is an unchanged copy.
pub fn update<T: Clone>(seq: &[T], index: usize, body: impl FnOnce(&T) -> T) -> List<T> {
    let mut copy = seq.to_vec();
    if let Some(slot) = copy.get_mut(index) {
        *slot = body(slot);
    }
    copy.into()
}

/// Remove duplicate values, keeping the first occurrence of each.
pub fn unique<T: Clone + Eq + Hash>(seq: &[T]) -> List<T> {
    let mut seen = HashSet::with_capacity(seq.len());
    seq.iter().filter(|item| seen.insert(*item)).cloned().collect()
}

/// Concatenate `seq` with every list in `others`, dropping values already seen.
pub fn union<T: Clone + Eq + Hash>(seq: &[T], others: &[&[T]]) -> List<T> {
    let mut seen = HashSet::new();
    std::iter::once(seq)
        .chain(others.iter().copied())
        .flatten()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

/// Pair up `a[i]` with `b[i]` until either input runs out.
pub fn zip<A: Clone, B: Clone>(a: &[A], b: &[B]) -> List<(A, B)> {
    a.iter().cloned().zip(b.iter().cloned()).collect()
}

/// Keep only the elements for which `predicate` returns true.
pub fn filter<T: Clone>(seq: &[T], mut predicate: impl FnMut(&T) -> bool) -> List<T> {
    seq.iter().filter(|item| predicate(item)).cloned().collect()
}
