//! Display ordering helpers shared by categories and groups.

use std::collections::HashSet;

use crate::domain::common::Direction;

/// Applies a stored order to `all`.
///
/// Names found in both lists come first in stored sequence, the rest follow in
/// their input order. Stale stored names are ignored and nothing is duplicated,
/// so the output is always a permutation of the deduplicated input.
pub fn reorder<A, B>(all: &[A], stored: &[B]) -> Vec<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let present: HashSet<&str> = all.iter().map(AsRef::as_ref).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(all.len());
    let mut ordered = Vec::with_capacity(all.len());

    for name in stored.iter().map(AsRef::as_ref) {
        if present.contains(name) && seen.insert(name) {
            ordered.push(name.to_string());
        }
    }
    for name in all.iter().map(AsRef::as_ref) {
        if seen.insert(name) {
            ordered.push(name.to_string());
        }
    }
    ordered
}

/// Swaps the item at `index` with its neighbour. Out of range or boundary moves leave the list untouched.
pub fn move_adjacent<T: Clone>(list: &[T], index: usize, direction: Direction) -> Vec<T> {
    let mut moved = list.to_vec();
    move_in_place(&mut moved, index, direction);
    moved
}

/// In-place form of [`move_adjacent`]; returns whether a swap happened.
pub fn move_in_place<T>(list: &mut [T], index: usize, direction: Direction) -> bool {
    if index >= list.len() {
        return false;
    }
    let target = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < list.len() => index + 1,
        _ => return false,
    };
    list.swap(index, target);
    true
}
