use std::collections::BTreeSet;

use crate::core::services::{move_adjacent, reorder};
use crate::domain::common::Direction;

#[test]
fn stored_order_comes_first_then_remaining_in_input_order() {
    assert_eq!(reorder(&["A", "B", "C"], &["C", "A"]), vec!["C", "A", "B"]);
}

#[test]
fn stale_stored_names_are_ignored() {
    assert_eq!(
        reorder(&["A", "B"], &["Gone", "B", "Also gone"]),
        vec!["B", "A"]
    );
}

#[test]
fn empty_stored_order_keeps_input() {
    let empty: [&str; 0] = [];
    assert_eq!(reorder(&["B", "A"], &empty), vec!["B", "A"]);
}

#[test]
fn reorder_is_a_permutation_of_its_input() {
    let all = ["Rent", "Salary", "Food", "Travel", "Gifts"];
    let stored_orders: [&[&str]; 4] = [
        &[],
        &["Gifts", "Rent"],
        &["Food", "Food", "Unknown", "Salary"],
        &["Travel", "Gifts", "Food", "Salary", "Rent"],
    ];
    for stored in stored_orders {
        let ordered = reorder(&all, stored);
        assert_eq!(ordered.len(), all.len());
        let unique: BTreeSet<&str> = ordered.iter().map(String::as_str).collect();
        let expected: BTreeSet<&str> = all.iter().copied().collect();
        assert_eq!(unique, expected);
    }
}

#[test]
fn move_at_boundaries_is_noop() {
    let list = vec!["A", "B", "C"];
    assert_eq!(move_adjacent(&list, 0, Direction::Up), list);
    assert_eq!(move_adjacent(&list, 2, Direction::Down), list);
    assert_eq!(move_adjacent(&list, 7, Direction::Up), list);
}

#[test]
fn move_swaps_neighbours() {
    let list = vec!["A", "B", "C"];
    assert_eq!(move_adjacent(&list, 1, Direction::Up), vec!["B", "A", "C"]);
    assert_eq!(move_adjacent(&list, 1, Direction::Down), vec!["A", "C", "B"]);
}
