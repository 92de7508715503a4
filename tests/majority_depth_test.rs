// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! End-to-end depth checks for the MAJORITY problem.
//!
//! The almost-balanced instances are the hardest individual cases and have
//! known optimal depths, so each solve doubles as a correctness check for
//! the enumerator, the canonicalizer and the bounding logic at once.

use balance_search::problem::majority::MajorityProblem;
use balance_search::search::Search;

fn solve(coin_count: u8) -> (Search<MajorityProblem>, u8) {
    let problem = MajorityProblem::new(coin_count, true).unwrap();
    let mut search = Search::new(problem);
    let (depth_min, depth_max) = search.solve(coin_count);
    assert_eq!(
        Some(depth_min),
        depth_max,
        "{} coins did not resolve",
        coin_count
    );
    (search, depth_min)
}

/// The root must own a weighing whose every outcome resolves one level
/// faster than the root itself.
fn assert_optimal_child_exists(search: &Search<MajorityProblem>, depth: u8) {
    let root = search.status(search.root());
    let found = root.children.iter().any(|child| {
        child
            .present()
            .all(|outcome| match search.status(outcome).depth_max {
                Some(max) => max <= depth - 1,
                None => false,
            })
    });
    assert!(found, "no weighing of the root achieves depth {}", depth);
}

#[test]
fn test_three_coins_need_two_weighings() {
    let (search, depth) = solve(3);
    assert_eq!(depth, 2);
    assert_optimal_child_exists(&search, depth);
}

#[test]
fn test_five_coins_need_three_weighings() {
    let (search, depth) = solve(5);
    assert_eq!(depth, 3);
    assert_optimal_child_exists(&search, depth);
}

#[test]
fn test_seven_coins_need_three_weighings() {
    let (search, depth) = solve(7);
    assert_eq!(depth, 3);
    assert_optimal_child_exists(&search, depth);
}

#[test]
fn test_nine_coins_need_four_weighings() {
    let (search, depth) = solve(9);
    assert_eq!(depth, 4);
    assert_optimal_child_exists(&search, depth);
}

/// Stretch case: only feasible because canonicalization collapses most of
/// the state space. Run with `cargo test -- --ignored` when patient.
#[test]
#[ignore]
fn test_eleven_coins_need_four_weighings() {
    let (search, depth) = solve(11);
    assert_eq!(depth, 4);
    assert_optimal_child_exists(&search, depth);
}

#[test]
fn test_bounds_are_invariant_under_rerun() {
    let (first, first_depth) = solve(5);
    let (second, second_depth) = solve(5);
    assert_eq!(first_depth, second_depth);
    assert_eq!(first.state_count(), second.state_count());
    assert_eq!(first.cache().partition_count(), second.cache().partition_count());
    assert_eq!(first.cache().weighing_count(), second.cache().weighing_count());
}

#[test]
fn test_unconstrained_three_coins_still_resolve() {
    // Without the almost-balanced hint the root carries more
    // distributions, but three coins still decide in two weighings.
    let problem = MajorityProblem::new(3, false).unwrap();
    let mut search = Search::new(problem);
    assert_eq!(search.solve(8), (2, Some(2)));
}
