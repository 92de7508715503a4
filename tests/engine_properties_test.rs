// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Property checks cutting across the enumerator, the cache, the MAJORITY
//! canonicalization and the engine's bound bookkeeping.

use balance_search::cache::Cache;
use balance_search::coins::Outcome;
use balance_search::problem::majority::{JoinStrategy, MajorityProblem};
use balance_search::problem::{Problem, SearchState};
use balance_search::search::Search;

/// Every weighing recorded in the solved graph conserves coins and lists
/// its output parts canonically.
#[test]
fn test_recorded_weighings_are_well_formed() {
    let mut search = Search::new(MajorityProblem::new(7, true).unwrap());
    search.solve(7);
    let cache = search.cache();
    let mut checked = 0;
    for id in search.state_ids() {
        let input = cache.partition(search.state(id).partition());
        for child in &search.status(id).children {
            let output = cache.partition(child.output);
            assert!(cache.weighing(child.weighing).is_well_formed(input, output));
            checked += 1;
        }
    }
    assert!(checked > 0);
}

/// Applying the same weighing to the same state twice yields states with
/// identical interned partition handles.
#[test]
fn test_repeated_application_interns_identically() {
    let mut cache = Cache::new();
    let mut problem = MajorityProblem::new(7, true).unwrap();
    let root = problem.make_root(&mut cache);
    for option in cache.children(root.partition).to_vec() {
        let first = problem.apply_weighing(&mut cache, &root, option.weighing, option.output);
        let second = problem.apply_weighing(&mut cache, &root, option.weighing, option.output);
        assert_eq!(first, second);
        for (a, b) in first.iter().zip(&second) {
            if let (Some(a), Some(b)) = (a, b) {
                assert_eq!(a.partition, b.partition);
            }
        }
    }
}

/// Symmetric weighings give canonically equal heavier outcomes on every
/// state they are applied to.
#[test]
fn test_symmetric_outcomes_coincide() {
    let mut cache = Cache::new();
    let mut problem = MajorityProblem::new(5, true).unwrap();
    let root = problem.make_root(&mut cache);
    let mut frontier = vec![root];
    let mut seen = 0;
    while let Some(state) = frontier.pop() {
        if seen > 40 {
            break;
        }
        for option in cache.children(state.partition).to_vec() {
            let outcomes =
                problem.apply_weighing(&mut cache, &state, option.weighing, option.output);
            if option.symmetric {
                assert_eq!(
                    outcomes[Outcome::LeftHeavier.index()],
                    outcomes[Outcome::RightHeavier.index()]
                );
            }
            seen += 1;
            for outcome in outcomes.into_iter().flatten() {
                if !problem.is_solved(&outcome) {
                    frontier.push(outcome);
                }
            }
        }
    }
    assert!(seen > 0);
}

/// Enumerating the weighings of the same partition twice gives identical
/// memoized results.
#[test]
fn test_cached_children_are_stable() {
    let mut cache = Cache::new();
    let mut problem = MajorityProblem::new(5, true).unwrap();
    let root = problem.make_root(&mut cache);
    let before = cache.children(root.partition).to_vec();
    // Touch the cache with more work, then re-read.
    for option in before.clone() {
        problem.apply_weighing(&mut cache, &root, option.weighing, option.output);
    }
    assert_eq!(cache.children(root.partition), before.as_slice());
}

/// The join strategies agree on the optimal depth; joining only changes how
/// fast the state space collapses.
#[test]
fn test_join_strategies_agree_on_depth() {
    for strategy in [
        JoinStrategy::None,
        JoinStrategy::SameVariety,
        JoinStrategy::All,
        JoinStrategy::Validate,
    ] {
        let problem = MajorityProblem::new(5, true)
            .unwrap()
            .with_join_strategy(strategy);
        let mut search = Search::new(problem);
        assert_eq!(search.solve(5), (3, Some(3)), "strategy {:?}", strategy);
    }
}
