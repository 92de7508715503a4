// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The branch-and-bound search over problem states.
//!
//! The engine holds a map from canonical problem state to a [`StateId`],
//! and per state a [`Status`] with the discovered weighings and bounds on
//! the state's *resolved depth* (the worst-case number of further weighings
//! an optimal strategy needs). Distinct weighing histories frequently
//! converge on the same canonical state, so the graph is a DAG, and each
//! state is expanded exactly once however many paths reach it.
//!
//! Solving iterates two moves until the root's bounds meet:
//!
//! - **expand** a state on first visit: enumerate the weighings of its
//!   partition, apply each through the problem, intern the outcome states,
//!   and keep the informative, non-duplicate ones as children;
//! - **improve** a state towards a target depth: recursively tighten the
//!   children's bounds, lowering `depth_max` whenever some weighing
//!   resolves everywhere below the target and raising `depth_min` when no
//!   weighing can beat it.
//!
//! The driver deepens the target one level per round, so the first time the
//! bounds meet they meet at the true optimum.

pub mod stats;
pub mod status;
pub mod walk;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::cache::Cache;
use crate::problem::{Problem, SearchState};
use stats::{Counter, Statistics};
pub use status::{Child, StateId, Status};
pub use walk::{TreeWalk, WalkFrame};

struct Node<S> {
    state: S,
    status: Status,
}

/// A search instance: the problem, the interning cache, and the state
/// graph. All of the search's memory lives here.
pub struct Search<P: Problem> {
    problem: P,
    cache: Cache,
    index: FxHashMap<P::State, StateId>,
    nodes: Vec<Node<P::State>>,
    root: StateId,
    statistics: Statistics,
}

impl<P: Problem> Search<P> {
    /// Set up a search for `problem`, interning its root state.
    pub fn new(problem: P) -> Self {
        let mut search = Self {
            problem,
            cache: Cache::new(),
            index: FxHashMap::default(),
            nodes: Vec::new(),
            root: StateId(0),
            statistics: Statistics::new(),
        };
        let root_state = search.problem.make_root(&mut search.cache);
        search.root = search.intern_state(root_state);
        search
    }

    /// The root state's id.
    pub fn root(&self) -> StateId {
        self.root
    }

    /// The problem being solved.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// The partition/weighing cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Counters accumulated so far.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Number of states in the graph.
    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }

    /// All state ids, in discovery order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.nodes.len() as u32).map(StateId)
    }

    /// The state stored under `id`.
    pub fn state(&self, id: StateId) -> &P::State {
        &self.nodes[id.0 as usize].state
    }

    /// The status of the state stored under `id`.
    pub fn status(&self, id: StateId) -> &Status {
        &self.nodes[id.0 as usize].status
    }

    fn status_mut(&mut self, id: StateId) -> &mut Status {
        &mut self.nodes[id.0 as usize].status
    }

    /// Current `(depth_min, depth_max)` of the root.
    pub fn root_bounds(&self) -> (u8, Option<u8>) {
        let status = self.status(self.root);
        (status.depth_min, status.depth_max)
    }

    /// Walk the current solution DAG for reporting. With `single_child` the
    /// walk never moves sideways across weighings of one state.
    pub fn walk(&self, single_child: bool) -> TreeWalk<'_, P> {
        TreeWalk::new(self, single_child)
    }

    /// Run the search until the root is resolved or its lower bound reaches
    /// `stop_depth`. Returns the root's final `(depth_min, depth_max)`.
    ///
    /// Hitting the cap is a normal exit: the bounds then report what is
    /// known, with `depth_max` possibly still `None`.
    pub fn solve(&mut self, stop_depth: u8) -> (u8, Option<u8>) {
        loop {
            let (depth_min, depth_max) = self.root_bounds();
            if depth_max == Some(depth_min) || depth_min >= stop_depth {
                break;
            }
            let target = depth_min + 1;
            info!(
                target,
                states = self.nodes.len(),
                partitions = self.cache.partition_count(),
                "deepening"
            );
            self.improve_node(self.root, target);
            let (after_min, after_max) = self.root_bounds();
            assert!(
                after_max == Some(after_min) || after_min >= target,
                "improve_node failed to make progress"
            );
        }
        let (depth_min, depth_max) = self.root_bounds();
        info!(
            depth_min,
            depth_max = ?depth_max,
            states = self.nodes.len(),
            partitions = self.cache.partition_count(),
            weighings = self.cache.weighing_count(),
            "search finished; {}",
            self.statistics
        );
        (depth_min, depth_max)
    }

    /// Intern a state, creating its status on first sight.
    fn intern_state(&mut self, state: P::State) -> StateId {
        if let Some(&id) = self.index.get(&state) {
            return id;
        }
        let id = StateId(self.nodes.len() as u32);
        let status = if self.problem.is_solved(&state) {
            Status::new_solved()
        } else {
            Status::new_unsolved()
        };
        self.statistics.increment(Counter::StatesCreated);
        self.index.insert(state.clone(), id);
        self.nodes.push(Node { state, status });
        id
    }

    /// Worst-case bounds over the present outcomes of a child:
    /// `(max depth_min, max depth_max if all known)`.
    fn child_bounds(&self, child: &Child) -> (u8, Option<u8>) {
        let mut worst_min = 0u8;
        let mut worst_max = Some(0u8);
        let mut any = false;
        for outcome in child.present() {
            any = true;
            let status = self.status(outcome);
            worst_min = worst_min.max(status.depth_min);
            worst_max = match (worst_max, status.depth_max) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            };
        }
        assert!(any, "child without outcomes");
        (worst_min, worst_max)
    }

    /// Examine every weighing of a state once, recording the informative
    /// ones as children and seeding the state's bounds. Idempotent.
    fn expand(&mut self, id: StateId) {
        if self.status(id).is_expanded() {
            return;
        }
        self.statistics.increment(Counter::StatesExpanded);
        let state = self.state(id).clone();
        let options = self.cache.children(state.partition()).to_vec();
        debug!(state = %id, options = options.len(), "expanding");

        let mut seen: FxHashSet<Vec<StateId>> = FxHashSet::default();
        let mut worst_child_min: Option<u8> = None;
        for option in options {
            self.statistics.increment(Counter::WeighingsConsidered);
            let mut outcomes =
                self.problem
                    .apply_weighing(&mut self.cache, &state, option.weighing, option.output);
            let impossible = outcomes.iter().filter(|o| o.is_none()).count();
            assert!(impossible < 3, "no outcome possible for a weighing");
            if impossible >= 2 {
                // A weighing with one possible outcome tells us nothing.
                self.statistics.increment(Counter::WeighingsDiscarded);
                continue;
            }
            if option.symmetric {
                // The two heavier outcomes of a symmetric weighing are
                // mirror images; keep only the left one.
                outcomes[1] = None;
            }
            let mut ids: [Option<StateId>; 3] = [None, None, None];
            for (slot, outcome) in ids.iter_mut().zip(outcomes) {
                if let Some(outcome_state) = outcome {
                    *slot = Some(self.intern_state(outcome_state));
                }
            }
            let child = Child {
                weighing: option.weighing,
                output: option.output,
                outcomes: ids,
            };

            if child.present().all(|outcome| self.status(outcome).is_solved()) {
                // Every outcome is decided: one weighing suffices, and no
                // other child can beat it.
                let status = self.status_mut(id);
                status.children.clear();
                status.children.push(child);
                status.lower_depth_max(1);
                status.raise_depth_min(1);
                return;
            }

            let mut key: Vec<StateId> = child.present().collect();
            key.sort_unstable();
            if !seen.insert(key) {
                // Same outcome states as an earlier weighing: keeping both
                // would only duplicate work.
                self.statistics.increment(Counter::DuplicateChildren);
                continue;
            }

            let (child_min, child_max) = self.child_bounds(&child);
            worst_child_min = Some(match worst_child_min {
                Some(current) => current.min(child_min),
                None => child_min,
            });
            let status = self.status_mut(id);
            status.children.push(child);
            if let Some(max) = child_max {
                status.lower_depth_max(max + 1);
            }
        }

        let worst = worst_child_min.expect("unsolved state has no informative weighing");
        let status = self.status_mut(id);
        let bound = match status.depth_max {
            Some(max) => max.min(worst + 1),
            None => worst + 1,
        };
        status.raise_depth_min(bound);
    }

    /// Tighten the bounds of `id` until it is resolved or its lower bound
    /// reaches `target`.
    ///
    /// Recursion re-entering a state that is already at or above the target
    /// returns immediately, which bounds the work on the DAG.
    fn improve_node(&mut self, id: StateId, target: u8) {
        self.statistics.increment(Counter::ImproveCalls);
        {
            let status = self.status(id);
            if status.is_resolved() || status.depth_min >= target {
                return;
            }
        }
        self.expand(id);
        if self.status(id).is_resolved() {
            return;
        }

        let child_count = self.status(id).children.len();
        let mut worst_child_min: Option<u8> = None;
        for index in 0..child_count {
            let child = self.status(id).children[index].clone();
            for outcome in child.present() {
                self.improve_node(outcome, target - 1);
            }
            let (child_min, child_max) = self.child_bounds(&child);
            worst_child_min = Some(match worst_child_min {
                Some(current) => current.min(child_min),
                None => child_min,
            });
            if let Some(max) = child_max {
                let status = self.status_mut(id);
                status.lower_depth_max(max + 1);
                if status.is_resolved() {
                    return;
                }
            }
        }

        let worst = worst_child_min.expect("expanded state has no children");
        let status = self.status_mut(id);
        let bound = match status.depth_max {
            Some(max) => max.min(worst + 1),
            None => worst + 1,
        };
        status.raise_depth_min(bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::majority::MajorityProblem;

    fn search(coin_count: u8) -> Search<MajorityProblem> {
        Search::new(MajorityProblem::new(coin_count, true).unwrap())
    }

    #[test]
    fn test_root_is_interned_once() {
        let engine = search(5);
        assert_eq!(engine.state_count(), 1);
        assert_eq!(engine.root_bounds(), (1, None));
    }

    #[test]
    fn test_three_coins_resolve_at_depth_two() {
        let mut engine = search(3);
        assert_eq!(engine.solve(8), (2, Some(2)));
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let mut engine = search(3);
        engine.expand(engine.root());
        let children = engine.status(engine.root()).children.clone();
        let states = engine.state_count();
        engine.expand(engine.root());
        assert_eq!(engine.status(engine.root()).children, children);
        assert_eq!(engine.state_count(), states);
        assert_eq!(engine.statistics().get(Counter::StatesExpanded), 1);
    }

    #[test]
    fn test_stop_depth_is_a_normal_exit() {
        let mut engine = search(5);
        let (depth_min, depth_max) = engine.solve(1);
        assert_eq!(depth_min, 1);
        assert!(depth_max.is_none());
    }

    #[test]
    fn test_bounds_monotone_across_rounds() {
        let mut engine = search(5);
        let mut previous_min = 0;
        for stop in 1..=4 {
            let (depth_min, _) = engine.solve(stop);
            assert!(depth_min >= previous_min);
            previous_min = depth_min;
        }
        assert_eq!(engine.root_bounds(), (3, Some(3)));
    }

    #[test]
    fn test_symmetric_weighing_drops_right_outcome() {
        let mut engine = search(3);
        engine.expand(engine.root());
        // The only weighing of [3] is symmetric: one coin per pan.
        let children = &engine.status(engine.root()).children;
        assert_eq!(children.len(), 1);
        assert!(children[0].outcomes[0].is_some());
        assert!(children[0].outcomes[1].is_none());
        assert!(children[0].outcomes[2].is_some());
    }
}
