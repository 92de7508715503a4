// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Minimum-depth decision trees for coin-weighing puzzles on a three-outcome
//! balance.
//!
//! The concrete puzzle is MAJORITY: among an odd number of coins, each
//! either slightly heavier (H) or slightly lighter (L), determine which
//! variety is in the majority using as few weighings as possible in the
//! worst case.
//!
//! # Architecture
//!
//! The crate is a generic search engine plus one pluggable problem:
//!
//! - [`coins`] - immutable value types: partitions of the coins and
//!   provenance-encoded weighings;
//! - [`enumerate`] - the canonical, symmetry-reduced enumeration of all
//!   weighings of a partition;
//! - [`cache`] - the interning store that makes equality of handles
//!   equality of values and memoizes enumeration results;
//! - [`problem`] - the contract between engine and puzzle, and the
//!   MAJORITY implementation with its state canonicalization;
//! - [`search`] - the state graph and the branch-and-bound driver that
//!   tightens lower/upper bounds on the resolved depth until they meet;
//! - [`report`] - the indented text dump of the resulting decision tree.
//!
//! Everything is deterministic: two runs on the same instance produce the
//! same graph, the same bounds and byte-identical reports.
//!
//! # Example
//!
//! ```
//! use balance_search::problem::majority::MajorityProblem;
//! use balance_search::search::Search;
//!
//! let problem = MajorityProblem::new(3, true).unwrap();
//! let mut search = Search::new(problem);
//! // Three coins need two weighings in the worst case.
//! assert_eq!(search.solve(8), (2, Some(2)));
//! ```

pub mod cache;
pub mod coins;
pub mod enumerate;
pub mod problem;
pub mod report;
pub mod search;

// Re-export the commonly used types.
pub use cache::{Cache, PartitionId, WeighingId};
pub use coins::{Outcome, OutcomeArray, Partition, Placement, Weighing};
pub use problem::majority::{JoinStrategy, MajorityProblem, MajorityState, ProblemSetupError};
pub use problem::{Problem, SearchState};
pub use report::{write_report, Report};
pub use search::{Search, StateId, TreeWalk};
