// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The contract between the search engine and a puzzle.
//!
//! The engine is parametric in the problem it solves. A problem supplies a
//! state type recording what is known after some sequence of weighings and
//! outcomes, a root state, a transition function for applying a weighing,
//! and a predicate saying when a state decides the puzzle. Everything else
//! (enumeration, interning, bounding, reporting structure) lives in the
//! engine.
//!
//! The transition function must be *canonical*: applying the same weighing
//! to equal states yields equal outcome states, and states that carry the
//! same information compare equal. The engine interns states by equality, so
//! the quality of the canonicalization directly controls how much of the
//! exponential branching collapses.

pub mod majority;

use std::fmt::Debug;
use std::hash::Hash;
use std::io;

use crate::cache::{Cache, PartitionId, WeighingId};
use crate::coins::OutcomeArray;
use crate::report::Report;

/// State of a problem after some observed weighings.
///
/// States are interned by the engine, so they must be cheap enough to clone
/// and to hash. The total order only needs to be consistent; it is what
/// makes runs reproducible when states are compared.
pub trait SearchState: Clone + Ord + Hash + Debug {
    /// The partition grouping coins this state cannot (or need not)
    /// distinguish.
    fn partition(&self) -> PartitionId;
}

/// A puzzle the engine can solve.
pub trait Problem {
    type State: SearchState;

    /// The state of complete ignorance, at the single-part partition.
    fn make_root(&self, cache: &mut Cache) -> Self::State;

    /// Apply a weighing to a state, returning one optional state per
    /// outcome, indexed by [`crate::coins::Outcome::index`].
    ///
    /// `None` means the outcome cannot occur from `state`. At most two
    /// outcomes may be impossible; a well-formed state is consistent with at
    /// least one result of any weighing.
    fn apply_weighing(
        &mut self,
        cache: &mut Cache,
        state: &Self::State,
        weighing: WeighingId,
        output: PartitionId,
    ) -> OutcomeArray<Option<Self::State>>;

    /// Whether the puzzle is decided at this state.
    fn is_solved(&self, state: &Self::State) -> bool;

    /// Describe the problem instance at the top of a report.
    fn write_description<W: io::Write>(&self, out: &mut Report<W>) -> io::Result<()> {
        let _ = out;
        Ok(())
    }

    /// Describe a state inside a report.
    fn write_state<W: io::Write>(&self, out: &mut Report<W>, state: &Self::State) -> io::Result<()> {
        let _ = (out, state);
        Ok(())
    }

    /// Describe a solved state inside a report.
    fn write_solved<W: io::Write>(
        &self,
        out: &mut Report<W>,
        state: &Self::State,
    ) -> io::Result<()> {
        let _ = (out, state);
        Ok(())
    }

    /// Describe a state the search left unresolved.
    fn write_ambiguous<W: io::Write>(
        &self,
        out: &mut Report<W>,
        state: &Self::State,
    ) -> io::Result<()> {
        let _ = (out, state);
        Ok(())
    }
}
