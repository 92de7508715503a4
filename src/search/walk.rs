// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cursor over the tree implied by the search graph's children.
//!
//! The graph is a DAG, so a plain traversal would revisit shared states.
//! The walk keeps an explicit stack of frames recording which weighing and
//! which outcome was taken at each level; reporting decides what to do on
//! repeat visits. No frame borrows another, so the walk needs no
//! self-referential structure.

use crate::coins::{Outcome, OUTCOME_COUNT};
use crate::problem::Problem;
use crate::search::status::StateId;
use crate::search::Search;
use strum::IntoEnumIterator;

/// One level of the walk: from `state`, weighing number `child` was applied
/// and outcome number `outcome` observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkFrame {
    pub state: StateId,
    pub child: usize,
    pub outcome: usize,
}

/// Depth-first cursor over the solution tree.
///
/// In `single_child` mode sibling movement stays inside the current
/// weighing, which restricts the walk to one weighing per state; reporting
/// uses this for happy-path output.
pub struct TreeWalk<'a, P: Problem> {
    search: &'a Search<P>,
    current: StateId,
    path: Vec<WalkFrame>,
    single_child: bool,
}

impl<'a, P: Problem> TreeWalk<'a, P> {
    pub(crate) fn new(search: &'a Search<P>, single_child: bool) -> Self {
        Self {
            search,
            current: search.root(),
            path: Vec::new(),
            single_child,
        }
    }

    /// The state the cursor is on.
    pub fn current(&self) -> StateId {
        self.current
    }

    /// The frames from the root down to the current state.
    pub fn path(&self) -> &[WalkFrame] {
        &self.path
    }

    /// Depth of the current state below the root.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The weighing child index and outcome by which the current state was
    /// reached, or None at the root.
    pub fn edge(&self) -> Option<(usize, Outcome)> {
        self.path.last().map(|frame| {
            let outcome = Outcome::iter()
                .nth(frame.outcome)
                .expect("outcome index in range");
            (frame.child, outcome)
        })
    }

    /// Descend into the first present outcome of weighing `child` of the
    /// current state. False if there is no such weighing or outcome.
    pub fn advance_child(&mut self, child: usize) -> bool {
        let status = self.search.status(self.current);
        let Some(entry) = status.children.get(child) else {
            return false;
        };
        let Some(outcome) = (0..OUTCOME_COUNT).find(|&o| entry.outcomes[o].is_some()) else {
            return false;
        };
        let next = entry.outcomes[outcome].expect("outcome just found");
        self.path.push(WalkFrame {
            state: self.current,
            child,
            outcome,
        });
        self.current = next;
        true
    }

    /// Descend into the first outcome of the first weighing of the current
    /// state. False at a leaf.
    pub fn advance_first_child(&mut self) -> bool {
        let children = self.search.status(self.current).children.len();
        (0..children).any(|child| self.advance_child(child))
    }

    /// Move to the next outcome of the current weighing, or (unless in
    /// `single_child` mode) to the first outcome of the next weighing.
    /// False when the current level is exhausted.
    pub fn advance_sibling(&mut self) -> bool {
        let Some(frame) = self.path.last().copied() else {
            return false;
        };
        let status = self.search.status(frame.state);
        for outcome in frame.outcome + 1..OUTCOME_COUNT {
            if let Some(next) = status.children[frame.child].outcomes[outcome] {
                let top = self.path.last_mut().expect("frame exists");
                top.outcome = outcome;
                self.current = next;
                return true;
            }
        }
        if self.single_child {
            return false;
        }
        for child in frame.child + 1..status.children.len() {
            for outcome in 0..OUTCOME_COUNT {
                if let Some(next) = status.children[child].outcomes[outcome] {
                    let top = self.path.last_mut().expect("frame exists");
                    top.child = child;
                    top.outcome = outcome;
                    self.current = next;
                    return true;
                }
            }
        }
        false
    }

    /// Pop back to the parent state. False at the root.
    pub fn advance_parent(&mut self) -> bool {
        match self.path.pop() {
            Some(frame) => {
                self.current = frame.state;
                true
            }
            None => false,
        }
    }

    /// Ascend until some level has a next sibling, and move to it. False
    /// once the walk is exhausted.
    pub fn advance_prune(&mut self) -> bool {
        loop {
            if self.path.is_empty() {
                return false;
            }
            if self.advance_sibling() {
                return true;
            }
            self.advance_parent();
        }
    }
}
