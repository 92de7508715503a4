// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search statistics.
//!
//! Counters are incremented by the engine as it runs and reported at the
//! end of a solve. They have no effect on the search itself.

use std::fmt;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

#[derive(Debug, Copy, Clone, EnumCountMacro, EnumIter)]
#[repr(u8)]
pub enum Counter {
    /// Distinct states interned into the graph.
    StatesCreated,
    /// States whose weighings were examined.
    StatesExpanded,
    /// Weighings examined across all expansions.
    WeighingsConsidered,
    /// Weighings discarded as uninformative (two impossible outcomes).
    WeighingsDiscarded,
    /// Weighings suppressed because an earlier weighing of the same state
    /// led to the same set of outcome states.
    DuplicateChildren,
    /// Calls into the bound-tightening recursion.
    ImproveCalls,
}

#[derive(Debug, Default)]
pub struct Statistics {
    counts: [u64; Counter::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the given counter by 1.
    pub fn increment(&mut self, counter: Counter) {
        self.counts[counter as usize] += 1;
    }

    /// Current value of the given counter.
    pub fn get(&self, counter: Counter) -> u64 {
        self.counts[counter as usize]
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for counter in Counter::iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {}", counter, self.get(counter))?;
            first = false;
        }
        Ok(())
    }
}
