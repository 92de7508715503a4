// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Immutable value types describing coins on a balance.
//!
//! A [`Partition`] groups the coins into parts that the search cannot (or
//! need not) tell apart. A [`Weighing`] selects coins from a partition for
//! the two pans, recorded as the provenance of each part it produces. The
//! [`Placement`] and [`Outcome`] enums name the three destinations of a coin
//! and the three results of a weighing.
//!
//! All of these types are interned through [`crate::cache::Cache`] during a
//! search, so equality of handles is equality of values.

pub mod partition;
pub mod placement;
pub mod weighing;

pub use partition::Partition;
pub use placement::{Outcome, Placement, OUTCOME_COUNT};
pub use weighing::{PartSource, Weighing};

/// Fixed-length array with one slot per weighing outcome, indexed by
/// [`Outcome::index`].
pub type OutcomeArray<T> = [T; OUTCOME_COUNT];
