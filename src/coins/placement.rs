// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Placements of coins during a weighing and outcomes of a weighing.

use std::fmt;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Where the coins of one output part were placed during a weighing.
///
/// The declaration order is also the tie-break order used when sorting the
/// parts a weighing produces: `Left < Right < Aside`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCountMacro, EnumIter,
)]
#[repr(u8)]
pub enum Placement {
    /// Coins placed in the left pan.
    Left,
    /// Coins placed in the right pan.
    Right,
    /// Coins not weighed this time.
    Aside,
}

impl Placement {
    /// Short name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Placement::Left => "Left",
            Placement::Right => "Right",
            Placement::Aside => "Aside",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three possible results of a weighing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCountMacro, EnumIter,
)]
#[repr(u8)]
pub enum Outcome {
    /// The left pan was heavier.
    LeftHeavier,
    /// The right pan was heavier.
    RightHeavier,
    /// The pans balanced.
    Balances,
}

/// Number of weighing outcomes; the length of [`crate::coins::OutcomeArray`].
pub const OUTCOME_COUNT: usize = 3;

impl Outcome {
    /// Index of this outcome into an [`crate::coins::OutcomeArray`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::LeftHeavier => "Left",
            Outcome::RightHeavier => "Right",
            Outcome::Balances => "Balanced",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_outcome_count_matches_enum() {
        assert_eq!(OUTCOME_COUNT, Outcome::COUNT);
        assert_eq!(OUTCOME_COUNT, Placement::COUNT);
    }

    #[test]
    fn test_outcome_indices() {
        for (i, outcome) in Outcome::iter().enumerate() {
            assert_eq!(outcome.index(), i);
        }
    }

    #[test]
    fn test_placement_tie_break_order() {
        assert!(Placement::Left < Placement::Right);
        assert!(Placement::Right < Placement::Aside);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Outcome::LeftHeavier.to_string(), "Left");
        assert_eq!(Outcome::Balances.to_string(), "Balanced");
        assert_eq!(Placement::Aside.to_string(), "Aside");
    }
}
