// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! A weighing, recorded as the provenance of the parts it produces.
//!
//! Listing which coins go into which pan turned out to be less useful than
//! recording, for each part of the *output* partition, which input part it
//! was taken from and where that part's coins were placed. A weighing is
//! therefore a vector with one [`PartSource`] entry per output part.
//!
//! A weighing only makes sense alongside its input and output partitions:
//! the provenance alone does not say how many coins each output part holds.
//! The same provenance vector can describe weighings of several partitions,
//! which is why weighings are interned independently of partitions.

use crate::coins::partition::Partition;
use crate::coins::placement::Placement;

/// Origin of one output part: the input part it refines and the pan (or the
/// bench) its coins were placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartSource {
    /// Index of the input part whose coins form this output part.
    pub part: u8,
    /// Where those coins were placed during the weighing.
    pub placement: Placement,
}

/// Immutable weighing of a partition.
///
/// Invariants, relative to the input partition `P_in` and the output
/// partition `P_out` it was generated with:
/// - every `part` index is within `P_in`;
/// - each input part contributes at most one output part per placement;
/// - the output part sizes grouped by input part sum to the input part size;
/// - the left and right pans hold the same positive number of coins;
/// - output parts are listed in non-decreasing size order, ties broken by
///   `(part, placement)` ascending.
///
/// These are established by the enumerator and can be re-checked with
/// [`Weighing::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weighing {
    provenance: Vec<PartSource>,
}

impl Weighing {
    /// Create a weighing from a provenance vector.
    ///
    /// # Panics
    ///
    /// Panics if `provenance` is empty.
    pub fn new(provenance: Vec<PartSource>) -> Self {
        assert!(!provenance.is_empty(), "weighing must produce parts");
        Self { provenance }
    }

    /// Number of output parts this weighing produces.
    pub fn len(&self) -> usize {
        self.provenance.len()
    }

    /// A weighing always produces at least one part.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Provenance of output part `index`.
    pub fn source(&self, index: usize) -> PartSource {
        self.provenance[index]
    }

    /// Iterate over the provenance entries in output order.
    pub fn sources(&self) -> impl Iterator<Item = PartSource> + '_ {
        self.provenance.iter().copied()
    }

    /// Per-input-part pan selections `(left, right)` implied by this
    /// weighing and its output partition.
    ///
    /// `left[i]` / `right[i]` is the number of coins input part `i`
    /// contributed to each pan.
    ///
    /// # Panics
    ///
    /// Panics if `output` does not have one part per provenance entry.
    pub fn pan_selections(&self, output: &Partition, input_len: usize) -> (Vec<u8>, Vec<u8>) {
        assert_eq!(output.len(), self.provenance.len());
        let mut left = vec![0u8; input_len];
        let mut right = vec![0u8; input_len];
        for (index, source) in self.provenance.iter().enumerate() {
            match source.placement {
                Placement::Left => left[source.part as usize] += output[index],
                Placement::Right => right[source.part as usize] += output[index],
                Placement::Aside => {}
            }
        }
        (left, right)
    }

    /// Whether swapping the pans yields this same weighing.
    ///
    /// With the provenance representation that holds exactly when every input
    /// part contributes the same number of coins to each pan. The two heavier
    /// outcomes of a symmetric weighing are mirror images, so the search only
    /// explores one of them.
    pub fn is_symmetric(&self, output: &Partition) -> bool {
        let input_len = self
            .provenance
            .iter()
            .map(|s| s.part as usize + 1)
            .max()
            .unwrap_or(0);
        let (left, right) = self.pan_selections(output, input_len);
        left == right
    }

    /// Re-check the invariants of this weighing against its partitions.
    pub fn is_well_formed(&self, input: &Partition, output: &Partition) -> bool {
        if output.len() != self.provenance.len() {
            return false;
        }
        // Conservation and at most one output part per (part, placement).
        let mut totals = vec![0u16; input.len()];
        let mut seen: Vec<(u8, Placement)> = Vec::with_capacity(self.provenance.len());
        for (index, source) in self.provenance.iter().enumerate() {
            if source.part as usize >= input.len() {
                return false;
            }
            if seen.contains(&(source.part, source.placement)) {
                return false;
            }
            seen.push((source.part, source.placement));
            totals[source.part as usize] += u16::from(output[index]);
        }
        for (i, &total) in totals.iter().enumerate() {
            if total != u16::from(input[i]) {
                return false;
            }
        }
        // Balanced, non-empty pans.
        let (left, right) = self.pan_selections(output, input.len());
        let left_total: u16 = left.iter().map(|&v| u16::from(v)).sum();
        let right_total: u16 = right.iter().map(|&v| u16::from(v)).sum();
        if left_total != right_total || left_total == 0 {
            return false;
        }
        // Canonical output order: size, then input part, then placement.
        let key = |index: usize| {
            let source = self.provenance[index];
            (output[index], source.part, source.placement)
        };
        (1..self.provenance.len()).all(|index| key(index - 1) <= key(index))
    }
}
