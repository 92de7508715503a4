// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration of the distinct weighings of a partition.
//!
//! Weighings are produced in a fixed order:
//!
//! 1. by the number of coins per pan, `N = 1, 2, ..., ⌊c/2⌋`;
//! 2. within one `N`, by the left-pan selection, lexicographically
//!    decreasing;
//! 3. within one left selection, by the right-pan selection,
//!    lexicographically decreasing, restricted to selections no greater than
//!    the left selection.
//!
//! Restriction 3 is what removes pan-swapped duplicates: of a weighing and
//! its mirror image exactly one has its larger selection on the left. The
//! only weighings fixed by the pan swap are those with identical selections,
//! which the generator marks as symmetric.
//!
/*
 Pruning at a fixed pan size N: once some left selection x admits no valid
 right selection, no lexicographically smaller left at that N does either,
 so the generator moves straight to N+1.

 Sketch: let Y(x) be the size of the largest right selection that respects
 both the capacity caps p_i - x_i and the lexicographic bound y <= x. A valid
 right selection exists iff Y(x) >= N. Write j for the first index with
 x_j > 0; the bound forces y_i = 0 before j. Three cases for the value of
 Y(x), by how the bound first binds:

   A. 2 x_j > p_j: capacity already forces y_j < x_j, so all later parts can
      be taken whole:       Y = p_j + sum_{i>j} p_i - N.
   B. 2 x_j <= p_j and every later part up to the first k with 2 x_k > p_k
      has 2 x_i = p_i:      Y = 2 x_j + sum_{i>j} p_i - N.
   C. otherwise (some later part has spare capacity on both sides): giving
      up one coin at j releases the bound early:
                            Y = 2 x_j - 1 + sum_{i>j} p_i - N.

 Stepping x to the next smaller selection leaves N fixed and either keeps j
 and decreases x_j (shrinking the B/C leading terms), moves between the
 cases in the order A -> B -> C (each bounded by the previous), or increases
 j (removing p_{j+1} from the sum, which at least cancels the case-A leading
 term). In every case Y does not increase, so once Y < N it stays below N
 for the rest of the pan size.
*/

pub mod selection;

use crate::coins::{PartSource, Partition, Placement};
use selection::{fill, max_right, next_smaller};

/// One weighing as produced by the generator, before interning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWeighing {
    /// Sizes of the output parts, in canonical order.
    pub parts: Vec<u8>,
    /// Provenance of each output part, aligned with `parts`.
    pub provenance: Vec<PartSource>,
    /// Per-input-part left pan selection.
    pub left: Vec<u8>,
    /// Per-input-part right pan selection.
    pub right: Vec<u8>,
    /// Whether the two selections are identical (pan swap fixes the
    /// weighing).
    pub symmetric: bool,
}

/// Generator of all distinct weighings of a partition, modulo pan swap.
///
/// The sequence is deterministic: enumerating the same partition twice
/// yields identical results in identical order.
pub struct WeighingGenerator {
    parts: Vec<u8>,
    coin_count: u8,
    left: Vec<u8>,
    right: Vec<u8>,
    done: bool,
}

impl WeighingGenerator {
    /// Start enumerating the weighings of `partition`.
    ///
    /// # Panics
    ///
    /// Panics if the partition has fewer than two coins; nothing can be
    /// weighed against nothing.
    pub fn new(partition: &Partition) -> Self {
        let coin_count = partition.coin_count();
        assert!(coin_count >= 2, "cannot weigh fewer than two coins");
        let parts = partition.parts().to_vec();
        let mut left = vec![0u8; parts.len()];
        let filled = fill(&parts, 1, 0, &mut left);
        debug_assert!(filled);
        let right = max_right(&left, &parts).expect("a one-coin weighing always exists");
        Self {
            parts,
            coin_count,
            left,
            right,
            done: false,
        }
    }

    /// Current number of coins in each pan.
    fn pan_count(&self) -> u8 {
        self.left.iter().sum()
    }

    /// Assemble the current selections into output parts and provenance.
    fn assemble(&self) -> RawWeighing {
        let mut items: Vec<(u8, u8, Placement)> = Vec::with_capacity(self.parts.len() * 2);
        for (index, &size) in self.parts.iter().enumerate() {
            let part = index as u8;
            let mut aside = size;
            if self.left[index] > 0 {
                items.push((self.left[index], part, Placement::Left));
                aside -= self.left[index];
            }
            if self.right[index] > 0 {
                items.push((self.right[index], part, Placement::Right));
                aside -= self.right[index];
            }
            if aside > 0 {
                items.push((aside, part, Placement::Aside));
            }
        }
        // Favour the size ordering of the output partition over the input
        // part number.
        items.sort_unstable();
        RawWeighing {
            parts: items.iter().map(|&(size, _, _)| size).collect(),
            provenance: items
                .iter()
                .map(|&(_, part, placement)| PartSource { part, placement })
                .collect(),
            left: self.left.clone(),
            right: self.right.clone(),
            symmetric: self.left == self.right,
        }
    }

    /// Advance to the next pair of selections, or mark the generator done.
    fn step(&mut self) {
        // Another right selection for the same left selection?
        let caps: Vec<u8> = self
            .parts
            .iter()
            .zip(&self.left)
            .map(|(&p, &x)| p - x)
            .collect();
        if next_smaller(&mut self.right, &caps) {
            return;
        }
        // Another left selection with the same pan count?
        if next_smaller(&mut self.left, &self.parts) {
            if let Some(right) = max_right(&self.left, &self.parts) {
                self.right = right;
                return;
            }
            // No right selection here means none for any smaller left
            // selection at this pan count either (see the module comment).
        }
        self.grow_pans();
    }

    /// Restart with one more coin per pan, or finish.
    fn grow_pans(&mut self) {
        let mut pan_count = self.pan_count();
        loop {
            pan_count += 1;
            if u16::from(pan_count) * 2 > u16::from(self.coin_count) {
                self.done = true;
                return;
            }
            let filled = fill(&self.parts, pan_count, 0, &mut self.left);
            debug_assert!(filled);
            if let Some(right) = max_right(&self.left, &self.parts) {
                self.right = right;
                return;
            }
        }
    }
}

impl Iterator for WeighingGenerator {
    type Item = RawWeighing;

    fn next(&mut self) -> Option<RawWeighing> {
        if self.done {
            return None;
        }
        let current = self.assemble();
        self.step();
        Some(current)
    }
}
