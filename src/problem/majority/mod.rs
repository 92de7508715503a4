// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The MAJORITY problem.
//!
//! There are `c` coins, `c` odd. Every coin is one of two varieties, H
//! (slightly heavier) or L (slightly lighter), and the goal is to determine
//! by weighing which variety holds the majority.
//!
//! What is known after a sequence of weighings is captured by the set of
//! *distributions* still consistent with the observed outcomes: for each
//! part of the current partition, the number of H coins it might hold. The
//! problem is decided once every surviving distribution agrees on which
//! variety predominates.
//!
//! By default the instance is *almost balanced*: the minority variety is
//! known to have exactly one coin fewer than the majority. This is the
//! hardest split to decide, yet the extra knowledge shrinks the root state,
//! so it is both the interesting case and the cheaper one.

pub mod canonical;
pub mod splitter;

use std::collections::BTreeSet;
use std::io;

use thiserror::Error;

use crate::cache::{Cache, PartitionId, WeighingId};
use crate::coins::{Outcome, OutcomeArray, Placement};
use crate::problem::{Problem, SearchState};
use crate::report::Report;
use canonical::canonical_state;
use splitter::Splitter;

/// How aggressively parts are joined while canonicalizing a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStrategy {
    /// Keep the output partition as the weighing produced it.
    None,
    /// Join parts whose coins are known to be all of one variety.
    #[default]
    SameVariety,
    /// Join any pair of parts whose merge loses no information.
    All,
    /// Run both of the above, warn when they differ, keep `SameVariety`.
    Validate,
}

/// A problem instance was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProblemSetupError {
    #[error("coin count must be odd, got {0}")]
    EvenCoinCount(u8),
    #[error("coin count must be at least 3, got {0}")]
    TooFewCoins(u8),
}

/// What is known about the coins after some weighings: the partition and the
/// set of H-coin distributions over its parts still consistent with every
/// observed outcome.
///
/// States produced by [`MajorityProblem::apply_weighing`] are canonical:
/// rows are sorted and deduplicated, columns canonically ordered, and the
/// varieties oriented; equivalent information compares equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorityState {
    /// Interned partition the distributions refer to. This is not always
    /// the output partition of the last weighing: joined parts coarsen it.
    pub partition: PartitionId,
    /// Sorted, deduplicated distribution rows, one H count per part.
    pub distributions: Vec<Vec<u8>>,
}

impl SearchState for MajorityState {
    fn partition(&self) -> PartitionId {
        self.partition
    }
}

/// Default budget for the column-tie permutation search.
pub const DEFAULT_PERMUTATION_BUDGET: usize = 5040;

/// Determine which of two coin varieties is in the majority.
#[derive(Debug)]
pub struct MajorityProblem {
    coin_count: u8,
    /// Fewest H coins any distribution may contain.
    minimum_count: u8,
    /// Most H coins any distribution may contain.
    maximum_count: u8,
    /// A variety with this many coins is the majority.
    threshold: u8,
    join_strategy: JoinStrategy,
    permutation_budget: usize,
    /// Largest number of tie permutations examined for one state so far.
    permutation_peak: usize,
}

impl MajorityProblem {
    /// Create an instance for `coin_count` coins.
    ///
    /// With `almost_balanced` the variety counts are known to differ by
    /// exactly one; otherwise any split with at least one coin of each
    /// variety is possible.
    pub fn new(coin_count: u8, almost_balanced: bool) -> Result<Self, ProblemSetupError> {
        if coin_count % 2 == 0 {
            return Err(ProblemSetupError::EvenCoinCount(coin_count));
        }
        if coin_count < 3 {
            return Err(ProblemSetupError::TooFewCoins(coin_count));
        }
        let threshold = (coin_count + 1) / 2;
        let (minimum_count, maximum_count) = if almost_balanced {
            (threshold - 1, threshold)
        } else {
            (1, coin_count - 1)
        };
        Ok(Self {
            coin_count,
            minimum_count,
            maximum_count,
            threshold,
            join_strategy: JoinStrategy::default(),
            permutation_budget: DEFAULT_PERMUTATION_BUDGET,
            permutation_peak: 0,
        })
    }

    /// Select the part-joining strategy.
    pub fn with_join_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.join_strategy = strategy;
        self
    }

    /// Override the column-tie permutation budget.
    pub fn with_permutation_budget(mut self, budget: usize) -> Self {
        assert!(budget >= 1, "at least the identity must be examined");
        self.permutation_budget = budget;
        self
    }

    /// Number of coins in this instance.
    pub fn coin_count(&self) -> u8 {
        self.coin_count
    }

    /// Largest number of tie permutations examined for a single state.
    pub fn permutation_peak(&self) -> usize {
        self.permutation_peak
    }

    /// Whether H predominates in one distribution.
    fn is_majority(&self, distribution: &[u8]) -> bool {
        let mut heavy = 0u8;
        for &count in distribution {
            heavy += count;
            if heavy >= self.threshold {
                return true;
            }
        }
        false
    }
}

impl Problem for MajorityProblem {
    type State = MajorityState;

    fn make_root(&self, cache: &mut Cache) -> MajorityState {
        let partition = cache.root_partition(self.coin_count);
        let distributions = (self.minimum_count..=self.maximum_count)
            .map(|heavy| vec![heavy])
            .collect();
        MajorityState {
            partition,
            distributions,
        }
    }

    fn apply_weighing(
        &mut self,
        cache: &mut Cache,
        state: &MajorityState,
        weighing: WeighingId,
        output: PartitionId,
    ) -> OutcomeArray<Option<MajorityState>> {
        let weighing = cache.weighing(weighing).clone();
        let output_partition = cache.partition(output).clone();
        let input_len = cache.partition(state.partition).len();
        let output_len = output_partition.len();

        // Output chunks of each input part, in output order.
        let mut chunks: Vec<Vec<usize>> = vec![Vec::new(); input_len];
        for index in 0..output_len {
            chunks[weighing.source(index).part as usize].push(index);
        }

        // Split every distribution over the chunks and sort the results by
        // the outcome they would be observed under.
        let mut buckets: [BTreeSet<Vec<u8>>; 3] = Default::default();
        let mut divided = vec![0u8; output_len];
        for distribution in &state.distributions {
            debug_assert_eq!(distribution.len(), input_len);
            let mut splitters: Vec<Splitter> = Vec::with_capacity(input_len);
            for (part, indices) in chunks.iter().enumerate() {
                let caps: Vec<u8> = indices.iter().map(|&j| output_partition[j]).collect();
                let splitter = Splitter::new(distribution[part], &caps)
                    .expect("distribution exceeds its part");
                splitters.push(splitter);
            }
            'division: loop {
                for (part, splitter) in splitters.iter().enumerate() {
                    let values = splitter.current();
                    for (offset, &index) in chunks[part].iter().enumerate() {
                        divided[index] = values[offset];
                    }
                }
                let mut left_heavy = 0u16;
                let mut right_heavy = 0u16;
                for (index, &value) in divided.iter().enumerate() {
                    match weighing.source(index).placement {
                        Placement::Left => left_heavy += u16::from(value),
                        Placement::Right => right_heavy += u16::from(value),
                        Placement::Aside => {}
                    }
                }
                let outcome = match left_heavy.cmp(&right_heavy) {
                    std::cmp::Ordering::Greater => Outcome::LeftHeavier,
                    std::cmp::Ordering::Less => Outcome::RightHeavier,
                    std::cmp::Ordering::Equal => Outcome::Balances,
                };
                buckets[outcome.index()].insert(divided.clone());

                let mut part = splitters.len();
                loop {
                    if part == 0 {
                        break 'division;
                    }
                    part -= 1;
                    if splitters[part].advance() {
                        break;
                    }
                    splitters[part].reset();
                }
            }
        }
        assert!(
            buckets.iter().any(|bucket| !bucket.is_empty()),
            "state has no consistent outcome for a weighing"
        );

        let mut states: OutcomeArray<Option<MajorityState>> = [None, None, None];
        for (index, bucket) in buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let rows: Vec<Vec<u8>> = bucket.iter().cloned().collect();
            let (canonical, examined) = canonical_state(
                cache,
                output_partition.parts(),
                rows,
                self.join_strategy,
                self.permutation_budget,
            );
            if examined > self.permutation_peak {
                self.permutation_peak = examined;
            }
            states[index] = Some(canonical);
        }
        states
    }

    fn is_solved(&self, state: &MajorityState) -> bool {
        let mut verdict: Option<bool> = None;
        for distribution in &state.distributions {
            let majority = self.is_majority(distribution);
            match verdict {
                None => verdict = Some(majority),
                Some(previous) if previous != majority => return false,
                Some(_) => {}
            }
        }
        true
    }

    fn write_description<W: io::Write>(&self, out: &mut Report<W>) -> io::Result<()> {
        out.line(&format!(
            "Find the majority variety among {} coins; H count within {}..={}",
            self.coin_count, self.minimum_count, self.maximum_count
        ))
    }

    fn write_state<W: io::Write>(
        &self,
        out: &mut Report<W>,
        state: &MajorityState,
    ) -> io::Result<()> {
        let rows: Vec<String> = state
            .distributions
            .iter()
            .map(|d| format!("{:?}", d))
            .collect();
        out.line(&format!(
            "distributions[{}]: {}",
            rows.len(),
            rows.join(" ")
        ))
    }

    fn write_solved<W: io::Write>(
        &self,
        out: &mut Report<W>,
        state: &MajorityState,
    ) -> io::Result<()> {
        let majority = state
            .distributions
            .first()
            .map(|d| self.is_majority(d))
            .unwrap_or(false);
        out.line(if majority {
            "solved: H is the majority"
        } else {
            "solved: L is the majority"
        })
    }

    fn write_ambiguous<W: io::Write>(
        &self,
        out: &mut Report<W>,
        state: &MajorityState,
    ) -> io::Result<()> {
        out.line(&format!(
            "unresolved: {} distributions remain",
            state.distributions.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(coin_count: u8) -> MajorityProblem {
        MajorityProblem::new(coin_count, true).unwrap()
    }

    #[test]
    fn test_rejects_even_and_tiny_instances() {
        assert_eq!(
            MajorityProblem::new(4, true).err(),
            Some(ProblemSetupError::EvenCoinCount(4))
        );
        assert_eq!(
            MajorityProblem::new(1, true).err(),
            Some(ProblemSetupError::TooFewCoins(1))
        );
    }

    #[test]
    fn test_root_of_almost_balanced_instance() {
        let mut cache = Cache::new();
        let root = problem(7).make_root(&mut cache);
        assert_eq!(cache.partition(root.partition).parts(), &[7]);
        assert_eq!(root.distributions, vec![vec![3], vec![4]]);
    }

    #[test]
    fn test_root_of_unconstrained_instance() {
        let mut cache = Cache::new();
        let root = MajorityProblem::new(5, false).unwrap().make_root(&mut cache);
        assert_eq!(
            root.distributions,
            vec![vec![1], vec![2], vec![3], vec![4]]
        );
    }

    #[test]
    fn test_is_solved() {
        let mut cache = Cache::new();
        let p = problem(3);
        let partition = cache.root_partition(3);
        let solved = MajorityState {
            partition,
            distributions: vec![vec![2], vec![3]],
        };
        assert!(p.is_solved(&solved));
        let open = MajorityState {
            partition,
            distributions: vec![vec![1], vec![2]],
        };
        assert!(!p.is_solved(&open));
    }

    /// Apply the single weighing of three coins to the root state and check
    /// the outcome states against first principles.
    #[test]
    fn test_apply_weighing_three_coins() {
        let mut cache = Cache::new();
        let mut p = problem(3);
        let root = p.make_root(&mut cache);
        let options = cache.children(root.partition).to_vec();
        assert_eq!(options.len(), 1);
        let outcomes = p.apply_weighing(
            &mut cache,
            &root,
            options[0].weighing,
            options[0].output,
        );

        // The weighing is symmetric, so both heavier outcomes canonicalize
        // to the same state.
        let left = outcomes[Outcome::LeftHeavier.index()].as_ref().unwrap();
        let right = outcomes[Outcome::RightHeavier.index()].as_ref().unwrap();
        assert_eq!(left, right);

        // Left heavier: the left coin is H, the right coin is L, the aside
        // coin is open; one more weighing decides.
        assert_eq!(left.distributions.len(), 2);
        assert!(!p.is_solved(left));

        // Balanced: the weighed coins match, so the aside coin casts the
        // deciding vote; still one more weighing.
        let balanced = outcomes[Outcome::Balances.index()].as_ref().unwrap();
        assert!(!p.is_solved(balanced));
    }

    #[test]
    fn test_apply_weighing_is_deterministic_and_interned() {
        let mut cache = Cache::new();
        let mut p = problem(5);
        let root = p.make_root(&mut cache);
        let options = cache.children(root.partition).to_vec();
        let first = p.apply_weighing(&mut cache, &root, options[0].weighing, options[0].output);
        let second = p.apply_weighing(&mut cache, &root, options[0].weighing, options[0].output);
        assert_eq!(first, second);
        // Interned partitions agree by id, not just by value.
        for (a, b) in first.iter().zip(&second) {
            if let (Some(a), Some(b)) = (a, b) {
                assert_eq!(a.partition, b.partition);
            }
        }
    }

    #[test]
    fn test_symmetric_weighings_collapse_heavier_outcomes() {
        let mut cache = Cache::new();
        let mut p = problem(5);
        let root = p.make_root(&mut cache);
        for option in cache.children(root.partition).to_vec() {
            if !option.symmetric {
                continue;
            }
            let outcomes =
                p.apply_weighing(&mut cache, &root, option.weighing, option.output);
            assert_eq!(
                outcomes[Outcome::LeftHeavier.index()],
                outcomes[Outcome::RightHeavier.index()]
            );
        }
    }
}
