// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Reduction of a distribution set to its canonical representative.
//!
//! Many different weighing histories lead to states that are equivalent up
//! to relabelling: swapping the two varieties, permuting parts of equal
//! size, or keeping parts separate whose coins can no longer be told apart.
//! Solving one member of an equivalence class solves them all, so every
//! outcome state is reduced to a single representative before the engine
//! interns it. The reduction is what makes the larger instances feasible.
//!
//! The steps, in order:
//! 1. join parts (per [`JoinStrategy`]);
//! 2. swap varieties so the heavy variety is the more numerous one over the
//!    distribution set (sum of squares breaks ties);
//! 3. order columns by part size, then by the sorted multiset of the
//!    column's values, resolving exact ties by searching the permutations
//!    inside tie groups for the lexicographically smallest distribution
//!    set (budgeted);
//! 4. sort and deduplicate the rows.
//!
//! The reduction is a fixed point: canonicalizing a canonical state changes
//! nothing.

use tracing::warn;

use super::{JoinStrategy, MajorityState};
use crate::cache::Cache;
use crate::coins::Partition;

/// Canonicalize `(parts, distributions)` and intern the resulting partition.
///
/// Returns the canonical state and the number of column permutations that
/// were examined while resolving ties (0 when there were none).
pub(crate) fn canonical_state(
    cache: &mut Cache,
    parts: &[u8],
    distributions: Vec<Vec<u8>>,
    strategy: JoinStrategy,
    permutation_budget: usize,
) -> (MajorityState, usize) {
    debug_assert!(!distributions.is_empty());
    debug_assert!(distributions
        .iter()
        .all(|d| d.len() == parts.len() && d.iter().zip(parts).all(|(&h, &p)| h <= p)));

    let mut parts = parts.to_vec();
    let mut distributions = distributions;
    match strategy {
        JoinStrategy::None => {}
        JoinStrategy::SameVariety => join_same_variety(&mut parts, &mut distributions),
        JoinStrategy::All => join_all(&mut parts, &mut distributions),
        JoinStrategy::Validate => {
            let mut parts_all = parts.clone();
            let mut distributions_all = distributions.clone();
            join_all(&mut parts_all, &mut distributions_all);
            join_same_variety(&mut parts, &mut distributions);
            if parts_all.len() < parts.len() {
                warn!(
                    same_variety_parts = parts.len(),
                    all_parts = parts_all.len(),
                    "join_all produced a strictly coarser partition"
                );
            }
        }
    }
    swap_varieties_if_lighter(&parts, &mut distributions);
    let searched = sort_columns(&mut parts, &mut distributions, permutation_budget);
    distributions.sort_unstable();
    distributions.dedup();

    let partition = cache.intern_partition(Partition::new(parts));
    (
        MajorityState {
            partition,
            distributions,
        },
        searched,
    )
}

/// Merge all parts known to be entirely light into one part, and likewise
/// all parts known to be entirely heavy.
///
/// A column that is zero in every distribution holds only light coins; one
/// that is full in every distribution holds only heavy coins. Coins of one
/// variety are indistinguishable, so such parts carry no more information
/// apart than together.
pub(crate) fn join_same_variety(parts: &mut Vec<u8>, distributions: &mut Vec<Vec<u8>>) {
    let len = parts.len();
    let mut zeros: Vec<usize> = Vec::new();
    let mut fulls: Vec<usize> = Vec::new();
    for column in 0..len {
        if distributions.iter().all(|d| d[column] == 0) {
            zeros.push(column);
        } else if distributions.iter().all(|d| d[column] == parts[column]) {
            fulls.push(column);
        }
    }
    if zeros.len() < 2 && fulls.len() < 2 {
        return;
    }
    let merged: Vec<&[usize]> = [&zeros, &fulls]
        .into_iter()
        .filter(|group| group.len() >= 2)
        .map(|group| group.as_slice())
        .collect();
    let in_merge = |column: usize| merged.iter().any(|group| group.contains(&column));

    let mut new_parts: Vec<u8> = (0..len).filter(|&c| !in_merge(c)).map(|c| parts[c]).collect();
    for group in &merged {
        new_parts.push(group.iter().map(|&c| parts[c]).sum());
    }
    let mut new_distributions: Vec<Vec<u8>> = distributions
        .iter()
        .map(|d| {
            let mut row: Vec<u8> = (0..len).filter(|&c| !in_merge(c)).map(|c| d[c]).collect();
            for group in &merged {
                row.push(group.iter().map(|&c| d[c]).sum());
            }
            row
        })
        .collect();
    new_distributions.sort_unstable();
    new_distributions.dedup();
    *parts = new_parts;
    *distributions = new_distributions;
}

/// Merge any pair of parts whose merge loses no information, repeating until
/// no pair qualifies.
///
/// A merge is lossless when splitting the merged column back over the two
/// part sizes in every possible way regenerates exactly the original
/// distribution set.
pub(crate) fn join_all(parts: &mut Vec<u8>, distributions: &mut Vec<Vec<u8>>) {
    'merged: loop {
        let len = parts.len();
        for first in 0..len {
            for second in first + 1..len {
                if let Some((new_parts, new_distributions)) =
                    lossless_merge(parts, distributions, first, second)
                {
                    *parts = new_parts;
                    *distributions = new_distributions;
                    continue 'merged;
                }
            }
        }
        return;
    }
}

/// Merge columns `first` and `second` if doing so is lossless.
fn lossless_merge(
    parts: &[u8],
    distributions: &[Vec<u8>],
    first: usize,
    second: usize,
) -> Option<(Vec<u8>, Vec<Vec<u8>>)> {
    let size_first = parts[first];
    let size_second = parts[second];

    let drop_second = |row: &[u8], merged_value: u8| -> Vec<u8> {
        let mut out = Vec::with_capacity(row.len() - 1);
        for (column, &value) in row.iter().enumerate() {
            if column == second {
                continue;
            }
            out.push(if column == first { merged_value } else { value });
        }
        out
    };

    let mut merged: Vec<Vec<u8>> = distributions
        .iter()
        .map(|d| drop_second(d, d[first] + d[second]))
        .collect();
    merged.sort_unstable();
    merged.dedup();

    // Expand each merged row back over the two original columns.
    let mut expanded: Vec<Vec<u8>> = Vec::new();
    for row in &merged {
        let combined = row[first];
        let low = combined.saturating_sub(size_second);
        let high = combined.min(size_first);
        for take in low..=high {
            let mut rebuilt = Vec::with_capacity(row.len() + 1);
            for (column, &value) in row.iter().enumerate() {
                if column == first {
                    rebuilt.push(take);
                } else {
                    rebuilt.push(value);
                }
                if rebuilt.len() == second {
                    rebuilt.push(combined - take);
                }
            }
            if rebuilt.len() == second {
                rebuilt.push(combined - take);
            }
            expanded.push(rebuilt);
        }
    }
    expanded.sort_unstable();
    expanded.dedup();

    let mut original: Vec<Vec<u8>> = distributions.to_vec();
    original.sort_unstable();
    original.dedup();
    if expanded != original {
        return None;
    }

    let new_parts = drop_second(parts, size_first + size_second);
    Some((new_parts, merged))
}

/// Swap the varieties when the light one predominates over the distribution
/// set, so mirror-image states become equal.
///
/// Returns whether a swap happened.
pub(crate) fn swap_varieties_if_lighter(parts: &[u8], distributions: &mut Vec<Vec<u8>>) -> bool {
    let rows = distributions.len() as u64;
    let coin_count: u64 = parts.iter().map(|&p| u64::from(p)).sum();
    let heavy: u64 = distributions
        .iter()
        .flat_map(|d| d.iter())
        .map(|&h| u64::from(h))
        .sum();
    let light = rows * coin_count - heavy;
    let swap = if heavy != light {
        heavy < light
    } else {
        let heavy_squares: u64 = distributions
            .iter()
            .flat_map(|d| d.iter())
            .map(|&h| u64::from(h) * u64::from(h))
            .sum();
        let light_squares: u64 = distributions
            .iter()
            .map(|d| {
                d.iter()
                    .zip(parts)
                    .map(|(&h, &p)| {
                        let l = u64::from(p - h);
                        l * l
                    })
                    .sum::<u64>()
            })
            .sum();
        heavy_squares < light_squares
    };
    if swap {
        for row in distributions.iter_mut() {
            for (value, &part) in row.iter_mut().zip(parts) {
                *value = part - *value;
            }
        }
    }
    swap
}

/// Order the columns canonically: by part size, then by the sorted multiset
/// of the column's values; exact ties are resolved by searching the
/// permutations within each tie group for the lexicographically smallest
/// distribution set, examining at most `budget` candidates.
///
/// Returns the number of candidates examined (0 when no ties).
pub(crate) fn sort_columns(
    parts: &mut Vec<u8>,
    distributions: &mut Vec<Vec<u8>>,
    budget: usize,
) -> usize {
    let len = parts.len();
    let key = |column: usize, parts: &[u8], distributions: &[Vec<u8>]| {
        let mut values: Vec<u8> = distributions.iter().map(|d| d[column]).collect();
        values.sort_unstable();
        (parts[column], values)
    };
    let keys: Vec<(u8, Vec<u8>)> = (0..len).map(|c| key(c, parts, distributions)).collect();
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let reordered_parts: Vec<u8> = order.iter().map(|&c| parts[c]).collect();
    let reordered_rows: Vec<Vec<u8>> = distributions
        .iter()
        .map(|d| order.iter().map(|&c| d[c]).collect())
        .collect();
    *parts = reordered_parts;
    *distributions = reordered_rows;
    let keys: Vec<&(u8, Vec<u8>)> = order.iter().map(|&c| &keys[c]).collect();

    // Runs of columns with identical keys.
    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for column in 1..=len {
        if column == len || keys[column] != keys[start] {
            if column - start >= 2 {
                groups.push((start, column));
            }
            start = column;
        }
    }
    if groups.is_empty() {
        return 0;
    }

    // Candidate permutations per tie group, in lexicographic order so the
    // identity comes first.
    let group_permutations: Vec<Vec<Vec<usize>>> = groups
        .iter()
        .map(|&(from, to)| permutations(&(from..to).collect::<Vec<usize>>(), budget))
        .collect();

    let mut best: Option<Vec<Vec<u8>>> = None;
    let mut examined = 0usize;
    let mut choice = vec![0usize; groups.len()];
    'candidates: loop {
        let mut permutation: Vec<usize> = (0..len).collect();
        for (group, &(from, _)) in groups.iter().enumerate() {
            for (offset, &source) in group_permutations[group][choice[group]].iter().enumerate() {
                permutation[from + offset] = source;
            }
        }
        let mut candidate: Vec<Vec<u8>> = distributions
            .iter()
            .map(|d| permutation.iter().map(|&c| d[c]).collect())
            .collect();
        candidate.sort_unstable();
        candidate.dedup();
        if best.as_ref().map_or(true, |b| candidate < *b) {
            best = Some(candidate);
        }
        examined += 1;
        if examined >= budget {
            break;
        }
        // Odometer over the per-group choices.
        let mut group = groups.len();
        loop {
            if group == 0 {
                break 'candidates;
            }
            group -= 1;
            choice[group] += 1;
            if choice[group] < group_permutations[group].len() {
                break;
            }
            choice[group] = 0;
        }
    }
    *distributions = best.expect("at least the identity candidate was examined");
    examined
}

/// Permutations of `positions` in lexicographic order, at most `cap` of
/// them.
fn permutations(positions: &[usize], cap: usize) -> Vec<Vec<usize>> {
    let mut current = positions.to_vec();
    let mut out = vec![current.clone()];
    while out.len() < cap && next_permutation(&mut current) {
        out.push(current.clone());
    }
    out
}

/// Step to the lexicographically next permutation; false after the last.
fn next_permutation(values: &mut [usize]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let mut pivot = values.len() - 1;
    while pivot > 0 && values[pivot - 1] >= values[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }
    let mut swap_with = values.len() - 1;
    while values[swap_with] <= values[pivot - 1] {
        swap_with -= 1;
    }
    values.swap(pivot - 1, swap_with);
    values[pivot..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(rows: &[&[u8]]) -> Vec<Vec<u8>> {
        rows.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_join_same_variety_merges_constant_columns() {
        // Columns 0 and 1 are zero in every row: two all-light parts.
        let mut parts = vec![1, 1, 1];
        let mut distributions = rows(&[&[0, 0, 0], &[0, 0, 1]]);
        join_same_variety(&mut parts, &mut distributions);
        assert_eq!(parts, vec![1, 2]);
        assert_eq!(distributions, rows(&[&[0, 0], &[1, 0]]));
    }

    #[test]
    fn test_join_same_variety_keeps_distinct_varieties_apart() {
        // Column 0 all light, column 1 all heavy: no group of two.
        let mut parts = vec![1, 1, 1];
        let mut distributions = rows(&[&[0, 1, 0], &[0, 1, 1]]);
        join_same_variety(&mut parts, &mut distributions);
        assert_eq!(parts, vec![1, 1, 1]);
    }

    #[test]
    fn test_join_all_merges_freely_mixing_columns() {
        // One heavy coin anywhere in two singleton parts: merging them and
        // re-splitting regenerates exactly the same rows.
        let mut parts = vec![1, 1];
        let mut distributions = rows(&[&[0, 1], &[1, 0]]);
        join_all(&mut parts, &mut distributions);
        assert_eq!(parts, vec![2]);
        assert_eq!(distributions, rows(&[&[1]]));
    }

    #[test]
    fn test_join_all_refuses_lossy_merge() {
        // Rows are correlated: merging would invent [1, 1] split as [2, 0].
        let mut parts = vec![2, 2];
        let mut distributions = rows(&[&[2, 0], &[0, 2]]);
        join_all(&mut parts, &mut distributions);
        assert_eq!(parts, vec![2, 2]);
    }

    #[test]
    fn test_swap_when_light_predominates() {
        let mut distributions = rows(&[&[0], &[1]]);
        assert!(swap_varieties_if_lighter(&[3], &mut distributions));
        assert_eq!(distributions, rows(&[&[3], &[2]]));
    }

    #[test]
    fn test_no_swap_on_balanced_tie() {
        // h-total and l-total tie, and the square sums tie as well.
        let mut distributions = rows(&[&[1], &[2]]);
        assert!(!swap_varieties_if_lighter(&[3], &mut distributions));
        assert_eq!(distributions, rows(&[&[1], &[2]]));
    }

    #[test]
    fn test_sort_columns_orders_by_value_multiset() {
        let mut parts = vec![1, 1, 1];
        let mut distributions = rows(&[&[1, 1, 0]]);
        let examined = sort_columns(&mut parts, &mut distributions, 5040);
        assert_eq!(parts, vec![1, 1, 1]);
        assert_eq!(distributions, rows(&[&[0, 1, 1]]));
        // Columns 1 and 2 tie exactly; both permutations were examined.
        assert_eq!(examined, 2);
    }

    #[test]
    fn test_sort_columns_respects_part_size_first() {
        // The size-2 part stays after the size-1 parts whatever its values.
        let mut parts = vec![1, 1, 2];
        let mut distributions = rows(&[&[1, 0, 0], &[1, 0, 2]]);
        sort_columns(&mut parts, &mut distributions, 5040);
        assert_eq!(parts, vec![1, 1, 2]);
        assert_eq!(distributions, rows(&[&[0, 1, 0], &[0, 1, 2]]));
    }

    #[test]
    fn test_sort_columns_budget_is_respected() {
        // Two tie groups of two columns allow four candidates; the budget
        // stops the search early but still returns a candidate.
        let mut parts = vec![1, 1, 1, 1];
        let mut distributions = rows(&[&[1, 0, 0, 0], &[0, 1, 0, 0]]);
        let examined = sort_columns(&mut parts, &mut distributions, 3);
        assert_eq!(examined, 3);
        assert_eq!(distributions.len(), 2);
    }

    #[test]
    fn test_next_permutation_walks_all() {
        let mut values = vec![0, 1, 2];
        let mut count = 1;
        while next_permutation(&mut values) {
            count += 1;
        }
        assert_eq!(count, 6);
        assert_eq!(values, vec![0, 1, 2].iter().rev().copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_canonical_state_is_idempotent() {
        let mut cache = Cache::new();
        let parts = vec![1, 1, 1, 2];
        let distributions = rows(&[&[1, 0, 0, 1], &[0, 1, 0, 2], &[0, 0, 1, 1]]);
        let (first, _) = canonical_state(
            &mut cache,
            &parts,
            distributions,
            JoinStrategy::SameVariety,
            5040,
        );
        let first_parts = cache.partition(first.partition).parts().to_vec();
        let (second, _) = canonical_state(
            &mut cache,
            &first_parts,
            first.distributions.clone(),
            JoinStrategy::SameVariety,
            5040,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonical_state_identifies_mirror_states() {
        // Two states equal up to swapping varieties reduce to one
        // representative.
        let mut cache = Cache::new();
        let parts = vec![1, 2];
        let (a, _) = canonical_state(
            &mut cache,
            &parts,
            rows(&[&[1, 2], &[0, 2]]),
            JoinStrategy::SameVariety,
            5040,
        );
        let (b, _) = canonical_state(
            &mut cache,
            &parts,
            rows(&[&[0, 0], &[1, 0]]),
            JoinStrategy::SameVariety,
            5040,
        );
        assert_eq!(a, b);
    }
}
