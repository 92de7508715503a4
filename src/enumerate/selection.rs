// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Stepping operations on pan selections.
//!
//! A *selection* assigns to each part of a partition the number of its coins
//! placed in one pan. Selections of a fixed total are visited in
//! lexicographically decreasing order. The operations here are shared by the
//! left pan (capped by the part sizes) and the right pan (capped by the coins
//! the left pan did not take, and additionally required to be
//! lexicographically no greater than the left selection so that pan-swapped
//! duplicates are never produced).

/// Place `count` coins greedily from part `from` onwards, making the
/// lexicographically largest selection with the given per-part caps.
///
/// Entries before `from` are left untouched; entries from `from` on are
/// overwritten. Returns false if the caps cannot absorb `count` coins.
pub(crate) fn fill(caps: &[u8], count: u8, from: usize, selection: &mut [u8]) -> bool {
    let mut remaining = count;
    for index in from..selection.len() {
        let take = remaining.min(caps[index]);
        selection[index] = take;
        remaining -= take;
    }
    remaining == 0
}

/// Step `selection` to the lexicographically next smaller selection with the
/// same total, or return false if it was the smallest.
///
/// The step decrements the latest position that can spare a coin to the
/// parts after it, then refills those parts greedily.
pub(crate) fn next_smaller(selection: &mut [u8], caps: &[u8]) -> bool {
    let mut moved: u16 = 0;
    let mut capacity: u16 = 0;
    for index in (0..selection.len()).rev() {
        if selection[index] > 0 && moved + 1 <= capacity {
            selection[index] -= 1;
            let filled = fill(caps, (moved + 1) as u8, index + 1, selection);
            debug_assert!(filled);
            return true;
        }
        moved += u16::from(selection[index]);
        capacity += u16::from(caps[index]);
    }
    false
}

/// The lexicographically largest right-pan selection for a given left-pan
/// selection, or None if no valid right selection exists.
///
/// A valid right selection `y` satisfies `y[i] <= parts[i] - left[i]` for
/// every part, sums to the left pan's total, and is lexicographically no
/// greater than `left`. Candidates are tried by the position at which `y`
/// first drops below `left`; a longer matching prefix is always
/// lexicographically larger, so the first feasible candidate is maximal.
pub(crate) fn max_right(left: &[u8], parts: &[u8]) -> Option<Vec<u8>> {
    let len = left.len();
    let total: u16 = left.iter().map(|&v| u16::from(v)).sum();
    let caps: Vec<u8> = parts.iter().zip(left).map(|(&p, &x)| p - x).collect();

    // Capacity of the parts from each index to the end.
    let mut cap_suffix = vec![0u16; len + 1];
    for index in (0..len).rev() {
        cap_suffix[index] = cap_suffix[index + 1] + u16::from(caps[index]);
    }

    // Longest prefix on which y can equal left.
    let mut max_equal = 0;
    while max_equal < len && left[max_equal] <= caps[max_equal] {
        max_equal += 1;
    }
    if max_equal == len {
        // The identical selection fits; it is the symmetric weighing.
        return Some(left.to_vec());
    }

    // Try break positions from max_equal downwards. At the break position y
    // must be strictly below left; after it, coins are placed greedily.
    let mut prefix: u16 = left[..max_equal].iter().map(|&v| u16::from(v)).sum();
    let mut at = max_equal;
    loop {
        if left[at] > 0 {
            let available = total - prefix;
            let mut take = u16::from((left[at] - 1).min(caps[at]));
            if take > available {
                take = available;
            }
            let rest = available - take;
            if rest <= cap_suffix[at + 1] {
                let mut selection = vec![0u8; len];
                selection[..at].copy_from_slice(&left[..at]);
                selection[at] = take as u8;
                let filled = fill(&caps, rest as u8, at + 1, &mut selection);
                debug_assert!(filled);
                return Some(selection);
            }
        }
        if at == 0 {
            return None;
        }
        at -= 1;
        prefix -= u16::from(left[at]);
    }
}
