// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Division of one part's heavy coins among the parts a weighing splits it
//! into.
//!
//! A weighing splits each input part into one, two or three output parts.
//! Given the number of heavy coins the input part might hold, the splitter
//! enumerates every way to distribute them over the chunks without exceeding
//! any chunk's size. The three shapes are a tagged enum stepped in place, so
//! the hot loop of `apply_weighing` has no allocation and no dispatch.

/// Enumerator of the divisions of `total` heavy coins over up to three
/// chunks with fixed sizes.
///
/// Divisions are visited in lexicographically decreasing order of the chunk
/// values, starting from the greedy maximum.
#[derive(Debug, Clone)]
pub(crate) enum Splitter {
    One {
        value: u8,
    },
    Two {
        total: u8,
        caps: [u8; 2],
        first: u8,
    },
    Three {
        total: u8,
        caps: [u8; 3],
        first: u8,
        second: u8,
    },
}

impl Splitter {
    /// Start dividing `total` over chunks with the given sizes, or None when
    /// the chunks cannot hold that many coins.
    ///
    /// # Panics
    ///
    /// Panics unless `caps` has one, two or three entries.
    pub fn new(total: u8, caps: &[u8]) -> Option<Self> {
        match *caps {
            [a] => (total <= a).then_some(Splitter::One { value: total }),
            [a, b] => {
                if u16::from(total) > u16::from(a) + u16::from(b) {
                    return None;
                }
                Some(Splitter::Two {
                    total,
                    caps: [a, b],
                    first: total.min(a),
                })
            }
            [a, b, c] => {
                if u16::from(total) > u16::from(a) + u16::from(b) + u16::from(c) {
                    return None;
                }
                let first = total.min(a);
                let second = (total - first).min(b);
                Some(Splitter::Three {
                    total,
                    caps: [a, b, c],
                    first,
                    second,
                })
            }
            _ => panic!("a part splits into at most three chunks: {:?}", caps),
        }
    }

    /// Number of chunks this splitter fills.
    pub fn len(&self) -> usize {
        match self {
            Splitter::One { .. } => 1,
            Splitter::Two { .. } => 2,
            Splitter::Three { .. } => 3,
        }
    }

    /// The current division, valid in `values[..self.len()]`.
    pub fn current(&self) -> [u8; 3] {
        match *self {
            Splitter::One { value } => [value, 0, 0],
            Splitter::Two { total, first, .. } => [first, total - first, 0],
            Splitter::Three {
                total,
                first,
                second,
                ..
            } => [first, second, total - first - second],
        }
    }

    /// Step to the next division; false when exhausted.
    pub fn advance(&mut self) -> bool {
        match self {
            Splitter::One { .. } => false,
            Splitter::Two { total, caps, first } => {
                let low = total.saturating_sub(caps[1]);
                if *first > low {
                    *first -= 1;
                    true
                } else {
                    false
                }
            }
            Splitter::Three {
                total,
                caps,
                first,
                second,
            } => {
                let low_second = (*total - *first).saturating_sub(caps[2]);
                if *second > low_second {
                    *second -= 1;
                    return true;
                }
                let tail = u16::from(caps[1]) + u16::from(caps[2]);
                let low_first = if u16::from(*total) > tail {
                    (u16::from(*total) - tail) as u8
                } else {
                    0
                };
                if *first > low_first {
                    *first -= 1;
                    *second = (*total - *first).min(caps[1]);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Return to the first division.
    pub fn reset(&mut self) {
        match self {
            Splitter::One { .. } => {}
            Splitter::Two { total, caps, first } => {
                *first = (*total).min(caps[0]);
            }
            Splitter::Three {
                total,
                caps,
                first,
                second,
            } => {
                *first = (*total).min(caps[0]);
                *second = (*total - *first).min(caps[1]);
            }
        }
    }
}
