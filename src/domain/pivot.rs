//! Swing pivot detection.
//!
//! A bar is a pivot high when its high is strictly greater than the highs of
//! the `left` bars before it and the `right` bars after it; pivot lows mirror
//! this with strictly lower lows. Equal neighbours disqualify a candidate, so
//! flat tops and bottoms produce no pivots. No pivot is reported within `left`
//! bars of the start or `right` bars of the end.
//!
//! Pivots refer to positions in one particular bar sequence. Recompute them
//! whenever the sequence changes.

use crate::domain::ohlcv::Bar;

pub const DEFAULT_LEFT: usize = 2;
pub const DEFAULT_RIGHT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub index: usize,
    pub price: f64,
}

pub fn pivot_high(bars: &[Bar], left: usize, right: usize) -> Vec<Pivot> {
    find_pivots(bars, left, right, |b| b.high, |candidate, other| candidate > other)
}

pub fn pivot_low(bars: &[Bar], left: usize, right: usize) -> Vec<Pivot> {
    find_pivots(bars, left, right, |b| b.low, |candidate, other| candidate < other)
}

fn find_pivots(
    bars: &[Bar],
    left: usize,
    right: usize,
    price: impl Fn(&Bar) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Vec<Pivot> {
    let end = bars.len().saturating_sub(right);
    (left..end)
        .filter_map(|i| {
            let candidate = price(&bars[i]);
            let dominates = bars[i - left..i]
                .iter()
                .chain(&bars[i + 1..=i + right])
                .all(|b| beats(candidate, price(b)));
            dominates.then_some(Pivot {
                index: i,
                price: candidate,
            })
        })
        .collect()
}
