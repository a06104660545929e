//! Technical indicators over contiguous numeric arrays.
//!
//! Every indicator returns a [`Series`] of the same length as its input,
//! index-aligned with it. A `None` entry means the value is not computable
//! yet because the window has not filled; it is never coerced to zero.
//!
//! - `IndicatorType`: indicator identity + parameters, used for labelling
//! - `compact` / `scatter`: run a windowed function over the defined
//!   entries of a sparse series and map the results back

pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod volatility;

pub use ema::ema;
pub use frame::{IndicatorFrame, IndicatorPeriods, LatestValues};
pub use macd::{MacdSeries, macd};
pub use rsi::wilder_rsi;
pub use volatility::{average_volume, volatility};

use std::fmt;

/// Nullable numeric series aligned by index with its input.
pub type Series = Vec<Option<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// Drop `None` entries, keeping the original index of each defined value.
pub fn compact(values: &[Option<f64>]) -> (Vec<f64>, Vec<usize>) {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (v, i)))
        .unzip()
}

/// Place dense results back at `indices` in a series of length `len`.
///
/// `dense` and `indices` are paired by position; everything else is `None`.
pub fn scatter(dense: &[Option<f64>], indices: &[usize], len: usize) -> Series {
    let mut out = vec![None; len];
    for (value, &idx) in dense.iter().zip(indices) {
        out[idx] = *value;
    }
    out
}

/// Latest entry of a series, `None` if empty or not yet computable.
pub fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}
