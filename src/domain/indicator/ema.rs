//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the SMA of the first n values,
//! then EMA[i] = (V[i] - EMA[i-1]) * k + EMA[i-1].
//! Warmup: first (n-1) entries are `None`.

use crate::domain::indicator::Series;

pub fn ema(values: &[f64], period: usize) -> Series {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);

    for (i, &value) in values.iter().enumerate().skip(period) {
        prev = (value - prev) * k + prev;
        out[i] = Some(prev);
    }
    out
}
