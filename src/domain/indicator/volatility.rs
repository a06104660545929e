//! Return volatility and average volume.
//!
//! Volatility is the population standard deviation of simple returns
//! R[i] = (C[i] - C[i-1]) / C[i-1] over the given bars.
//! A zero previous close divides by 1 instead.

use crate::domain::ohlcv::Bar;

pub fn volatility(bars: &[Bar]) -> f64 {
    if bars.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = bars
        .windows(2)
        .map(|w| {
            let prev = if w[0].close == 0.0 { 1.0 } else { w[0].close };
            (w[1].close - prev) / prev
        })
        .collect();

    let count = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / count;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / count;
    variance.sqrt()
}

/// Arithmetic mean of volume; 0 for no bars.
pub fn average_volume(bars: &[Bar]) -> f64 {
    if bars.is_empty() {
        return 0.0;
    }
    bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64
}
