//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow), where both are defined
//! Signal Line = EMA(signal) over the defined MACD values only
//! Histogram = MACD Line - Signal Line, where both are defined
//!
//! Default parameters: fast=12, slow=26, signal=9.
//! With SMA-seeded EMAs the first signal value lands at index
//! slow - 1 + signal - 1.

use crate::domain::indicator::{Series, compact, ema, scatter};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// Three index-aligned MACD series.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

impl MacdSeries {
    fn empty(len: usize) -> Self {
        Self {
            macd: vec![None; len],
            signal: vec![None; len],
            histogram: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let n = values.len();
    if n < slow {
        return MacdSeries::empty(n);
    }

    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);
    let macd_line: Series = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let (dense, indices) = compact(&macd_line);
    let signal = scatter(&ema(&dense, signal_period), &indices, n);

    let histogram = macd_line
        .iter()
        .zip(&signal)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    }
}

pub fn macd_default(values: &[f64]) -> MacdSeries {
    macd(values, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rising(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64).collect()
    }

    fn wavy(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn macd_warmup_default() {
        let series = macd_default(&wavy(60));

        for i in 0..DEFAULT_SLOW - 1 {
            assert!(series.macd[i].is_none(), "macd {} should be None", i);
        }
        assert!(series.macd[DEFAULT_SLOW - 1].is_some());

        let signal_start = DEFAULT_SLOW - 1 + DEFAULT_SIGNAL - 1;
        for i in 0..signal_start {
            assert!(series.signal[i].is_none(), "signal {} should be None", i);
            assert!(series.histogram[i].is_none());
        }
        assert!(series.signal[signal_start].is_some());
        assert!(series.histogram[signal_start].is_some());
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let series = macd_default(&wavy(80));
        for i in 0..series.len() {
            match (series.macd[i], series.signal[i]) {
                (Some(m), Some(s)) => {
                    assert_relative_eq!(series.histogram[i].unwrap(), m - s);
                }
                _ => assert!(series.histogram[i].is_none()),
            }
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let closes = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let series = macd(&closes, 3, 5, 2);
        let fast = ema(&closes, 3);
        let slow = ema(&closes, 5);

        for i in 0..closes.len() {
            match (fast[i], slow[i]) {
                (Some(f), Some(s)) => assert_relative_eq!(series.macd[i].unwrap(), f - s),
                _ => assert!(series.macd[i].is_none()),
            }
        }
    }

    #[test]
    fn signal_seeds_from_first_defined_macd_values() {
        let closes = wavy(20);
        let series = macd(&closes, 3, 5, 4);

        // macd defined from index 4; signal seed at 4 + 3
        let seed: f64 = series.macd[4..8].iter().map(|v| v.unwrap()).sum::<f64>() / 4.0;
        assert!(series.signal[6].is_none());
        assert_relative_eq!(series.signal[7].unwrap(), seed, epsilon = 1e-12);
    }

    #[test]
    fn macd_shorter_than_slow() {
        let series = macd_default(&rising(20));
        assert_eq!(series.len(), 20);
        assert!(series.macd.iter().all(Option::is_none));
        assert!(series.signal.iter().all(Option::is_none));
        assert!(series.histogram.iter().all(Option::is_none));
    }

    #[test]
    fn macd_enough_for_line_not_signal() {
        let series = macd_default(&rising(30));
        assert!(series.macd[29].is_some());
        assert!(series.signal.iter().all(Option::is_none));
        assert!(series.histogram.iter().all(Option::is_none));
    }

    #[test]
    fn macd_empty() {
        assert!(macd_default(&[]).is_empty());
    }

    #[test]
    fn macd_default_constants() {
        assert_eq!(DEFAULT_FAST, 12);
        assert_eq!(DEFAULT_SLOW, 26);
        assert_eq!(DEFAULT_SIGNAL, 9);
    }
}
