//! Index-aligned indicator frame for a window of bars.
//!
//! The frame stores every indicator column next to the closes it was computed
//! from, so row `i` of every column refers to the same bar.

use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::rsi::DEFAULT_PERIOD as DEFAULT_RSI;
use crate::domain::indicator::{IndicatorType, MacdSeries, Series, ema, last_value, macd, wilder_rsi};
use crate::domain::ohlcv::Bar;
use chrono::{DateTime, Utc};

pub const DEFAULT_EMA_PERIODS: [usize; 4] = [9, 20, 50, 200];

/// Periods for the indicators in a frame. EMA periods are ordered from the
/// shortest to the longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPeriods {
    pub ema: [usize; 4],
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            ema: DEFAULT_EMA_PERIODS,
            rsi: DEFAULT_RSI,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
        }
    }
}

impl IndicatorPeriods {
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        let mut types: Vec<IndicatorType> = self.ema.iter().map(|&p| IndicatorType::Ema(p)).collect();
        types.push(IndicatorType::Rsi(self.rsi));
        types.push(IndicatorType::Macd {
            fast: self.macd_fast,
            slow: self.macd_slow,
            signal: self.macd_signal,
        });
        types
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmaLine {
    pub period: usize,
    pub values: Series,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub periods: IndicatorPeriods,
    pub times: Vec<DateTime<Utc>>,
    pub close: Vec<f64>,
    pub ema: [EmaLine; 4],
    pub rsi: Series,
    pub macd: MacdSeries,
}

/// Last row of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatestValues {
    pub close: Option<f64>,
    pub ema: [Option<f64>; 4],
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

impl IndicatorFrame {
    pub fn compute(bars: &[Bar], periods: &IndicatorPeriods) -> Self {
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let ema_lines = periods.ema.map(|period| EmaLine {
            period,
            values: ema(&close, period),
        });

        Self {
            periods: *periods,
            times: bars.iter().map(|b| b.time).collect(),
            rsi: wilder_rsi(&close, periods.rsi),
            macd: macd(&close, periods.macd_fast, periods.macd_slow, periods.macd_signal),
            ema: ema_lines,
            close,
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn latest(&self) -> LatestValues {
        LatestValues {
            close: self.close.last().copied(),
            ema: [
                last_value(&self.ema[0].values),
                last_value(&self.ema[1].values),
                last_value(&self.ema[2].values),
                last_value(&self.ema[3].values),
            ],
            rsi: last_value(&self.rsi),
            macd: last_value(&self.macd.macd),
            signal: last_value(&self.macd.signal),
            histogram: last_value(&self.macd.histogram),
        }
    }

    /// Column names matching [`IndicatorFrame::row`].
    pub fn columns(&self) -> Vec<String> {
        let mut cols = vec!["close".to_string()];
        cols.extend(self.ema.iter().map(|e| IndicatorType::Ema(e.period).to_string()));
        cols.push(IndicatorType::Rsi(self.periods.rsi).to_string());
        cols.push("MACD".to_string());
        cols.push("signal".to_string());
        cols.push("histogram".to_string());
        cols
    }

    pub fn row(&self, i: usize) -> Vec<Option<f64>> {
        let mut row = vec![Some(self.close[i])];
        row.extend(self.ema.iter().map(|e| e.values[i]));
        row.push(self.rsi[i]);
        row.push(self.macd.macd[i]);
        row.push(self.macd.signal[i]);
        row.push(self.macd.histogram[i]);
        row
    }
}
