#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use trendscope::domain::error::TrendscopeError;
pub use trendscope::domain::ohlcv::Bar;
use trendscope::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, TrendscopeError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrendscopeError::DataSource {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(symbol).cloned().unwrap_or_default();
        bars.sort_by_key(|b| b.time);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrendscopeError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

pub fn make_bar(day: &str, close: f64) -> Bar {
    Bar::new(date(day), close, close + 1.0, close - 1.0, close, 1_000.0)
}

/// One bar per calendar day starting at `start`, high/low one unit around close.
pub fn daily_bars(start: &str, closes: &[f64]) -> Vec<Bar> {
    let t0 = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(t0 + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1_000.0 + i as f64))
        .collect()
}

/// Bars whose highs and lows are given explicitly.
pub fn bars_with_extremes(start: &str, highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<Bar> {
    let t0 = date(start);
    highs
        .iter()
        .zip(lows)
        .zip(closes)
        .enumerate()
        .map(|(i, ((&h, &l), &c))| Bar::new(t0 + Duration::days(i as i64), c, h, l, c, 100.0))
        .collect()
}

/// Zig-zag with rising swings: each leg climbs 6 then drops 3.
pub fn rising_zigzag(start: &str, legs: usize) -> Vec<Bar> {
    let mut closes = Vec::new();
    let mut price = 100.0;
    for _ in 0..legs {
        for _ in 0..3 {
            price += 2.0;
            closes.push(price);
        }
        for _ in 0..3 {
            price -= 1.0;
            closes.push(price);
        }
    }
    daily_bars(start, &closes)
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
