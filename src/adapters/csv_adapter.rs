//! CSV file data adapter.
//!
//! Reads `<SYMBOL>.csv` files with a `time,open,high,low,close,volume` header
//! and writes aggregated bars or indicator frames back out as CSV.

use crate::domain::error::TrendscopeError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct CsvAdapter {
    base_path: PathBuf,
}

/// Column positions resolved from the header row.
struct Columns {
    time: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, symbol: &str) -> Result<Self, TrendscopeError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| TrendscopeError::DataParse {
                symbol: symbol.to_string(),
                line: 1,
                reason: format!("missing {} column", names[0]),
            })
        };

        Ok(Self {
            time: require(&["time", "date"])?,
            open: require(&["open"])?,
            high: require(&["high"])?,
            low: require(&["low"])?,
            close: require(&["close"])?,
            volume: find(&["volume"]),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or `YYYY-MM-DD` (midnight UTC).
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Inverse of [`parse_time`]: midnight timestamps print as plain dates.
pub fn format_time(time: DateTime<Utc>) -> String {
    if time.time() == NaiveTime::MIN {
        time.format("%Y-%m-%d").to_string()
    } else {
        time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
    line: u64,
) -> Result<f64, TrendscopeError> {
    let raw = record.get(index).ok_or_else(|| TrendscopeError::DataParse {
        symbol: symbol.to_string(),
        line,
        reason: format!("missing {name} value"),
    })?;
    raw.parse().map_err(|e| TrendscopeError::DataParse {
        symbol: symbol.to_string(),
        line,
        reason: format!("invalid {name} value '{raw}': {e}"),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, TrendscopeError> {
        let path = self.csv_path(symbol);
        debug!(symbol, path = %path.display(), "reading bars");
        let content = fs::read_to_string(&path).map_err(|e| TrendscopeError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| TrendscopeError::DataParse {
            symbol: symbol.to_string(),
            line: 1,
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers, symbol)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TrendscopeError::DataParse {
                symbol: symbol.to_string(),
                line: e.position().map_or(0, |p| p.line()),
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            let time_str = record.get(cols.time).unwrap_or_default();
            let time = parse_time(time_str).ok_or_else(|| TrendscopeError::DataParse {
                symbol: symbol.to_string(),
                line,
                reason: format!("invalid time '{}'", time_str),
            })?;

            let volume = match cols.volume {
                Some(i) if record.get(i).is_some_and(|v| !v.is_empty()) => {
                    parse_field(&record, i, "volume", symbol, line)?
                }
                _ => 0.0,
            };

            let bar = Bar::new(
                time,
                parse_field(&record, cols.open, "open", symbol, line)?,
                parse_field(&record, cols.high, "high", symbol, line)?,
                parse_field(&record, cols.low, "low", symbol, line)?,
                parse_field(&record, cols.close, "close", symbol, line)?,
                volume,
            );

            if !bar.is_consistent() {
                return Err(TrendscopeError::InvalidBar {
                    symbol: symbol.to_string(),
                    line,
                    reason: format!(
                        "expected low <= open, close <= high and volume >= 0 (o={} h={} l={} c={} v={})",
                        bar.open, bar.high, bar.low, bar.close, bar.volume
                    ),
                });
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.time);
        info!(symbol, bars = bars.len(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrendscopeError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TrendscopeError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TrendscopeError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

pub fn write_bars_csv<W: io::Write>(writer: W, bars: &[Bar]) -> Result<(), TrendscopeError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time", "open", "high", "low", "close", "volume"])
        .map_err(io::Error::from)?;
    for bar in bars {
        wtr.write_record([
            format_time(bar.time),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])
        .map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per bar; values that are not computable yet are left empty.
pub fn write_frame_csv<W: io::Write>(writer: W, frame: &IndicatorFrame) -> Result<(), TrendscopeError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["time".to_string()];
    header.extend(frame.columns());
    wtr.write_record(&header).map_err(io::Error::from)?;

    for i in 0..frame.len() {
        let mut record = vec![format_time(frame.times[i])];
        record.extend(
            frame
                .row(i)
                .into_iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record).map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}
