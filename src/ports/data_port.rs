//! Bar source port trait.

use crate::domain::error::TrendscopeError;
use crate::domain::ohlcv::Bar;
use chrono::{DateTime, Utc};

pub trait DataPort {
    /// Raw bars for `symbol` in ascending time order.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, TrendscopeError>;

    fn list_symbols(&self) -> Result<Vec<String>, TrendscopeError>;

    /// First and last bar time plus bar count, `None` when the symbol has no rows.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, TrendscopeError> {
        let bars = self.fetch_bars(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time, bars.len())),
            _ => None,
        })
    }
}
