//! Calendar bucket aggregation of OHLCV bars.

use crate::domain::ohlcv::Bar;
use crate::domain::timeframe::Timeframe;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Group bars into one synthetic bar per calendar bucket.
///
/// Input order does not matter: bars are stably sorted by time first, so
/// ties keep their input order. Within a bucket the first bar supplies
/// `open`, the last supplies `close`, `high`/`low` are the extremes and
/// volumes are summed. The synthetic bar is stamped with the bucket key.
///
/// `Day` and `Overall` return the sorted input unchanged.
pub fn aggregate(bars: &[Bar], timeframe: Timeframe) -> Vec<Bar> {
    let mut sorted = bars.to_vec();
    sorted.sort_by_key(|b| b.time);

    if timeframe.is_passthrough() {
        return sorted;
    }

    let mut buckets: IndexMap<DateTime<Utc>, Bar> = IndexMap::new();
    for bar in &sorted {
        let key = timeframe.bucket_start(bar.time);
        buckets
            .entry(key)
            .and_modify(|bucket| bucket.absorb(bar))
            .or_insert(Bar { time: key, ..*bar });
    }

    let mut out: Vec<Bar> = buckets.into_values().collect();
    out.sort_by_key(|b| b.time);
    out
}

/// Trailing slice of aggregated bars shown for a timeframe:
/// `min(cap, len)` bars, or all of them when the timeframe is unbounded.
pub fn display_window(bars: &[Bar], timeframe: Timeframe) -> &[Bar] {
    &bars[display_start(bars.len(), timeframe)..]
}

/// Index of the first displayed bar in a sequence of `len` aggregated bars.
pub fn display_start(len: usize, timeframe: Timeframe) -> usize {
    let count = timeframe.display_cap().map_or(len, |cap| cap.min(len));
    len - count
}
