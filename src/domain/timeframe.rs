//! Aggregation timeframes and their calendar buckets.
//!
//! Bucket keys are computed in UTC: Monday for weeks, the 1st for months,
//! Jan 1 / Jul 1 for half-years and Jan 1 for years.

use crate::domain::error::UnknownTimeframe;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    #[default]
    Day,
    Week,
    Month,
    HalfYear,
    Year,
    Overall,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::Day,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::HalfYear,
        Timeframe::Year,
        Timeframe::Overall,
    ];

    /// Day and Overall pass bars through without bucketing.
    pub fn is_passthrough(self) -> bool {
        matches!(self, Timeframe::Day | Timeframe::Overall)
    }

    /// Start of the bucket containing `time`, at midnight UTC.
    pub fn bucket_start(self, time: DateTime<Utc>) -> DateTime<Utc> {
        let date = time.date_naive();
        let start = match self {
            Timeframe::Day | Timeframe::Overall => date,
            Timeframe::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Timeframe::Month => date - Duration::days(date.day0() as i64),
            Timeframe::HalfYear => {
                let jan1 = year_start(date);
                if date.month() > 6 {
                    jan1 + Months::new(6)
                } else {
                    jan1
                }
            }
            Timeframe::Year => year_start(date),
        };
        midnight(start)
    }

    /// Exclusive end of the bucket that begins at `start`.
    pub fn bucket_end(self, start: DateTime<Utc>) -> DateTime<Utc> {
        let date = start.date_naive();
        let end = match self {
            Timeframe::Day | Timeframe::Overall => date + Duration::days(1),
            Timeframe::Week => date + Duration::days(7),
            Timeframe::Month => date + Months::new(1),
            Timeframe::HalfYear => date + Months::new(6),
            Timeframe::Year => date + Months::new(12),
        };
        midnight(end)
    }

    /// Maximum number of trailing aggregated bars shown; `None` is unbounded.
    pub fn display_cap(self) -> Option<usize> {
        match self {
            Timeframe::Day | Timeframe::Week | Timeframe::Month => Some(200),
            Timeframe::HalfYear => Some(180),
            Timeframe::Year => Some(260),
            Timeframe::Overall => None,
        }
    }
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.ordinal0() as i64)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::HalfYear => "6months",
            Timeframe::Year => "year",
            Timeframe::Overall => "overall",
        };
        f.write_str(name)
    }
}

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Timeframe::Day),
            "week" | "weekly" => Ok(Timeframe::Week),
            "month" | "monthly" => Ok(Timeframe::Month),
            "6months" | "halfyear" | "half-year" => Ok(Timeframe::HalfYear),
            "year" | "yearly" => Ok(Timeframe::Year),
            "overall" | "all" => Ok(Timeframe::Overall),
            _ => Err(UnknownTimeframe { name: s.to_string() }),
        }
    }
}
