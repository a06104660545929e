//! Market structure, trendline slope, breakouts and the trend label.

use crate::domain::ohlcv::Bar;
use crate::domain::pivot::{Pivot, pivot_high, pivot_low};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketStructure {
    /// Higher high and higher low.
    Uptrend,
    /// Lower high and lower low.
    Downtrend,
    Sideways,
    /// Fewer than two pivot highs or two pivot lows.
    NotEnoughData,
}

impl fmt::Display for MarketStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketStructure::Uptrend => "Uptrend",
            MarketStructure::Downtrend => "Downtrend",
            MarketStructure::Sideways => "Sideways",
            MarketStructure::NotEnoughData => "Not enough data",
        };
        f.write_str(s)
    }
}

/// Compare the last two pivot highs and the last two pivot lows.
pub fn market_structure(highs: &[Pivot], lows: &[Pivot]) -> MarketStructure {
    let (Some(h), Some(l)) = (last_two(highs), last_two(lows)) else {
        return MarketStructure::NotEnoughData;
    };
    let ((h1, h2), (l1, l2)) = ((h.0.price, h.1.price), (l.0.price, l.1.price));

    if h2 > h1 && l2 > l1 {
        MarketStructure::Uptrend
    } else if h2 < h1 && l2 < l1 {
        MarketStructure::Downtrend
    } else {
        MarketStructure::Sideways
    }
}

/// Price change per bar between the last two pivots; 0 with fewer than two.
pub fn trendline_slope(points: &[Pivot]) -> f64 {
    match last_two(points) {
        Some((p1, p2)) => {
            let bars_apart = p2.index.saturating_sub(p1.index).max(1);
            (p2.price - p1.price) / bars_apart as f64
        }
        None => 0.0,
    }
}

fn last_two(points: &[Pivot]) -> Option<(Pivot, Pivot)> {
    match points {
        [.., a, b] => Some((*a, *b)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Breakout {
    /// Last close above the most recent pivot high.
    pub bullish: bool,
    /// Last close below the most recent pivot low.
    pub bearish: bool,
}

pub fn breakout(bars: &[Bar], highs: &[Pivot], lows: &[Pivot]) -> Breakout {
    let Some(last_close) = bars.last().map(|b| b.close) else {
        return Breakout::default();
    };
    Breakout {
        bullish: highs.last().is_some_and(|p| last_close > p.price),
        bearish: lows.last().is_some_and(|p| last_close < p.price),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLabel {
    StrongUptrend,
    Uptrend,
    UptrendBreakout,
    StrongDowntrend,
    Downtrend,
    DowntrendBreakdown,
    Sideways,
}

impl TrendLabel {
    pub fn is_bullish(self) -> bool {
        matches!(
            self,
            TrendLabel::StrongUptrend | TrendLabel::Uptrend | TrendLabel::UptrendBreakout
        )
    }

    pub fn is_bearish(self) -> bool {
        matches!(
            self,
            TrendLabel::StrongDowntrend | TrendLabel::Downtrend | TrendLabel::DowntrendBreakdown
        )
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendLabel::StrongUptrend => "Strong Uptrend",
            TrendLabel::Uptrend => "Uptrend",
            TrendLabel::UptrendBreakout => "Uptrend (Breakout)",
            TrendLabel::StrongDowntrend => "Strong Downtrend",
            TrendLabel::Downtrend => "Downtrend",
            TrendLabel::DowntrendBreakdown => "Downtrend (Breakdown)",
            TrendLabel::Sideways => "Sideways / Consolidation",
        };
        f.write_str(s)
    }
}

/// Breakouts win over structure; slopes upgrade a trend to "strong".
pub fn classify_trend_label(
    structure: MarketStructure,
    low_slope: f64,
    high_slope: f64,
    breakout: Breakout,
) -> TrendLabel {
    if breakout.bullish {
        return TrendLabel::UptrendBreakout;
    }
    if breakout.bearish {
        return TrendLabel::DowntrendBreakdown;
    }
    match structure {
        MarketStructure::Uptrend if low_slope > 0.0 => TrendLabel::StrongUptrend,
        MarketStructure::Uptrend => TrendLabel::Uptrend,
        MarketStructure::Downtrend if high_slope < 0.0 => TrendLabel::StrongDowntrend,
        MarketStructure::Downtrend => TrendLabel::Downtrend,
        MarketStructure::Sideways | MarketStructure::NotEnoughData => TrendLabel::Sideways,
    }
}

/// Everything derived from the pivots of one bar sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendAssessment {
    pub highs: Vec<Pivot>,
    pub lows: Vec<Pivot>,
    pub structure: MarketStructure,
    pub low_slope: f64,
    pub high_slope: f64,
    pub breakout: Breakout,
    pub label: TrendLabel,
}

impl TrendAssessment {
    pub fn assess(bars: &[Bar], left: usize, right: usize) -> Self {
        let highs = pivot_high(bars, left, right);
        let lows = pivot_low(bars, left, right);
        let structure = market_structure(&highs, &lows);
        let low_slope = trendline_slope(&lows);
        let high_slope = trendline_slope(&highs);
        let breakout = breakout(bars, &highs, &lows);
        let label = classify_trend_label(structure, low_slope, high_slope, breakout);

        Self {
            highs,
            lows,
            structure,
            low_slope,
            high_slope,
            breakout,
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn p(index: usize, price: f64) -> Pivot {
        Pivot { index, price }
    }

    fn closes(values: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), c, c + 0.5, c - 0.5, c, 10.0))
            .collect()
    }

    #[test]
    fn structure_needs_two_of_each() {
        assert_eq!(
            market_structure(&[p(2, 10.0)], &[p(4, 5.0), p(8, 6.0)]),
            MarketStructure::NotEnoughData
        );
        assert_eq!(
            market_structure(&[p(2, 10.0), p(6, 12.0)], &[]),
            MarketStructure::NotEnoughData
        );
    }

    #[test]
    fn structure_uses_last_two() {
        let highs = [p(1, 20.0), p(5, 10.0), p(9, 12.0)];
        let lows = [p(3, 1.0), p(7, 5.0), p(11, 6.0)];
        assert_eq!(market_structure(&highs, &lows), MarketStructure::Uptrend);
    }

    #[test]
    fn structure_downtrend_and_sideways() {
        let highs = [p(1, 12.0), p(5, 10.0)];
        let lows = [p(3, 6.0), p(7, 5.0)];
        assert_eq!(market_structure(&highs, &lows), MarketStructure::Downtrend);

        let lows_up = [p(3, 5.0), p(7, 6.0)];
        assert_eq!(market_structure(&highs, &lows_up), MarketStructure::Sideways);

        let flat = [p(1, 10.0), p(5, 10.0)];
        assert_eq!(market_structure(&flat, &lows_up), MarketStructure::Sideways);
    }

    #[test]
    fn structure_display() {
        assert_eq!(MarketStructure::NotEnoughData.to_string(), "Not enough data");
    }

    #[test]
    fn slope_of_last_two() {
        assert_eq!(trendline_slope(&[p(0, 1.0), p(2, 10.0), p(6, 14.0)]), 1.0);
        assert_eq!(trendline_slope(&[p(3, 5.0)]), 0.0);
        assert_eq!(trendline_slope(&[]), 0.0);
    }

    #[test]
    fn slope_guards_zero_spacing() {
        assert_eq!(trendline_slope(&[p(4, 1.0), p(4, 3.0)]), 2.0);
    }

    #[test]
    fn breakout_above_last_high() {
        let bars = closes(&[98.0, 99.0, 105.0]);
        let b = breakout(&bars, &[p(0, 90.0), p(1, 100.0)], &[p(0, 95.0)]);
        assert!(b.bullish);
        assert!(!b.bearish);
    }

    #[test]
    fn breakdown_below_last_low() {
        let bars = closes(&[98.0, 99.0, 80.0]);
        let b = breakout(&bars, &[p(1, 100.0)], &[p(0, 95.0)]);
        assert!(!b.bullish);
        assert!(b.bearish);
    }

    #[test]
    fn breakout_without_pivots_or_bars() {
        assert_eq!(breakout(&closes(&[1.0]), &[], &[]), Breakout::default());
        assert_eq!(breakout(&[], &[p(0, 1.0)], &[p(0, 1.0)]), Breakout::default());
    }

    #[test]
    fn breakout_overrides_structure() {
        let b = Breakout {
            bullish: true,
            bearish: false,
        };
        for s in [
            MarketStructure::Uptrend,
            MarketStructure::Downtrend,
            MarketStructure::Sideways,
            MarketStructure::NotEnoughData,
        ] {
            assert_eq!(classify_trend_label(s, -1.0, 1.0, b), TrendLabel::UptrendBreakout);
        }
    }

    #[test]
    fn bullish_breakout_wins_over_bearish() {
        let both = Breakout {
            bullish: true,
            bearish: true,
        };
        assert_eq!(
            classify_trend_label(MarketStructure::Downtrend, 0.0, -1.0, both),
            TrendLabel::UptrendBreakout
        );
    }

    #[test]
    fn breakdown_overrides_structure() {
        let b = Breakout {
            bullish: false,
            bearish: true,
        };
        assert_eq!(
            classify_trend_label(MarketStructure::Uptrend, 1.0, 1.0, b),
            TrendLabel::DowntrendBreakdown
        );
    }

    #[test]
    fn slope_strength() {
        let none = Breakout::default();
        assert_eq!(
            classify_trend_label(MarketStructure::Uptrend, 0.5, 0.0, none),
            TrendLabel::StrongUptrend
        );
        assert_eq!(
            classify_trend_label(MarketStructure::Uptrend, 0.0, 0.0, none),
            TrendLabel::Uptrend
        );
        assert_eq!(
            classify_trend_label(MarketStructure::Downtrend, 0.0, -0.5, none),
            TrendLabel::StrongDowntrend
        );
        assert_eq!(
            classify_trend_label(MarketStructure::Downtrend, 0.0, 0.5, none),
            TrendLabel::Downtrend
        );
        assert_eq!(
            classify_trend_label(MarketStructure::NotEnoughData, 1.0, -1.0, none),
            TrendLabel::Sideways
        );
    }

    #[test]
    fn label_display() {
        assert_eq!(TrendLabel::UptrendBreakout.to_string(), "Uptrend (Breakout)");
        assert_eq!(TrendLabel::Sideways.to_string(), "Sideways / Consolidation");
        assert!(TrendLabel::StrongUptrend.is_bullish());
        assert!(TrendLabel::DowntrendBreakdown.is_bearish());
        assert!(!TrendLabel::Sideways.is_bullish() && !TrendLabel::Sideways.is_bearish());
    }

    #[test]
    fn assess_zigzag_uptrend() {
        // rising zigzag: swing highs and lows both climb
        let bars = closes(&[
            10.0, 12.0, 15.0, 12.0, 11.0, 13.0, 17.0, 14.0, 13.0, 15.0, 19.0, 16.0, 15.5, 16.0,
        ]);
        let t = TrendAssessment::assess(&bars, 2, 2);

        assert_eq!(t.highs.iter().map(|p| p.index).collect::<Vec<_>>(), vec![2, 6, 10]);
        assert_eq!(t.lows.iter().map(|p| p.index).collect::<Vec<_>>(), vec![4, 8]);
        assert_eq!(t.structure, MarketStructure::Uptrend);
        assert!(t.low_slope > 0.0);
        assert_eq!(t.label, TrendLabel::StrongUptrend);
    }
}
