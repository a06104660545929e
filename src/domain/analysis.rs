//! Historical price dashboard pipeline.
//!
//! raw bars -> aggregate -> display window -> indicator frame
//! full aggregated bars -> pivots -> structure -> trend label
//! everything -> insights
//!
//! Indicators are computed on the display window only, while pivots and
//! structure use the full aggregated history so they do not depend on how
//! many bars are shown.

use crate::domain::aggregate::{aggregate, display_start};
use crate::domain::indicator::{IndicatorFrame, IndicatorPeriods, LatestValues, average_volume, volatility};
use crate::domain::insight::{
    EmaAlignment, InsightInputs, MacdBias, PriceStatus, RsiZone, build_insights, ema_alignment,
    price_status,
};
use crate::domain::ohlcv::Bar;
use crate::domain::pivot::{DEFAULT_LEFT, DEFAULT_RIGHT};
use crate::domain::structure::{TrendAssessment, TrendLabel};
use crate::domain::timeframe::Timeframe;

pub const DEFAULT_VOLUME_LOOKBACK: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub pivot_left: usize,
    pub pivot_right: usize,
    pub periods: IndicatorPeriods,
    /// Number of trailing raw bars averaged for volume.
    pub volume_lookback: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pivot_left: DEFAULT_LEFT,
            pivot_right: DEFAULT_RIGHT,
            periods: IndicatorPeriods::default(),
            volume_lookback: DEFAULT_VOLUME_LOOKBACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub timeframe: Timeframe,
    pub aggregated: Vec<Bar>,
    /// Index into `aggregated` of the first displayed bar.
    pub display_start: usize,
    pub frame: IndicatorFrame,
    pub latest: LatestValues,
    pub alignment: EmaAlignment,
    /// Latest close against each EMA, shortest period first.
    pub ema_status: [PriceStatus; 4],
    pub rsi_zone: Option<RsiZone>,
    pub macd_bias: Option<MacdBias>,
    pub volatility: f64,
    pub average_volume: f64,
    pub trend: TrendAssessment,
    pub insights: Vec<String>,
}

impl Analysis {
    pub fn display_bars(&self) -> &[Bar] {
        &self.aggregated[self.display_start..]
    }

    pub fn trend_label(&self) -> TrendLabel {
        self.trend.label
    }
}

pub fn analyze(raw: &[Bar], timeframe: Timeframe, config: &AnalysisConfig) -> Analysis {
    let aggregated = aggregate(raw, timeframe);
    let start = display_start(aggregated.len(), timeframe);
    let window = &aggregated[start..];

    let frame = IndicatorFrame::compute(window, &config.periods);
    let latest = frame.latest();
    let alignment = ema_alignment(&latest.ema);
    let ema_status = latest.ema.map(|level| price_status(latest.close, level));

    let window_volatility = volatility(window);

    let mut raw_sorted = raw.to_vec();
    raw_sorted.sort_by_key(|b| b.time);
    let recent_raw = &raw_sorted[raw_sorted.len().saturating_sub(config.volume_lookback)..];
    let avg_volume = average_volume(recent_raw);

    let trend = TrendAssessment::assess(&aggregated, config.pivot_left, config.pivot_right);

    let insights = build_insights(&InsightInputs {
        rsi: latest.rsi,
        macd: latest.macd,
        signal: latest.signal,
        ema_periods: config.periods.ema,
        alignment,
        long_ema: ema_status[3],
        volatility: window_volatility,
        bars: &aggregated,
        pivot_left: config.pivot_left,
        pivot_right: config.pivot_right,
    });

    Analysis {
        timeframe,
        display_start: start,
        frame,
        latest,
        alignment,
        ema_status,
        rsi_zone: latest.rsi.map(RsiZone::classify),
        macd_bias: latest.macd.zip(latest.signal).map(|(m, s)| MacdBias::classify(m, s)),
        volatility: window_volatility,
        average_volume: avg_volume,
        trend,
        insights,
        aggregated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::structure::MarketStructure;
    use chrono::{Duration, TimeZone, Utc};

    fn daily(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn empty_input() {
        let a = analyze(&[], Timeframe::Day, &AnalysisConfig::default());
        assert!(a.aggregated.is_empty());
        assert!(a.frame.is_empty());
        assert_eq!(a.volatility, 0.0);
        assert_eq!(a.average_volume, 0.0);
        assert_eq!(a.trend.structure, MarketStructure::NotEnoughData);
        assert_eq!(a.trend_label(), TrendLabel::Sideways);
        assert_eq!(a.rsi_zone, None);
        assert_eq!(a.macd_bias, None);
        assert_eq!(a.insights.last().unwrap(), "Overall: Sideways / Neutral — wait for clearer signals.");
    }

    #[test]
    fn display_window_bounds_indicators() {
        let closes: Vec<f64> = (0..260).map(|i| 100.0 + i as f64 * 0.5).collect();
        let a = analyze(&daily(&closes), Timeframe::Day, &AnalysisConfig::default());

        assert_eq!(a.aggregated.len(), 260);
        assert_eq!(a.display_start, 60);
        assert_eq!(a.display_bars().len(), 200);
        assert_eq!(a.frame.len(), 200);
        assert_eq!(a.frame.close[0], closes[60]);
        // EMA200 is seeded on the last displayed bar
        assert!(a.latest.ema[3].is_some());
    }

    #[test]
    fn accelerating_rise_is_bullish() {
        let closes: Vec<f64> = (0..220)
            .map(|i| 100.0 + i as f64 + 0.01 * (i * i) as f64)
            .collect();
        let a = analyze(&daily(&closes), Timeframe::Day, &AnalysisConfig::default());

        assert_eq!(a.alignment, EmaAlignment::Bullish);
        assert_eq!(a.ema_status, [PriceStatus::Above; 4]);
        assert_eq!(a.rsi_zone, Some(RsiZone::Overbought));
        assert_eq!(a.macd_bias, Some(MacdBias::Bullish));
        assert_eq!(a.insights.last().unwrap(), "Overall: Strong Bullish bias.");
    }

    #[test]
    fn average_volume_uses_trailing_raw_bars() {
        let closes = vec![10.0; 40];
        let mut bars = daily(&closes);
        bars.reverse();
        let a = analyze(&bars, Timeframe::Week, &AnalysisConfig::default());

        // volumes 110..=139 for the latest 30 days
        let expected = (110..140).map(f64::from).sum::<f64>() / 30.0;
        assert!((a.average_volume - expected).abs() < 1e-9);
    }

    #[test]
    fn pivots_use_full_history() {
        let mut closes: Vec<f64> = Vec::new();
        for i in 0..300 {
            closes.push(100.0 + ((i % 10) as f64 - 5.0).abs());
        }
        let bars = daily(&closes);
        let a = analyze(&bars, Timeframe::Day, &AnalysisConfig::default());

        assert_eq!(a.display_bars().len(), 200);
        assert!(a.trend.highs.iter().any(|p| p.index < a.display_start));
        assert_eq!(a.trend, TrendAssessment::assess(&a.aggregated, 2, 2));
    }

    #[test]
    fn idempotent() {
        let closes: Vec<f64> = (0..90).map(|i| 50.0 + (i as f64 * 0.3).sin() * 4.0).collect();
        let bars = daily(&closes);
        let config = AnalysisConfig::default();
        assert_eq!(
            analyze(&bars, Timeframe::Week, &config),
            analyze(&bars, Timeframe::Week, &config)
        );
    }
}
