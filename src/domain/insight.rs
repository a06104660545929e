//! Rule-based observations composed from indicator and structure outputs.
//!
//! The thresholds here are the classification rules of the dashboard:
//! RSI bands, MACD versus signal, EMA stacking, long-EMA position,
//! volatility bands and a weighted directional score.

use crate::domain::ohlcv::Bar;
use crate::domain::pivot::Pivot;
use crate::domain::structure::{MarketStructure, TrendAssessment};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmaAlignment {
    /// Shortest EMA above the next, all the way to the longest.
    Bullish,
    /// Shortest EMA below the next, all the way to the longest.
    Bearish,
    Mixed,
}

/// Classify latest EMA values ordered from shortest to longest period.
/// Any missing value makes the alignment `Mixed`.
pub fn ema_alignment(ema: &[Option<f64>; 4]) -> EmaAlignment {
    let [Some(a), Some(b), Some(c), Some(d)] = *ema else {
        return EmaAlignment::Mixed;
    };
    if a > b && b > c && c > d {
        EmaAlignment::Bullish
    } else if a < b && b < c && c < d {
        EmaAlignment::Bearish
    } else {
        EmaAlignment::Mixed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceStatus {
    Above,
    Below,
    /// Equal, or one side not available.
    Neutral,
}

pub fn price_status(close: Option<f64>, level: Option<f64>) -> PriceStatus {
    match (close, level) {
        (Some(c), Some(l)) if c > l => PriceStatus::Above,
        (Some(c), Some(l)) if c < l => PriceStatus::Below,
        _ => PriceStatus::Neutral,
    }
}

impl fmt::Display for PriceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceStatus::Above => "Above",
            PriceStatus::Below => "Below",
            PriceStatus::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi > 70.0 {
            RsiZone::Overbought
        } else if rsi < 30.0 {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RsiZone::Overbought => "Overbought",
            RsiZone::Oversold => "Oversold",
            RsiZone::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdBias {
    Bullish,
    Bearish,
    Neutral,
}

impl MacdBias {
    pub fn classify(macd: f64, signal: f64) -> Self {
        if macd > signal {
            MacdBias::Bullish
        } else if macd < signal {
            MacdBias::Bearish
        } else {
            MacdBias::Neutral
        }
    }
}

impl fmt::Display for MacdBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MacdBias::Bullish => "Bullish",
            MacdBias::Bearish => "Bearish",
            MacdBias::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Closing directional call derived from [`directional_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
}

impl Bias {
    pub fn from_score(score: i32) -> Self {
        if score >= 6 {
            Bias::StrongBullish
        } else if score >= 3 {
            Bias::Bullish
        } else if score <= -6 {
            Bias::StrongBearish
        } else if score <= -3 {
            Bias::Bearish
        } else {
            Bias::Neutral
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Bias::StrongBullish => "Overall: Strong Bullish bias.",
            Bias::Bullish => "Overall: Bullish bias.",
            Bias::Neutral => "Overall: Sideways / Neutral — wait for clearer signals.",
            Bias::Bearish => "Overall: Bearish bias.",
            Bias::StrongBearish => "Overall: Strong Bearish bias.",
        };
        f.write_str(s)
    }
}

/// Latest indicator readings and the bars the trend insights are drawn from.
#[derive(Debug, Clone, Copy)]
pub struct InsightInputs<'a> {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub ema_periods: [usize; 4],
    pub alignment: EmaAlignment,
    /// Close relative to the longest EMA.
    pub long_ema: PriceStatus,
    pub volatility: f64,
    pub bars: &'a [Bar],
    pub pivot_left: usize,
    pub pivot_right: usize,
}

/// Weighted sum of bullish (+) and bearish (-) conditions.
pub fn directional_score(inputs: &InsightInputs<'_>) -> i32 {
    let mut score = 0;
    match inputs.alignment {
        EmaAlignment::Bullish => score += 3,
        EmaAlignment::Bearish => score -= 3,
        EmaAlignment::Mixed => {}
    }
    if let (Some(m), Some(s)) = (inputs.macd, inputs.signal) {
        if m > s {
            score += 2;
        } else if m < s {
            score -= 2;
        }
    }
    if let Some(rsi) = inputs.rsi {
        if rsi > 55.0 {
            score += 1;
        } else if rsi < 45.0 {
            score -= 1;
        }
    }
    match inputs.long_ema {
        PriceStatus::Above => score += 2,
        PriceStatus::Below => score -= 2,
        PriceStatus::Neutral => {}
    }
    score
}

/// Templated observations about pivots, trendlines and support/resistance.
pub fn trend_insights(bars: &[Bar], left: usize, right: usize) -> Vec<String> {
    if bars.len() < left.max(right) + 3 {
        return vec!["Not enough data for trend analysis.".to_string()];
    }

    let trend = TrendAssessment::assess(bars, left, right);
    let mut out = Vec::new();

    out.push(
        match trend.structure {
            MarketStructure::Uptrend => "Market structure: Higher Highs & Higher Lows → Uptrend.",
            MarketStructure::Downtrend => "Market structure: Lower Highs & Lower Lows → Downtrend.",
            MarketStructure::Sideways | MarketStructure::NotEnoughData => {
                "Market structure: Mixed → Sideways / Consolidation."
            }
        }
        .to_string(),
    );

    if trend.low_slope > 0.0 {
        out.push("Swing lows form a rising trendline → buyers defending dips.".to_string());
    }
    if trend.high_slope < 0.0 {
        out.push("Swing highs form a falling trendline → sellers controlling rallies.".to_string());
    }
    if trend.low_slope == 0.0 && trend.high_slope == 0.0 {
        out.push("Trendlines are flat → range-bound / sideways market.".to_string());
    }

    if trend.breakout.bullish {
        out.push(
            "Bullish breakout: price closed above recent swing high → potential continuation."
                .to_string(),
        );
    }
    if trend.breakout.bearish {
        out.push(
            "Bearish breakdown: price closed below recent swing low → potential bearish continuation."
                .to_string(),
        );
    }

    if let Some(resistance) = recent_mean(&trend.highs).filter(|v| *v != 0.0) {
        out.push(format!("Nearby resistance (avg recent highs): {:.2}", resistance));
    }
    if let Some(support) = recent_mean(&trend.lows).filter(|v| *v != 0.0) {
        out.push(format!("Nearby support (avg recent lows): {:.2}", support));
    }

    out
}

/// Mean price of up to the last three pivots.
fn recent_mean(pivots: &[Pivot]) -> Option<f64> {
    let recent = &pivots[pivots.len().saturating_sub(3)..];
    if recent.is_empty() {
        return None;
    }
    Some(recent.iter().map(|p| p.price).sum::<f64>() / recent.len() as f64)
}

/// Ordered observations ending with the overall bias sentence.
pub fn build_insights(inputs: &InsightInputs<'_>) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(rsi) = inputs.rsi {
        let text = if rsi > 80.0 {
            "Strongly overbought — high chance of pullback or consolidation."
        } else if rsi > 70.0 {
            "Overbought — expect possible sideways or minor pullback."
        } else if rsi > 50.0 {
            "Bullish momentum."
        } else if rsi >= 30.0 {
            "Bearish momentum / weakening."
        } else {
            "Oversold — bounce or reversal possible."
        };
        out.push(format!("RSI {:.2}: {}", rsi, text));
    }

    if let (Some(m), Some(s)) = (inputs.macd, inputs.signal) {
        let line = if m > s && m > 0.0 {
            format!("MACD {:.4} > Signal {:.4}: Bullish momentum.", m, s)
        } else if m > s && m < 0.0 {
            format!(
                "MACD {:.4} > Signal {:.4}: Bullish crossover but still below zero (early reversal).",
                m, s
            )
        } else if m < s && m > 0.0 {
            format!(
                "MACD {:.4} < Signal {:.4}: Momentum weakening — watch for pullback.",
                m, s
            )
        } else {
            format!("MACD {:.4} < Signal {:.4}: Bearish momentum.", m, s)
        };
        out.push(line);
    }

    let [p1, p2, p3, p4] = inputs.ema_periods;
    out.push(match inputs.alignment {
        EmaAlignment::Bullish => {
            format!("EMA alignment: {p1}>{p2}>{p3}>{p4} — bullish alignment.")
        }
        EmaAlignment::Bearish => {
            format!("EMA alignment: {p1}<{p2}<{p3}<{p4} — bearish alignment.")
        }
        EmaAlignment::Mixed => "EMA alignment: Mixed across timeframes.".to_string(),
    });

    match inputs.long_ema {
        PriceStatus::Above => {
            out.push(format!("Price is above EMA{p4} — long-term bias: bullish."))
        }
        PriceStatus::Below => {
            out.push(format!("Price is below EMA{p4} — long-term bias: bearish."))
        }
        PriceStatus::Neutral => {}
    }

    let vol_pct = if inputs.volatility.is_nan() {
        0.0
    } else {
        inputs.volatility * 100.0
    };
    out.push(if vol_pct < 1.0 {
        format!("Volatility low ({:.2}%) — consolidation likely.", vol_pct)
    } else if vol_pct < 2.0 {
        format!("Volatility moderate ({:.2}%).", vol_pct)
    } else {
        format!("Volatility high ({:.2}%) — expect larger moves.", vol_pct)
    });

    out.extend(trend_insights(inputs.bars, inputs.pivot_left, inputs.pivot_right));
    out.push(Bias::from_score(directional_score(inputs)).to_string());
    out
}
