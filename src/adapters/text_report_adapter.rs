//! Plain-text report adapter implementing ReportPort.
//!
//! Renders the dashboard view of an [`Analysis`]: header, metric cards,
//! trend structure and the insight list.

use std::fmt::Write;

use crate::adapters::csv_adapter::format_time;
use crate::domain::analysis::Analysis;
use crate::domain::insight::EmaAlignment;
use crate::domain::pivot::Pivot;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn fmt_last_pivot(analysis: &Analysis, pivots: &[Pivot]) -> String {
    match pivots.last() {
        Some(p) => format!(
            "{} (last {:.2} on {})",
            pivots.len(),
            p.price,
            format_time(analysis.aggregated[p.index].time)
        ),
        None => "none".to_string(),
    }
}

fn alignment_label(alignment: EmaAlignment) -> &'static str {
    match alignment {
        EmaAlignment::Bullish => "Bullish",
        EmaAlignment::Bearish => "Bearish",
        EmaAlignment::Mixed => "Mixed",
    }
}

pub fn render_header(symbol: &str, analysis: &Analysis) -> String {
    let mut out = String::new();
    let shown = analysis.display_bars();
    let _ = writeln!(out, "=== {} ({}) ===", symbol, analysis.timeframe);
    match (shown.first(), shown.last()) {
        (Some(first), Some(last)) => {
            let _ = writeln!(
                out,
                "Bars:           {} shown of {} ({} to {})",
                shown.len(),
                analysis.aggregated.len(),
                format_time(first.time),
                format_time(last.time)
            );
        }
        _ => {
            let _ = writeln!(out, "Bars:           0");
        }
    }
    let _ = writeln!(out, "Trend:          {}", analysis.trend_label());
    out
}

pub fn render_metrics(analysis: &Analysis) -> String {
    let mut out = String::new();
    let latest = &analysis.latest;
    let periods = &analysis.frame.periods;

    let _ = writeln!(out, "\n=== Metrics ===");
    let _ = writeln!(out, "Close:          {}", fmt_value(latest.close));
    for (i, period) in periods.ema.iter().enumerate() {
        let label = format!("EMA({}):", period);
        let _ = writeln!(
            out,
            "{:<16}{:<12}{}",
            label,
            fmt_value(latest.ema[i]),
            analysis.ema_status[i]
        );
    }
    let _ = writeln!(out, "EMA alignment:  {}", alignment_label(analysis.alignment));

    let rsi_label = format!("RSI({}):", periods.rsi);
    let _ = writeln!(
        out,
        "{:<16}{:<12}{}",
        rsi_label,
        fmt_value(latest.rsi),
        analysis.rsi_zone.map_or_else(|| "n/a".to_string(), |z| z.to_string())
    );
    let _ = writeln!(
        out,
        "MACD:           {} (signal {}, histogram {}) {}",
        fmt_value(latest.macd),
        fmt_value(latest.signal),
        fmt_value(latest.histogram),
        analysis.macd_bias.map_or_else(|| "n/a".to_string(), |b| b.to_string())
    );
    let _ = writeln!(out, "Volatility:     {:.2}%", analysis.volatility * 100.0);
    let _ = writeln!(out, "Avg Volume:     {:.0}", analysis.average_volume);
    out
}

pub fn render_structure(analysis: &Analysis) -> String {
    let mut out = String::new();
    let trend = &analysis.trend;
    let _ = writeln!(out, "\n=== Structure ===");
    let _ = writeln!(out, "Pivot highs:    {}", fmt_last_pivot(analysis, &trend.highs));
    let _ = writeln!(out, "Pivot lows:     {}", fmt_last_pivot(analysis, &trend.lows));
    let _ = writeln!(out, "Structure:      {}", trend.structure);
    let _ = writeln!(out, "High slope:     {:.4}", trend.high_slope);
    let _ = writeln!(out, "Low slope:      {:.4}", trend.low_slope);
    if trend.breakout.bullish {
        let _ = writeln!(out, "Breakout:       above last pivot high");
    }
    if trend.breakout.bearish {
        let _ = writeln!(out, "Breakdown:      below last pivot low");
    }
    out
}

pub fn render_insights(analysis: &Analysis) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Insights ===");
    for line in &analysis.insights {
        let _ = writeln!(out, "- {}", line);
    }
    out
}

impl ReportPort for TextReportAdapter {
    fn render(&self, symbol: &str, analysis: &Analysis) -> String {
        let mut out = render_header(symbol, analysis);
        out.push_str(&render_metrics(analysis));
        out.push_str(&render_structure(analysis));
        out.push_str(&render_insights(analysis));
        out
    }
}
