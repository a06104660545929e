//! Configuration validation.
//!
//! Every `[analysis]` key is optional; when present it must parse. The same
//! readers are used to build [`AnalysisConfig`] so validation and
//! construction cannot disagree.

use crate::domain::analysis::{AnalysisConfig, DEFAULT_VOLUME_LOOKBACK};
use crate::domain::error::TrendscopeError;
use crate::domain::indicator::IndicatorPeriods;
use crate::domain::pivot::{DEFAULT_LEFT, DEFAULT_RIGHT};
use crate::domain::timeframe::Timeframe;
use crate::ports::config_port::ConfigPort;

pub const ANALYSIS: &str = "analysis";
pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), TrendscopeError> {
    read_timeframe(config)?;
    read_analysis_config(config)?;
    validate_log_level(config)?;
    Ok(())
}

/// Configured timeframe, `None` when the key is absent.
pub fn read_timeframe(config: &dyn ConfigPort) -> Result<Option<Timeframe>, TrendscopeError> {
    match config.get_string(ANALYSIS, "timeframe") {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Timeframe>()
            .map(Some)
            .map_err(|e| TrendscopeError::ConfigInvalid {
                section: ANALYSIS.to_string(),
                key: "timeframe".to_string(),
                reason: e.to_string(),
            }),
    }
}

pub fn read_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, TrendscopeError> {
    let defaults = IndicatorPeriods::default();
    let periods = IndicatorPeriods {
        ema: read_ema_periods(config)?,
        rsi: positive_int(config, ANALYSIS, "rsi_period", defaults.rsi)?,
        macd_fast: positive_int(config, ANALYSIS, "macd_fast", defaults.macd_fast)?,
        macd_slow: positive_int(config, ANALYSIS, "macd_slow", defaults.macd_slow)?,
        macd_signal: positive_int(config, ANALYSIS, "macd_signal", defaults.macd_signal)?,
    };

    if periods.macd_fast >= periods.macd_slow {
        return Err(TrendscopeError::ConfigInvalid {
            section: ANALYSIS.to_string(),
            key: "macd_fast".to_string(),
            reason: "macd_fast must be less than macd_slow".to_string(),
        });
    }

    Ok(AnalysisConfig {
        pivot_left: positive_int(config, ANALYSIS, "pivot_left", DEFAULT_LEFT)?,
        pivot_right: positive_int(config, ANALYSIS, "pivot_right", DEFAULT_RIGHT)?,
        periods,
        volume_lookback: positive_int(config, ANALYSIS, "volume_lookback", DEFAULT_VOLUME_LOOKBACK)?,
    })
}

fn read_ema_periods(config: &dyn ConfigPort) -> Result<[usize; 4], TrendscopeError> {
    let Some(items) = config.get_list(ANALYSIS, "ema_periods") else {
        return Ok(IndicatorPeriods::default().ema);
    };

    let invalid = |reason: &str| TrendscopeError::ConfigInvalid {
        section: ANALYSIS.to_string(),
        key: "ema_periods".to_string(),
        reason: reason.to_string(),
    };

    let parsed = items
        .iter()
        .map(|s| s.parse::<usize>().ok().filter(|&p| p > 0))
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(|| invalid("ema_periods must be positive integers"))?;

    let periods: [usize; 4] = parsed
        .try_into()
        .map_err(|_| invalid("ema_periods must list exactly four periods"))?;

    if periods.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("ema_periods must be strictly increasing"));
    }
    Ok(periods)
}

/// Reads a positive integer, falling back to `default` when the key is absent.
pub fn positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, TrendscopeError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| TrendscopeError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{key} must be a positive integer, got '{}'", raw.trim()),
            }),
    }
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), TrendscopeError> {
    match config.get_string("logging", "level") {
        Some(level) if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) => {
            Err(TrendscopeError::ConfigInvalid {
                section: "logging".to_string(),
                key: "level".to_string(),
                reason: format!("level must be one of {}", LOG_LEVELS.join(", ")),
            })
        }
        _ => Ok(()),
    }
}
