//! Core domain types and logic.

pub mod ohlcv;
pub mod timeframe;
pub mod aggregate;
pub mod indicator;
pub mod pivot;
pub mod structure;
pub mod insight;
pub mod analysis;
pub mod config_validation;
pub mod error;
