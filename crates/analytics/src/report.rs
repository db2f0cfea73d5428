use core_types::MarketCondition;
use serde::{Deserialize, Serialize};

/// Location and dispersion of a price window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub mean: f64,
    pub stddev: f64,
}

/// How far `value` lies from the mean of its reference window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreResult {
    pub value: f64,
    pub mean: f64,
    pub stddev: f64,
    pub zscore: f64,
}

/// A z-score result together with its market-condition band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    #[serde(flatten)]
    pub score: ZScoreResult,
    pub condition: MarketCondition,
}
