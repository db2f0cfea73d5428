use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects the denominator used when computing variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispersionMode {
    /// Divide the summed squared deviations by `n`.
    Population,
    /// Divide by `n - 1` (Bessel's correction).
    Sample,
}

impl fmt::Display for DispersionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispersionMode::Population => f.write_str("population"),
            DispersionMode::Sample => f.write_str("sample"),
        }
    }
}

impl FromStr for DispersionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "population" => Ok(DispersionMode::Population),
            "sample" => Ok(DispersionMode::Sample),
            other => Err(CoreError::InvalidInput(
                "dispersion mode".to_string(),
                format!("expected 'population' or 'sample', got '{}'", other),
            )),
        }
    }
}

/// A qualitative reading of where the latest price sits relative to its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketCondition {
    ExtremeOversold,
    Oversold,
    Neutral,
    Overbought,
    ExtremeOverbought,
    OutOfRange,
}

impl MarketCondition {
    /// The wire token, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCondition::ExtremeOversold => "EXTREME_OVERSOLD",
            MarketCondition::Oversold => "OVERSOLD",
            MarketCondition::Neutral => "NEUTRAL",
            MarketCondition::Overbought => "OVERBOUGHT",
            MarketCondition::ExtremeOverbought => "EXTREME_OVERBOUGHT",
            MarketCondition::OutOfRange => "OUT_OF_RANGE",
        }
    }
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispersion_mode_parses_case_insensitively() {
        assert_eq!("Sample".parse::<DispersionMode>(), Ok(DispersionMode::Sample));
        assert_eq!(
            " POPULATION ".parse::<DispersionMode>(),
            Ok(DispersionMode::Population)
        );
        assert!("median".parse::<DispersionMode>().is_err());
        assert!("pop".parse::<DispersionMode>().is_err());
    }

    #[test]
    fn market_condition_display_matches_serde() {
        for condition in [
            MarketCondition::ExtremeOversold,
            MarketCondition::Oversold,
            MarketCondition::Neutral,
            MarketCondition::Overbought,
            MarketCondition::ExtremeOverbought,
            MarketCondition::OutOfRange,
        ] {
            let json = serde_json::to_string(&condition).unwrap();
            assert_eq!(json, format!("\"{}\"", condition));
        }
    }
}
