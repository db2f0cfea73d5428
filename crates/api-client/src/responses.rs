use crate::error::ApiError;
use chrono::{TimeZone, Utc};
use core_types::{PriceSample, PriceSeries};
use serde::Deserialize;

// Mirrors the subset of `GET /v8/finance/chart/{symbol}` we consume.

/// The top-level chart response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// Represents an error response from the chart API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    // Absent when the requested range holds no prints.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Converts the response into a `PriceSeries` of closing prices.
    ///
    /// Days whose close is `null` are skipped.
    pub fn into_series(self) -> Result<PriceSeries, ApiError> {
        if let Some(err) = self.chart.error {
            return Err(ApiError::Provider {
                code: err.code,
                description: err.description,
            });
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ApiError::NoData("chart response contained no results".to_string()))?;

        if result.timestamp.is_empty() {
            return Ok(PriceSeries::default());
        }

        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .ok_or_else(|| ApiError::InvalidData("chart result has no quote block".to_string()))?;

        if closes.len() != result.timestamp.len() {
            return Err(ApiError::InvalidData(format!(
                "{} timestamps but {} closing prices",
                result.timestamp.len(),
                closes.len()
            )));
        }

        let samples = result
            .timestamp
            .into_iter()
            .zip(closes)
            .filter_map(|(ts, close)| close.map(|price| (ts, price)))
            .map(|(ts, price)| {
                let timestamp = Utc
                    .timestamp_opt(ts, 0)
                    .single()
                    .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {}", ts)))?;
                Ok(PriceSample::new(timestamp, price))
            })
            .collect::<Result<Vec<PriceSample>, ApiError>>()?;

        Ok(PriceSeries::new(samples))
    }
}
