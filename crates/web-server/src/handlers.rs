use crate::{error::AppError, AppState};
use analytics::{SignalReport, StatisticsResult, ZScoreResult};
use api_client::error::ApiError;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use core_types::{DispersionMode, MarketCondition, PriceSample, PriceSeries};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Optional window controls shared by the analytics endpoints.
///
/// Fields stay as raw strings so malformed values produce our JSON 400 body
/// rather than the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    days: Option<String>,
    mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    date: Option<String>,
}

/// One point of the price history, keyed by calendar day.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub price: f64,
}

impl From<&PriceSample> for HistoryEntry {
    fn from(sample: &PriceSample) -> Self {
        Self {
            date: sample.date(),
            price: sample.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ZScoreResponse {
    pub zscore: f64,
    pub price: f64,
    pub mean: f64,
    pub stddev: f64,
}

impl From<ZScoreResult> for ZScoreResponse {
    fn from(score: ZScoreResult) -> Self {
        Self {
            zscore: score.zscore,
            price: score.value,
            mean: score.mean,
            stddev: score.stddev,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignalResponse {
    #[serde(flatten)]
    pub score: ZScoreResponse,
    pub condition: MarketCondition,
}

impl From<SignalReport> for SignalResponse {
    fn from(report: SignalReport) -> Self {
        Self {
            score: report.score.into(),
            condition: report.condition,
        }
    }
}

impl WindowQuery {
    fn days(&self, state: &AppState) -> Result<u32, AppError> {
        let days = match self.days.as_deref() {
            None => return Ok(state.window_days),
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::BadRequest(format!("'days' must be a positive integer, got '{}'", raw)))?,
        };
        if days == 0 || days > state.max_window_days {
            return Err(AppError::BadRequest(format!(
                "'days' must be between 1 and {}",
                state.max_window_days
            )));
        }
        Ok(days)
    }

    // Population unless the caller asks otherwise; the engine itself has no default.
    fn mode(&self) -> Result<DispersionMode, AppError> {
        match self.mode.as_deref() {
            None => Ok(DispersionMode::Population),
            Some(raw) => raw
                .parse::<DispersionMode>()
                .map_err(|e| AppError::BadRequest(e.to_string())),
        }
    }
}

async fn fetch_window(state: &AppState, days: u32) -> Result<PriceSeries, AppError> {
    let end = Utc::now();
    let start = end - Duration::days(i64::from(days));
    let series = state.provider.fetch_history(&state.symbol, start, end).await?;
    tracing::debug!(days, samples = series.len(), "Fetched price window.");
    Ok(series)
}

/// # GET /api/history
/// The trailing daily closes, oldest first.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let days = query.days(&state)?;
    let series = fetch_window(&state, days).await?;
    Ok(Json(series.samples().iter().map(HistoryEntry::from).collect()))
}

/// # GET /api/price?date=YYYY-MM-DD
pub async fn get_price_at(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<HistoryEntry>, AppError> {
    let raw = query
        .date
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter 'date'".to_string()))?;
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("'date' must be formatted YYYY-MM-DD, got '{}'", raw)))?;

    match state.provider.fetch_price_at(&state.symbol, date).await {
        Ok(sample) => Ok(Json(HistoryEntry::from(&sample))),
        Err(ApiError::NoData(message)) => Err(AppError::NotFound(message)),
        Err(e) => Err(e.into()),
    }
}

/// # GET /api/latest
pub async fn get_latest(State(state): State<Arc<AppState>>) -> Result<Json<HistoryEntry>, AppError> {
    let sample = state.provider.fetch_latest(&state.symbol).await?;
    Ok(Json(HistoryEntry::from(&sample)))
}

/// # GET /api/std
pub async fn get_std(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<StatisticsResult>, AppError> {
    let (days, mode) = (query.days(&state)?, query.mode()?);
    let series = fetch_window(&state, days).await?;
    Ok(Json(state.engine.summarize(&series, mode)?))
}

/// # GET /api/zscore
/// Scores the most recent close against the trailing window.
pub async fn get_zscore(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ZScoreResponse>, AppError> {
    let (days, mode) = (query.days(&state)?, query.mode()?);
    let series = fetch_window(&state, days).await?;
    Ok(Json(state.engine.score_latest(&series, mode)?.into()))
}

/// # GET /api/signal
/// The z-score of the most recent close together with its market-condition band.
pub async fn get_signal(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<SignalResponse>, AppError> {
    let (days, mode) = (query.days(&state)?, query.mode()?);
    let series = fetch_window(&state, days).await?;
    let report = state.engine.signal(&series, mode)?;
    tracing::info!(zscore = report.score.zscore, condition = %report.condition, "Computed market signal.");
    Ok(Json(report.into()))
}
