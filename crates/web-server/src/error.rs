use analytics::AnalyticsError;
use api_client::error::ApiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Provider error: {0}")]
    Provider(#[from] ApiError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Provider(api_err) => {
                tracing::error!(error = ?api_err, "Price provider error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to fetch price data: {}", api_err),
                )
            }
            AppError::Analytics(AnalyticsError::EmptySeries) => {
                tracing::error!("Statistics requested over an empty price window.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No price data available for the requested window".to_string(),
                )
            }
            AppError::Analytics(AnalyticsError::ZeroDeviation) => {
                tracing::error!("Z-score requested over a window with no dispersion.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Z-score is undefined: the price window has no dispersion".to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
