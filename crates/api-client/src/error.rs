use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The provider responded with HTTP status {0}")]
    Status(u16),

    #[error("The provider returned an error: {code}: {description}")]
    Provider { code: String, description: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("No price data available: {0}")]
    NoData(String),
}
