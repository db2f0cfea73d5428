use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: the price series is empty")]
    EmptySeries,

    #[error("Z-score is undefined: the price series has zero standard deviation")]
    ZeroDeviation,
}
