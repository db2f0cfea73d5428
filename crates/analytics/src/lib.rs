//! # BTC Stats Analytics Engine
//!
//! Descriptive statistics over a trailing window of prices: mean, population or
//! sample standard deviation, the z-score of a value against the window, and the
//! mapping of that z-score onto a market-condition band.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of external systems. It depends
//!   only on `core-types`, performs no I/O and does not log.
//! - **Typed Failures:** Empty input and zero dispersion are reported as
//!   `AnalyticsError` variants. Nothing is silently coerced to `0.0`.
//! - **Explicit Convention:** Every dispersion-dependent call takes a
//!   `DispersionMode`; there is no default denominator.
//!
//! ## Public API
//!
//! - `mean`, `variance`, `stddev`, `zscore`: free functions over `&[f64]`.
//! - `classify_market_condition`: z-score to `MarketCondition`.
//! - `StatisticsEngine`: applies the above to a `PriceSeries`.
//! - `StatisticsResult`, `ZScoreResult`, `SignalReport`: serializable outputs.

pub mod condition;
pub mod engine;
pub mod error;
pub mod report;

pub use condition::classify_market_condition;
pub use engine::{StatisticsEngine, mean, stddev, variance, zscore};
pub use error::AnalyticsError;
pub use report::{SignalReport, StatisticsResult, ZScoreResult};
