use crate::condition::classify_market_condition;
use crate::error::AnalyticsError;
use crate::report::{SignalReport, StatisticsResult, ZScoreResult};
use core_types::{DispersionMode, PriceSeries};

/// Running count, mean and sum of squared deviations (Welford's update).
///
/// A constant input keeps `mean` bit-equal to the constant and `m2` at exactly
/// zero, which is what lets `zscore` detect a degenerate window reliably.
struct Moments {
    n: usize,
    mean: f64,
    m2: f64,
}

impl Moments {
    fn of(values: &[f64]) -> Result<Self, AnalyticsError> {
        if values.is_empty() {
            return Err(AnalyticsError::EmptySeries);
        }

        let mut moments = Moments { n: 0, mean: 0.0, m2: 0.0 };
        for &value in values {
            moments.n += 1;
            let diff_a = value - moments.mean;
            moments.mean += diff_a / moments.n as f64;
            let diff_b = value - moments.mean;
            moments.m2 += diff_a * diff_b;
        }
        Ok(moments)
    }

    fn variance(&self, mode: DispersionMode) -> f64 {
        let denominator = match mode {
            DispersionMode::Population => self.n,
            DispersionMode::Sample if self.n > 1 => self.n - 1,
            // The unbiased estimator is undefined for a single sample, so fall back to `n`.
            DispersionMode::Sample => self.n,
        };
        self.m2 / denominator as f64
    }

    fn zscore(&self, value: f64, mode: DispersionMode) -> Result<f64, AnalyticsError> {
        let stddev = self.variance(mode).sqrt();
        if stddev == 0.0 {
            return Err(AnalyticsError::ZeroDeviation);
        }
        Ok((value - self.mean) / stddev)
    }
}

/// Arithmetic mean of `values`.
pub fn mean(values: &[f64]) -> Result<f64, AnalyticsError> {
    Ok(Moments::of(values)?.mean)
}

/// Variance of `values` under the given denominator convention.
///
/// `DispersionMode::Sample` with a single value divides by `n` (= 1) and
/// therefore yields `0.0`; this is a deliberate policy, not an estimate.
pub fn variance(values: &[f64], mode: DispersionMode) -> Result<f64, AnalyticsError> {
    Ok(Moments::of(values)?.variance(mode))
}

/// Square root of [`variance`].
pub fn stddev(values: &[f64], mode: DispersionMode) -> Result<f64, AnalyticsError> {
    variance(values, mode).map(f64::sqrt)
}

/// Number of standard deviations `value` lies from the mean of `values`.
///
/// `value` does not have to be a member of `values`. A window with no
/// dispersion fails with `AnalyticsError::ZeroDeviation`.
pub fn zscore(value: f64, values: &[f64], mode: DispersionMode) -> Result<f64, AnalyticsError> {
    Moments::of(values)?.zscore(value, mode)
}

/// A stateless calculator that applies the statistics functions to a `PriceSeries`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Mean and standard deviation of the whole series.
    pub fn summarize(
        &self,
        series: &PriceSeries,
        mode: DispersionMode,
    ) -> Result<StatisticsResult, AnalyticsError> {
        let moments = Moments::of(&series.prices())?;
        Ok(StatisticsResult {
            mean: moments.mean,
            stddev: moments.variance(mode).sqrt(),
        })
    }

    /// Scores the most recent sample against the whole series, itself included.
    pub fn score_latest(
        &self,
        series: &PriceSeries,
        mode: DispersionMode,
    ) -> Result<ZScoreResult, AnalyticsError> {
        let latest = series.latest().ok_or(AnalyticsError::EmptySeries)?;
        let moments = Moments::of(&series.prices())?;
        let zscore = moments.zscore(latest.price, mode)?;

        Ok(ZScoreResult {
            value: latest.price,
            mean: moments.mean,
            stddev: moments.variance(mode).sqrt(),
            zscore,
        })
    }

    /// [`Self::score_latest`] plus the market-condition band of the score.
    pub fn signal(
        &self,
        series: &PriceSeries,
        mode: DispersionMode,
    ) -> Result<SignalReport, AnalyticsError> {
        let score = self.score_latest(series, mode)?;
        Ok(SignalReport {
            condition: classify_market_condition(score.zscore),
            score,
        })
    }
}
