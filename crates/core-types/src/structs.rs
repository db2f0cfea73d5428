use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single closing price reported by the market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceSample {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// The UTC calendar day this sample belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// A finite run of price samples, ordered by timestamp ascending.
///
/// The series may be empty; callers that need at least one sample get a typed
/// error from the analytics crate rather than a silent zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

impl PriceSeries {
    /// Builds a series, stable-sorting the samples by timestamp.
    pub fn new(mut samples: Vec<PriceSample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    /// The bare price column, in timestamp order.
    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    pub fn into_samples(self) -> Vec<PriceSample> {
        self.samples
    }
}

impl From<Vec<PriceSample>> for PriceSeries {
    fn from(samples: Vec<PriceSample>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, price: f64) -> PriceSample {
        PriceSample::new(Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(), price)
    }

    #[test]
    fn new_orders_samples_by_timestamp() {
        let series = PriceSeries::new(vec![at(3, 30.0), at(1, 10.0), at(2, 20.0)]);

        assert_eq!(series.prices(), vec![10.0, 20.0, 30.0]);
        assert_eq!(series.latest().map(|s| s.price), Some(30.0));
    }

    #[test]
    fn empty_series_has_no_latest() {
        let series = PriceSeries::default();

        assert!(series.is_empty());
        assert!(series.latest().is_none());
        assert!(series.prices().is_empty());
    }

    #[test]
    fn sample_date_is_utc_calendar_day() {
        let sample = PriceSample::new(Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap(), 1.0);
        assert_eq!(sample.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }
}
