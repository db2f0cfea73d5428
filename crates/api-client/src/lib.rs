use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use configuration::ProviderConfig;
use core_types::{PriceSample, PriceSeries};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

pub mod error;
pub mod responses;
// --- Public API ---
pub use responses::{ChartError, ChartResponse};

/// The abstract interface for a source of historical daily prices.
/// The web server and CLI only ever talk to this trait, allowing the
/// underlying implementation (live or in-memory) to be swapped out.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetches the daily closes between `start` and `end`, oldest first.
    async fn fetch_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, ApiError>;

    /// Fetches the most recent close.
    async fn fetch_latest(&self, symbol: &str) -> Result<PriceSample, ApiError>;

    /// Fetches the close for a single UTC calendar day.
    async fn fetch_price_at(&self, symbol: &str, date: NaiveDate) -> Result<PriceSample, ApiError> {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);
        let series = self.fetch_history(symbol, start, end).await?;

        series
            .samples()
            .iter()
            .find(|s| s.date() == date)
            .copied()
            .ok_or_else(|| ApiError::NoData(format!("no {} price for {}", symbol, date)))
    }
}

/// A concrete implementation of the `SeriesProvider` for the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(provider: &ProviderConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&provider.user_agent)
                .map_err(|e| ApiError::InvalidData(format!("Invalid User-Agent: {}", e)))?,
        );

        Ok(Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(provider.timeout())
                .build()?,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<PriceSeries, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        tracing::debug!(%url, ?query, "Requesting chart data.");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        decode_chart(status, &text)
    }
}

/// Turns a chart API response into a series.
///
/// Non-success responses that still carry a `chart.error` block surface as
/// `ApiError::Provider`; anything else non-successful is `ApiError::Status`.
fn decode_chart(status: StatusCode, text: &str) -> Result<PriceSeries, ApiError> {
    if status.is_success() {
        serde_json::from_str::<ChartResponse>(text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?
            .into_series()
    } else {
        match serde_json::from_str::<ChartResponse>(text) {
            Ok(body) if body.chart.error.is_some() => body.into_series(),
            _ => Err(ApiError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl SeriesProvider for YahooClient {
    async fn fetch_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, ApiError> {
        self.get_chart(
            symbol,
            &[
                ("interval", "1d".to_string()),
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
            ],
        )
        .await
    }

    async fn fetch_latest(&self, symbol: &str) -> Result<PriceSample, ApiError> {
        let series = self
            .get_chart(
                symbol,
                &[("interval", "1d".to_string()), ("range", "5d".to_string())],
            )
            .await?;

        series
            .latest()
            .copied()
            .ok_or_else(|| ApiError::NoData(format!("no recent {} price", symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Serves a fixed series regardless of the requested window.
    struct FixedProvider(Vec<PriceSample>);

    #[async_trait]
    impl SeriesProvider for FixedProvider {
        async fn fetch_history(
            &self,
            _symbol: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<PriceSeries, ApiError> {
            Ok(PriceSeries::new(
                self.0
                    .iter()
                    .filter(|s| s.timestamp >= start && s.timestamp < end)
                    .copied()
                    .collect(),
            ))
        }

        async fn fetch_latest(&self, _symbol: &str) -> Result<PriceSample, ApiError> {
            self.0.last().copied().ok_or_else(|| ApiError::NoData("empty".to_string()))
        }
    }

    fn day(d: u32, price: f64) -> PriceSample {
        PriceSample::new(Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap(), price)
    }

    #[tokio::test]
    async fn price_at_picks_the_requested_day() {
        let provider = FixedProvider(vec![day(1, 60000.0), day(2, 61000.0), day(3, 62000.0)]);

        let sample = provider
            .fetch_price_at("BTC-USD", NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(sample.price, 61000.0);
    }

    #[tokio::test]
    async fn price_at_without_data_is_no_data() {
        let provider = FixedProvider(vec![day(1, 60000.0)]);

        let err = provider
            .fetch_price_at("BTC-USD", NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NoData(_)));
    }

    #[test]
    fn error_status_with_chart_error_is_a_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        match decode_chart(StatusCode::NOT_FOUND, body) {
            Err(ApiError::Provider { code, description }) => {
                assert_eq!(code, "Not Found");
                assert!(description.contains("delisted"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_chart_body_is_a_status_error() {
        let body = "<html><body>Service Unavailable</body></html>";

        assert!(matches!(
            decode_chart(StatusCode::SERVICE_UNAVAILABLE, body),
            Err(ApiError::Status(503))
        ));
    }

    #[test]
    fn malformed_success_body_is_a_deserialization_error() {
        assert!(matches!(
            decode_chart(StatusCode::OK, "{\"chart\": [oops"),
            Err(ApiError::Deserialization(_))
        ));
    }

    #[test]
    fn success_body_decodes_into_series() {
        let body = r#"{"chart":{"result":[{"timestamp":[1704067200],
            "indicators":{"quote":[{"close":[42280.25]}]}}],"error":null}}"#;

        let series = decode_chart(StatusCode::OK, body).unwrap();
        assert_eq!(series.prices(), vec![42280.25]);
    }

    #[test]
    fn client_rejects_unprintable_user_agent() {
        let config = ProviderConfig {
            base_url: "https://query1.finance.yahoo.com/".to_string(),
            symbol: "BTC-USD".to_string(),
            user_agent: "bad\nagent".to_string(),
            timeout_secs: 5,
        };

        assert!(matches!(YahooClient::new(&config), Err(ApiError::InvalidData(_))));
    }
}
