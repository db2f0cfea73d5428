use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub statistics: StatisticsConfig,
    pub logging: LoggingConfig,
}

/// Where the HTTP API listens and who may call it from a browser.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Settings for the upstream market-data provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the chart API (e.g., "https://query1.finance.yahoo.com").
    pub base_url: String,
    /// The ticker to price (e.g., "BTC-USD").
    pub symbol: String,
    /// Sent on every request; the provider rejects clients without a browser UA.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parameters for the trailing statistics window.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsConfig {
    /// Default number of trailing days when a request does not specify one.
    pub window_days: u32,
    /// Upper bound accepted from callers.
    pub max_window_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Checks invariants that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.symbol must not be empty".to_string(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.statistics.window_days == 0 {
            return Err(ConfigError::ValidationError(
                "statistics.window_days must be greater than zero".to_string(),
            ));
        }
        if self.statistics.window_days > self.statistics.max_window_days {
            return Err(ConfigError::ValidationError(format!(
                "statistics.window_days ({}) exceeds statistics.max_window_days ({})",
                self.statistics.window_days, self.statistics.max_window_days
            )));
        }
        Ok(())
    }
}
