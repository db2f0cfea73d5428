use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, LoggingConfig, ProviderConfig, ServerConfig, StatisticsConfig};

/// Prefix for environment overrides, e.g. `BTC_STATS__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "BTC_STATS";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning: built-in defaults, then the TOML
/// file (`path`, or an optional `config.toml` in the working directory), then
/// `BTC_STATS__*` environment variables. The result is validated before it is
/// returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config").required(false),
    };

    load_layered(file, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.allowed_origins")
}

fn load_layered<S>(file: S, env: config::Environment) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = with_defaults(config::Config::builder())?
        .add_source(file)
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3001)?
        .set_default("server.allowed_origins", Vec::<String>::new())?
        .set_default("provider.base_url", "https://query1.finance.yahoo.com")?
        .set_default("provider.symbol", "BTC-USD")?
        .set_default(
            "provider.user_agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36",
        )?
        .set_default("provider.timeout_secs", 10)?
        .set_default("statistics.window_days", 30)?
        .set_default("statistics.max_window_days", 365)?
        .set_default("logging.level", "info")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("btc-stats-{}-{}.toml", name, std::process::id()));
        fs::write(&path, contents).expect("failed to write config file");
        path
    }

    #[test]
    fn file_overrides_defaults() {
        let path = write_config(
            "overrides",
            r#"
[server]
port = 8080
allowed_origins = ["http://localhost:3000"]

[statistics]
window_days = 90
"#,
        );

        let config = load_config(Some(path.as_path())).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(config.statistics.window_days, 90);
        assert_eq!(config.statistics.max_window_days, 365);
        assert_eq!(config.provider.symbol, "BTC-USD");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn window_larger_than_maximum_is_rejected() {
        let path = write_config(
            "window",
            r#"
[statistics]
window_days = 400
max_window_days = 365
"#,
        );

        let result = load_config(Some(path.as_path()));
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let path = write_config(
            "timeout",
            r#"
[provider]
timeout_secs = 0
"#,
        );

        let result = load_config(Some(path.as_path()));
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn environment_overrides_file_and_parses_origin_lists() {
        let path = write_config(
            "environment",
            r#"
[server]
port = 8080
allowed_origins = ["http://localhost:3000"]
"#,
        );

        let mut vars = config::Map::new();
        vars.insert("BTC_STATS__SERVER__PORT".to_string(), "8089".to_string());
        vars.insert(
            "BTC_STATS__SERVER__ALLOWED_ORIGINS".to_string(),
            "http://a.test,http://b.test".to_string(),
        );
        vars.insert("BTC_STATS__STATISTICS__WINDOW_DAYS".to_string(), "7".to_string());

        let result = load_layered(config::File::from(path.as_path()), environment().source(Some(vars)));
        fs::remove_file(&path).ok();
        let config = result.unwrap();

        assert_eq!(config.server.port, 8089);
        assert_eq!(
            config.server.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.statistics.window_days, 7);
    }

    #[test]
    fn invalid_environment_value_is_rejected() {
        let mut vars = config::Map::new();
        vars.insert("BTC_STATS__STATISTICS__WINDOW_DAYS".to_string(), "0".to_string());

        let result = load_layered(
            config::File::with_name("definitely-absent-config").required(false),
            environment().source(Some(vars)),
        );

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn missing_explicit_file_is_a_load_error() {
        let result = load_config(Some(Path::new("/definitely/not/here/config.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
