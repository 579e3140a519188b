//! Application settings loaded from `config/romana.toml` plus `ROMANA_*`
//! environment overrides.

use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/romana";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub rates: Option<Rates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

/// External exchange-rate provider settings. Defaults to the public
/// currency-api endpoint with a 10 second timeout.
#[derive(Debug, Deserialize)]
pub struct Rates {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let path = std::env::var("ROMANA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix("ROMANA").separator("__"))
            .set_default("app.level", "info")?
            .build()?
            .try_deserialize()
    }
}
