use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub currency: CurrencySettings,
    pub mock: MockSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory holding one JSON document per configuration key
    pub directory: PathBuf,
    /// Keep configuration in memory only
    pub ephemeral: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurrencySettings {
    pub symbol: String,
    pub decimals: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MockSettings {
    /// Artificial delay applied to every mock data request
    pub latency_ms: u64,
}

impl MockSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Load `config/dashboard.*` (optional) overridden by `DASHBOARD__SECTION__KEY`
/// environment variables.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("storage.directory", "data")?
        .set_default("storage.ephemeral", false)?
        .set_default("currency.symbol", "$")?
        .set_default("currency.decimals", 2)?
        .set_default("mock.latency_ms", 300)?)
}
