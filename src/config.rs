use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; the in-memory catalog is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Path to a JSON catalog seed; the built-in seed is used when unset
    #[serde(default)]
    pub seed_path: Option<String>,

    /// Directory served under `/appliance_images`
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// Electricity price per kWh used for annual cost estimates
    #[serde(default = "default_price_per_kwh")]
    pub price_per_kwh: f64,

    /// Grid carbon intensity in gCO2/kWh, reported alongside recommendations
    #[serde(default = "default_carbon_intensity")]
    pub carbon_intensity: u32,

    /// Upper bound for a single catalog read, in milliseconds
    #[serde(default = "default_catalog_timeout_ms")]
    pub catalog_timeout_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_image_dir() -> String {
    "appliance_images".to_string()
}

fn default_price_per_kwh() -> f64 {
    7.50
}

fn default_carbon_intensity() -> u32 {
    280
}

fn default_catalog_timeout_ms() -> u64 {
    2000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            seed_path: None,
            image_dir: default_image_dir(),
            price_per_kwh: default_price_per_kwh(),
            carbon_intensity: default_carbon_intensity(),
            catalog_timeout_ms: default_catalog_timeout_ms(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of `KEY=value` pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
