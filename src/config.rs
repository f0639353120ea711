use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub transportapi_app_id: String,
    pub transportapi_app_key: String,
    pub transportapi_base_url: String,
    pub cache_ttl_minutes: i64,
    pub http_timeout_secs: u64,
    pub historical_data_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            // Credentials are always externally supplied; no fallback values.
            transportapi_app_id: env::var("APP_ID")
                .map_err(|_| anyhow::anyhow!("APP_ID not set"))?,
            transportapi_app_key: env::var("APP_KEY")
                .map_err(|_| anyhow::anyhow!("APP_KEY not set"))?,
            transportapi_base_url: env::var("TRANSPORTAPI_BASE_URL")
                .unwrap_or_else(|_| "https://transportapi.com".to_string()),
            cache_ttl_minutes: env::var("CACHE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            historical_data_path: env::var("HISTORICAL_DATA_PATH")
                .unwrap_or_else(|_| "./historical_delays.csv".to_string()),
        })
    }
}
