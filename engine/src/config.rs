use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub metrics_addr: String,
    pub redis_url: String,
    pub store_timeout: Duration,
    /// When set, coefficients are served from this JSON file instead of Redis.
    pub coefficients_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Self {
        let bind_addr = env::var("BIDDING_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let metrics_addr = env::var("METRICS_BIND").unwrap_or_else(|_| "0.0.0.0:9000".to_string());
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let store_timeout_ms = env::var("STORE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(250);

        let coefficients_file = env::var("COEFFICIENTS_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Config {
            bind_addr,
            metrics_addr,
            redis_url,
            store_timeout: Duration::from_millis(store_timeout_ms),
            coefficients_file,
        }
    }
}
