use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_server: ServerConfig,
    /// Version segment used in route prefixes and response envelopes
    pub api_version: String,
    pub upstream: UpstreamConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the link-shortening API, without a trailing slash
    pub base_url: String,
    #[serde(default = "UpstreamConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "UpstreamConfig::default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Trailing window, in days, that click counts are averaged over
    #[serde(default = "MetricsConfig::default_window_days")]
    pub window_days: NonZeroU32,
}

impl UpstreamConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api-ssl.bitly.com/v4";

    const fn default_timeout_secs() -> u64 {
        10
    }

    fn default_user_agent() -> String {
        format!("clickmap/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: Self::default_timeout_secs(),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl MetricsConfig {
    pub const DEFAULT_WINDOW_DAYS: NonZeroU32 = match NonZeroU32::new(30) {
        Some(days) => days,
        None => unreachable!(),
    };

    const fn default_window_days() -> NonZeroU32 {
        Self::DEFAULT_WINDOW_DAYS
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            window_days: Self::default_window_days(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable lookup, applying defaults for
    /// anything unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_host = get("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let api_port = get("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let api_version = get("API_VERSION").unwrap_or_else(|| "v0.1".to_string());
        if api_version.is_empty() || api_version.contains('/') {
            bail!("API_VERSION must be a single non-empty path segment");
        }

        let base_url = get("BITLY_API_BASE_URL")
            .unwrap_or_else(|| UpstreamConfig::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?
                .max(1),
            None => UpstreamConfig::default_timeout_secs(),
        };

        let user_agent =
            get("UPSTREAM_USER_AGENT").unwrap_or_else(UpstreamConfig::default_user_agent);

        let window_days = match get("METRICS_WINDOW_DAYS") {
            Some(v) => {
                let days = v
                    .parse::<u32>()
                    .context("METRICS_WINDOW_DAYS must be a whole number of days")?;
                NonZeroU32::new(days).context("METRICS_WINDOW_DAYS must be greater than zero")?
            }
            None => MetricsConfig::DEFAULT_WINDOW_DAYS,
        };

        Ok(Config {
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            api_version,
            upstream: UpstreamConfig {
                base_url,
                timeout_secs,
                user_agent,
            },
            metrics: MetricsConfig { window_days },
        })
    }
}
