use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub proxy_endpoint: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn new(proxy_endpoint: impl Into<String>) -> Self {
        Self {
            proxy_endpoint: proxy_endpoint.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn from_env() -> Result<Self> {
        let proxy_endpoint = std::env::var("AGENT_LOOKUP_PROXY_URL").map_err(|_| {
            anyhow!("AGENT_LOOKUP_PROXY_URL not set. Set it to your proxy endpoint URL.")
        })?;

        let timeout_secs = std::env::var("AGENT_LOOKUP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            proxy_endpoint,
            timeout_secs,
        })
    }
}
