use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::Config;
use crate::error::LookupError;

/// Wire key for the agent code, used in both the proxy request body and the
/// host submission payload.
pub const AGENT_CODE_KEY: &str = "as_earned_AgentCode";
/// Wire key for the resolved agent name in the host submission payload.
pub const AGENT_NAME_KEY: &str = "as_earned_AgentName";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    pub data: Option<Value>,
}

#[async_trait]
pub trait LookupBackend: Send + Sync {
    async fn lookup(&self, code: &str) -> Result<LookupResponse, LookupError>;
}

/// Normalize a raw proxy response into the `{success, data}` shape. The
/// proxy is not under our control: legacy deployments return the payload
/// bare, without a `success` key, and are treated as successful.
pub fn normalize_response(raw: Value) -> LookupResponse {
    match raw.get("success") {
        Some(flag) => LookupResponse {
            success: flag.as_bool().unwrap_or(false),
            data: raw.get("data").cloned(),
        },
        None => {
            let data = raw
                .get("data")
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or(raw);
            LookupResponse {
                success: true,
                data: Some(data),
            }
        }
    }
}

/// HTTP client for the lookup proxy. The proxy holds the real API
/// credentials server-side; this client only ever sees the endpoint URL.
pub struct ProxyClient {
    endpoint: String,
    client: reqwest::Client,
}

impl ProxyClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("AgentLookup/1.0")
            .build()?;

        Ok(Self {
            endpoint: config.proxy_endpoint.clone(),
            client,
        })
    }
}

#[async_trait]
impl LookupBackend for ProxyClient {
    async fn lookup(&self, code: &str) -> Result<LookupResponse, LookupError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ AGENT_CODE_KEY: code }))
            .send()
            .await
            .map_err(LookupError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("proxy returned HTTP {status}: {body}");
            return Err(LookupError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(LookupError::Network)?;
        let raw: Value = serde_json::from_str(&body).map_err(LookupError::Parse)?;

        Ok(normalize_response(raw))
    }
}

/// In-process backend for tests and the standalone demo. Counts calls and
/// can delay its response to hold a lookup in flight.
pub struct MockBackend {
    raw: Value,
    fail_status: Option<u16>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockBackend {
    pub fn respond_with(raw: Value) -> Self {
        Self {
            raw,
            fail_status: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_with_status(status: u16) -> Self {
        Self {
            raw: Value::Null,
            fail_status: Some(status),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LookupBackend for MockBackend {
    async fn lookup(&self, _code: &str) -> Result<LookupResponse, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(status) = self.fail_status {
            return Err(LookupError::Remote {
                status,
                body: String::new(),
            });
        }

        Ok(normalize_response(self.raw.clone()))
    }
}
