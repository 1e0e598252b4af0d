//! Shared HTTP client for the nutrition API.
//!
//! One `ureq::Agent` is built per process and cloned into every call. Two hooks wrap each
//! request: [`ApiClient::on_request`] logs the outgoing call and rejects malformed URLs,
//! and [`normalize_error`] maps failed responses onto the user-facing [`ApiError`]
//! variants.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};
use crate::metadata::USER_AGENT;

pub const BASE_URL_ENV: &str = "NUTRITION_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL, Self::DEFAULT_TIMEOUT)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T>(&self, path: String) -> ApiResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.execute("GET", path, None).await
    }

    pub(crate) async fn post<B, T>(&self, path: String, body: &B) -> ApiResult<T>
    where
        B: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        let body = serde_json::to_value(body)?;
        self.execute("POST", path, Some(body)).await
    }

    async fn execute<T>(
        &self,
        method: &'static str,
        path: String,
        body: Option<serde_json::Value>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.on_request(method, &path)?;
        let agent = self.agent.clone();

        let joined = tokio::task::spawn_blocking(move || -> ApiResult<T> {
            let request = agent
                .request(method, &url)
                .set("Content-Type", "application/json");
            let sent = match body {
                Some(body) => request.send_json(body),
                None => request.call(),
            };
            let response = sent.map_err(normalize_error)?;
            let text = response.into_string()?;
            Ok(serde_json::from_str(&text)?)
        })
        .await;

        joined.map_err(|e| {
            ApiError::Io(std::io::Error::other(format!(
                "spawn_blocking failed: {}",
                e
            )))
        })?
    }

    /// Outgoing hook: log the call and refuse URLs that cannot be sent.
    fn on_request(&self, method: &str, path: &str) -> ApiResult<String> {
        let url = format!("{}{}", self.base_url, path);
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            let err = ApiError::InvalidUrl {
                url,
                reason: "expected an http:// or https:// base URL".to_string(),
            };
            tracing::error!(error = %err, "api request error");
            return Err(err);
        }
        tracing::debug!(method, url = %url, "api request");
        Ok(url)
    }
}

/// Incoming hook: classify a failed call. Unclassified errors are returned unchanged.
pub fn normalize_error(err: ureq::Error) -> ApiError {
    tracing::error!(error = %err, "api response error");
    match err {
        ureq::Error::Status(404, _) => ApiError::NotFound,
        ureq::Error::Status(status, _) if status >= 500 => ApiError::Server { status },
        ureq::Error::Transport(ref transport) if is_timeout(transport) => ApiError::Timeout,
        other => ApiError::Http(Box::new(other)),
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ) {
                return true;
            }
        }
        source = err.source();
    }
    transport.to_string().contains("timed out")
}
