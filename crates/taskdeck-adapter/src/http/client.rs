/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client plus request/response plumbing
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing response handling
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::http::error::{Operation, Result, TaskError};

/// Default task service location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// HTTP client for the task service
#[derive(Debug, Clone)]
pub struct TaskClient {
    http_client: Client,
    base_url: Url,
}

impl TaskClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| TaskError::unknown(format!("build http client: {err}")))?;

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(TaskError::unknown(format!(
                "base url cannot carry paths: {}",
                config.base_url
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL from path segments below the base URL. Segments are
    /// percent-encoded, so ids containing `/` stay a single segment.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| TaskError::unknown("base url cannot carry paths"))?;
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, url = %url, "sending task service request");
        self.http_client.request(method, url)
    }

    /// Send a request and return the raw body of a successful response.
    async fn dispatch(&self, builder: RequestBuilder, operation: Operation) -> Result<String> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let err = TaskError::from_transport(err);
                warn!(operation = operation.label(), kind = ?err.kind(), error = %err, "task service request failed");
                return Err(err);
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(TaskError::from_transport)?;
        if status.is_success() {
            return Ok(body);
        }

        let err = TaskError::from_status(operation, status, &body);
        warn!(
            operation = operation.label(),
            status = status.as_u16(),
            kind = ?err.kind(),
            error = %err,
            "task service returned an error"
        );
        Err(err)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: Operation,
    ) -> Result<T> {
        let body = self.dispatch(builder, operation).await?;
        serde_json::from_str(&body).map_err(|err| {
            warn!(operation = operation.label(), error = %err, "undecodable task service response");
            TaskError::unknown(format!("invalid response for {}: {err}", operation.label()))
        })
    }

    pub(crate) async fn send_text(
        &self,
        builder: RequestBuilder,
        operation: Operation,
    ) -> Result<String> {
        self.dispatch(builder, operation).await
    }
}
