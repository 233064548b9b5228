//! reqwest implementation of [`QueryBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::{QueryBackend, QueryRequest, TransportError};

/// Posts queries as JSON to a single backend endpoint.
pub struct HttpBackend {
    url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    /// The overall request deadline is enforced by `RequestTransport`, so
    /// only the connect phase is bounded here.
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Fatal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QueryBackend for HttpBackend {
    async fn post_query(&self, request: &QueryRequest) -> Result<serde_json::Value, TransportError> {
        debug!(url = %self.url, history = request.history.len(), "query request");

        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if is_gateway_status(status) {
            return Err(TransportError::Connection(format!("HTTP {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&text)
                .map_err(|e| TransportError::Fatal(format!("invalid JSON response: {e}")));
        }

        // A JSON error body still follows the response contract.
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(body) if body.get("error").is_some() => Ok(body),
            _ => {
                let text = text.chars().take(200).collect::<String>();
                Err(TransportError::Fatal(format!("HTTP {status}: {text}")))
            }
        }
    }
}

fn classify_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() || e.is_request() {
        TransportError::Connection(e.to_string())
    } else {
        TransportError::Fatal(e.to_string())
    }
}

/// Statuses a proxy returns while the backend is starting or unreachable.
fn is_gateway_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}
