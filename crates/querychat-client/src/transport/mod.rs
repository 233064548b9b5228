//! One bounded round trip to the query backend.
//!
//! [`RequestTransport`] owns the timeout and latency measurement; the
//! actual I/O is behind [`QueryBackend`] so tests can script it.

mod http;

pub use http::HttpBackend;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::message::HistoryEntry;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_COLD_START_THRESHOLD: Duration = Duration::from_millis(3000);

/// Body of the backend request: the new question plus the prior conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("{0}")]
    Fatal(String),
}

impl TransportError {
    /// Whether an immediate retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::Connection(_))
    }
}

/// A decoded, not yet validated, backend reply.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub payload: serde_json::Value,
    pub elapsed: Duration,
    pub is_cold_start: bool,
}

#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn post_query(&self, request: &QueryRequest) -> Result<serde_json::Value, TransportError>;
}

pub struct RequestTransport {
    backend: Arc<dyn QueryBackend>,
    timeout: Duration,
    cold_start_threshold: Duration,
}

impl RequestTransport {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
            cold_start_threshold: DEFAULT_COLD_START_THRESHOLD,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cold_start_threshold(mut self, threshold: Duration) -> Self {
        self.cold_start_threshold = threshold;
        self
    }

    /// Send one request. The backend future is dropped on timeout, which
    /// aborts the underlying call.
    pub async fn send(
        &self,
        query: &str,
        history: &[HistoryEntry],
    ) -> Result<TransportResponse, TransportError> {
        let request = QueryRequest {
            query: query.to_string(),
            history: history.to_vec(),
        };

        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.backend.post_query(&request)).await;
        let elapsed = started.elapsed();

        match result {
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "query request timed out");
                Err(TransportError::Timeout)
            }
            Ok(Err(e)) => {
                debug!(error = %e, elapsed_ms = elapsed.as_millis() as u64, "query request failed");
                Err(e)
            }
            Ok(Ok(payload)) => {
                let is_cold_start = elapsed >= self.cold_start_threshold;
                if is_cold_start {
                    info!(elapsed_ms = elapsed.as_millis() as u64, "slow response, backend was cold");
                } else {
                    debug!(elapsed_ms = elapsed.as_millis() as u64, "query response received");
                }
                Ok(TransportResponse {
                    payload,
                    elapsed,
                    is_cold_start,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::testing::{Step, StubBackend};
    use serde_json::json;

    fn transport(backend: &Arc<StubBackend>) -> RequestTransport {
        RequestTransport::new(backend.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn fast_success_is_not_cold_start() {
        let backend = StubBackend::always(Step::respond_after(200, json!({ "sql": "SELECT 1" })));
        let response = transport(&backend).send("q", &[]).await.unwrap();
        assert!(!response.is_cold_start);
        assert!(response.elapsed >= Duration::from_millis(200));
        assert_eq!(response.payload["sql"], "SELECT 1");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_success_is_cold_start() {
        let backend = StubBackend::always(Step::respond_after(3500, json!({})));
        let response = transport(&backend).send("q", &[]).await.unwrap();
        assert!(response.is_cold_start);
    }

    #[tokio::test(start_paused = true)]
    async fn threshold_itself_counts_as_cold_start() {
        let backend = StubBackend::always(Step::respond_after(3000, json!({})));
        let response = transport(&backend).send("q", &[]).await.unwrap();
        assert!(response.is_cold_start);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_backend_times_out_after_thirty_seconds() {
        let backend = StubBackend::always(Step::Hang);
        let started = Instant::now();
        let err = transport(&backend).send("q", &[]).await.unwrap_err();
        assert_eq!(err, TransportError::Timeout);
        assert!(err.is_transient());
        assert!(started.elapsed() >= DEFAULT_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_timeout_is_honoured() {
        let backend = StubBackend::always(Step::Hang);
        let transport = transport(&backend).with_timeout(Duration::from_secs(2));
        let started = Instant::now();
        assert_eq!(transport.send("q", &[]).await.unwrap_err(), TransportError::Timeout);
        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(started.elapsed() < DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn backend_errors_pass_through() {
        let backend = StubBackend::always(Step::Fail(TransportError::Fatal("boom".into())));
        let err = transport(&backend).send("q", &[]).await.unwrap_err();
        assert_eq!(err, TransportError::Fatal("boom".into()));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn request_carries_query_and_history() {
        let backend = StubBackend::always(Step::respond(json!({})));
        let history = vec![HistoryEntry {
            role: Role::User,
            content: "anterior".into(),
        }];
        transport(&backend).send("nueva", &history).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "nueva");
        assert_eq!(requests[0].history, history);
    }

    #[test]
    fn request_serializes_to_backend_contract() {
        let request = QueryRequest {
            query: "¿Cuantos jugadores hay?".into(),
            history: vec![HistoryEntry {
                role: Role::Assistant,
                content: "hola".into(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "query": "¿Cuantos jugadores hay?",
                "history": [{ "role": "assistant", "content": "hola" }],
            })
        );
    }
}
