//! Backend endpoint and request-pipeline configuration.

use serde::{Deserialize, Serialize};

/// Where queries are sent and how each round trip is bounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Query endpoint (receives `{query, history}` as JSON).
    pub url: String,
    /// Hard timeout per attempt in seconds (valid range: 1-300).
    pub timeout_secs: u32,
    /// TCP connect timeout in seconds (valid range: 1-60).
    pub connect_timeout_secs: u32,
    /// A successful response slower than this is reported as a cold start.
    pub cold_start_threshold_ms: u32,
    /// Total attempts per submission, first try included (valid range: 1-10).
    pub max_attempts: u32,
    /// Pause between attempts.
    pub retry_delay_ms: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/api/query".into(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            cold_start_threshold_ms: 3000,
            max_attempts: 3,
            retry_delay_ms: 0,
        }
    }
}
