use serde::{Deserialize, Serialize};

/// Client-side submission cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    /// Window length in seconds (valid range: 60-604800).
    pub period_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 50,
            period_secs: 86_400,
        }
    }
}
