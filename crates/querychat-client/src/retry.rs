//! Bounded retries around [`RequestTransport`].

use std::time::Duration;

use tracing::warn;

use crate::message::HistoryEntry;
use crate::rate_limit::RateLimitExceeded;
use crate::transport::{RequestTransport, TransportError, TransportResponse};
use crate::validator::ValidationError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Every way a submission can end without a usable payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),
    #[error("No se pudo conectar con el servidor")]
    Connectivity { attempts: u32, last: TransportError },
    #[error("Error inesperado: {0}")]
    Fatal(TransportError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first try; zero is treated as one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run the transport until it succeeds, fails fatally, or runs out of
    /// attempts. Attempts are strictly sequential, each with its own timeout.
    pub async fn run(
        &self,
        transport: &RequestTransport,
        query: &str,
        history: &[HistoryEntry],
    ) -> Result<TransportResponse, PipelineError> {
        let mut attempt = 1;
        loop {
            match transport.send(query, history).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_transient() => return Err(PipelineError::Fatal(e)),
                Err(e) if attempt >= self.max_attempts => {
                    warn!(attempts = attempt, error = %e, "giving up on query backend");
                    return Err(PipelineError::Connectivity {
                        attempts: attempt,
                        last: e,
                    });
                }
                Err(e) => {
                    warn!(attempt, max = self.max_attempts, error = %e, "transient failure, retrying");
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
