//! The submission pipeline: rate limit, retrying transport, validation.

use std::sync::atomic::Ordering;

use querychat_common::new_correlation_id;
use tracing::{debug, info, info_span, Instrument};

use crate::message::{HistoryEntry, Message};
use crate::retry::PipelineError;
use crate::validator::{validate, QueryResponse};

use super::manager::ChatSession;
use super::types::{BusyGuard, SessionPhase, SubmitOutcome, EMPTY_QUERY_ERROR};

/// What the pipeline hands back to the state machine.
struct Resolution {
    result: Result<QueryResponse, PipelineError>,
    cold_start: bool,
}

impl ChatSession {
    /// Send `query` to the backend and record the exchange.
    ///
    /// Never fails: every error becomes the content of the assistant
    /// message and the session's `error`.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            self.lock_state().error = Some(EMPTY_QUERY_ERROR.to_string());
            return SubmitOutcome::Rejected;
        }

        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("submission ignored, another one is in flight");
            return SubmitOutcome::Busy;
        };

        let span = info_span!("submit", cid = %new_correlation_id());
        async move {
            let (prior_history, generation) = self.begin(query);
            let resolution = self.resolve(query, &prior_history).await;
            SubmitOutcome::Completed(self.finish(resolution, generation))
        }
        .instrument(span)
        .await
    }

    /// Append the user message and enter `Submitting`. Returns the history
    /// as it was before this message, and the clear generation it belongs to.
    fn begin(&self, query: &str) -> (Vec<HistoryEntry>, u64) {
        let mut state = self.lock_state();
        let prior_history = state.history.clone();
        let generation = self.generation.load(Ordering::SeqCst);

        let message = Message::user(query, self.clock.now());
        state.history.push(HistoryEntry::from(&message));
        state.messages.push(message);
        state.is_loading = true;
        state.phase = SessionPhase::Submitting;
        state.error = None;
        state.cold_start_warning = false;
        state.rate_limit_warning = false;

        self.persist(&state);
        (prior_history, generation)
    }

    async fn resolve(&self, query: &str, history: &[HistoryEntry]) -> Resolution {
        if let Err(denied) = self.rate_limiter.check() {
            return Resolution {
                result: Err(denied.into()),
                cold_start: false,
            };
        }

        let response = match self.retry.run(&self.transport, query, history).await {
            Ok(response) => response,
            Err(e) => {
                return Resolution {
                    result: Err(e),
                    cold_start: false,
                }
            }
        };

        match validate(response.payload).into_result() {
            Ok(payload) => Resolution {
                result: Ok(payload),
                cold_start: response.is_cold_start,
            },
            Err(invalid) => Resolution {
                result: Err(invalid.into()),
                cold_start: false,
            },
        }
    }

    /// Append the single assistant message and leave `Submitting`.
    ///
    /// If the conversation was cleared while the request was in flight, the
    /// reply is returned but not recorded: the cleared state has no user
    /// message for it to answer.
    fn finish(&self, resolution: Resolution, generation: u64) -> Message {
        let now = self.clock.now();
        let rate_limited = matches!(resolution.result, Err(PipelineError::RateLimited(_)));
        let reply = match resolution.result {
            Ok(payload) => Message::assistant(payload, now),
            Err(e) => Message::assistant_error(e.to_string(), now),
        };
        debug!(error = ?reply.error, cold_start = resolution.cold_start, "submission resolved");

        let mut state = self.lock_state();
        if self.generation.load(Ordering::SeqCst) != generation {
            info!("conversation cleared during submission, reply discarded");
            return reply;
        }
        state.history.push(HistoryEntry::from(&reply));
        state.messages.push(reply.clone());
        state.is_loading = false;
        state.phase = SessionPhase::Resolved;
        state.cold_start_warning = resolution.cold_start;
        state.rate_limit_warning = rate_limited;
        state.error = reply.error.clone();

        self.persist(&state);
        reply
    }
}
