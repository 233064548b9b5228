//! ChatSession struct, construction, and the non-network operations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::message::Message;
use crate::rate_limit::{RateLimitInfo, RateLimiter};
use crate::retry::RetryPolicy;
use crate::store::SnapshotStore;
use crate::transport::RequestTransport;

use super::types::{ConversationState, SessionPhase};

pub struct ChatSession {
    pub(super) state: Mutex<ConversationState>,
    /// Single in-flight submission slot.
    pub(super) busy: AtomicBool,
    /// Bumped by every clear, under the state lock. A reply whose submission
    /// started in an earlier generation is dropped.
    pub(super) generation: AtomicU64,
    pub(super) transport: RequestTransport,
    pub(super) retry: RetryPolicy,
    pub(super) rate_limiter: RateLimiter,
    pub(super) store: SnapshotStore,
    pub(super) clock: Arc<dyn Clock>,
}

impl ChatSession {
    /// A session with empty state. Call [`ChatSession::rehydrate`] to pick
    /// up a previously saved conversation.
    pub fn new(transport: RequestTransport, store: SnapshotStore) -> Self {
        Self {
            state: Mutex::new(ConversationState::default()),
            busy: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            transport,
            retry: RetryPolicy::default(),
            rate_limiter: RateLimiter::default(),
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Clock used for message and snapshot timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the state with the latest saved snapshot, if any.
    ///
    /// An unreadable snapshot is logged and the session starts empty; it is
    /// overwritten by the next mutation.
    pub fn rehydrate(self) -> Self {
        match self.store.load() {
            Ok(Some(saved)) => {
                info!(messages = saved.messages.len(), "conversation restored");
                let mut state = self.lock_state();
                state.messages = saved.messages;
                state.history = saved.history;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to restore conversation, starting empty"),
        }
        self
    }

    /// A copy of the current state.
    pub fn state(&self) -> ConversationState {
        self.lock_state().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock_state().messages.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().is_loading
    }

    /// Empty the conversation and make sure it stays empty across restarts.
    pub fn clear_history(&self) {
        let now = self.clock.now();
        let mut state = self.lock_state();
        self.generation.fetch_add(1, Ordering::SeqCst);
        state.messages.clear();
        state.history.clear();
        state.error = None;
        state.is_loading = false;
        state.phase = SessionPhase::Idle;

        if let Err(e) = self.store.mark_cleared(now) {
            warn!(error = %e, "failed to record clear marker");
        }
        self.persist(&state);
        info!("conversation cleared");
    }

    /// Not persisted; a later slow response raises it again.
    pub fn dismiss_cold_start_warning(&self) {
        self.lock_state().cold_start_warning = false;
    }

    /// Not persisted; a later denial raises it again.
    pub fn dismiss_rate_limit_warning(&self) {
        self.lock_state().rate_limit_warning = false;
    }

    pub fn rate_limit_info(&self) -> RateLimitInfo {
        self.rate_limiter.info()
    }

    pub fn reset_rate_limit(&self) {
        self.rate_limiter.reset();
    }

    pub(super) fn lock_state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the snapshot for `state`. Called with the state lock held so
    /// writes follow mutations in order.
    pub(super) fn persist(&self, state: &ConversationState) {
        if let Err(e) = self
            .store
            .save(&state.history, &state.messages, self.clock.now())
        {
            warn!(error = %e, "failed to persist conversation");
        }
    }
}
