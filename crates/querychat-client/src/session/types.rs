//! Session state types and concurrency guards.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::message::{HistoryEntry, Message};

pub const EMPTY_QUERY_ERROR: &str = "Por favor escribe un mensaje";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Resolved,
}

/// Everything the UI renders for one conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    /// Displayed conversation, oldest first.
    pub messages: Vec<Message>,
    /// Context sent to the backend, oldest first.
    pub history: Vec<HistoryEntry>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub cold_start_warning: bool,
    pub rate_limit_warning: bool,
    pub phase: SessionPhase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was sent.
    Rejected,
    /// Another submission is still in flight; nothing changed.
    Busy,
    /// The assistant message appended for this submission.
    Completed(Message),
}

/// Guard that clears the `busy` flag on drop, ensuring it is always released
/// even if the future is cancelled or an early return occurs.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy flag. Returns `None` if already held.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
