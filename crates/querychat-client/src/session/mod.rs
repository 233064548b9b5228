//! Conversation session: state machine, pipeline driver and persistence.
//!
//! A `ChatSession` owns the [`ConversationState`] shown by the UI. Each
//! submission runs rate limiting, the retrying transport and payload
//! validation, and always ends with exactly one assistant message.

mod manager;
mod submit;
mod types;


pub use manager::ChatSession;
pub use types::{ConversationState, SessionPhase, SubmitOutcome, EMPTY_QUERY_ERROR};
