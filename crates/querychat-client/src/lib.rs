//! Chat session engine for querychat.
//!
//! Turns a typed question into one bounded round trip against the query
//! backend and keeps the resulting conversation durable:
//! - Request transport with a hard timeout and cold start detection
//! - Retry policy for transient failures
//! - Local rate limiting
//! - Validation of the untrusted response payload
//! - A versioned, migrated on-disk snapshot of the conversation

pub mod clock;
pub mod message;
pub mod rate_limit;
pub mod retry;
pub mod session;
pub mod store;
pub mod transport;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use message::{HistoryEntry, Message, Role, Visualization};
pub use rate_limit::{RateLimitExceeded, RateLimitInfo, RateLimiter};
pub use retry::{PipelineError, RetryPolicy};
pub use session::{ChatSession, ConversationState, SessionPhase, SubmitOutcome};
pub use store::{FileStorage, MemoryStorage, SnapshotStore, StorageBackend};
pub use transport::{
    HttpBackend, QueryBackend, QueryRequest, RequestTransport, TransportError, TransportResponse,
};
pub use validator::{validate, QueryResponse, Validated, ValidationError};
