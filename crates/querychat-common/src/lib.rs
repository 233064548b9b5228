pub mod errors;
pub mod id;

pub use errors::{ConfigError, QueryChatError, StorageError};
pub use id::{new_correlation_id, new_id, MessageId};
