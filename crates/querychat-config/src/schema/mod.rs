//! Configuration schema types for querychat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod backend;
mod rate_limit;
mod storage;
mod system;

pub use backend::*;
pub use rate_limit::*;
pub use storage::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for querychat.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct QueryChatConfig {
    pub backend: BackendConfig,
    pub rate_limit: RateLimitConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
