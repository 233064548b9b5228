//! querychat configuration system.
//!
//! Provides TOML-based configuration for the chat client with full
//! validation. All config sections use sensible defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use querychat_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config.backend.url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

// Re-export core types for convenience
pub use schema::QueryChatConfig;
pub use toml_loader::{load_from_path, default_config_path};

use querychat_common::ConfigError;

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creates a default
/// if none exists, and validates the result.
pub fn load_config() -> Result<QueryChatConfig, ConfigError> {
    toml_loader::load_default()
}
