//! Full configuration validation.
//!
//! Validates numeric ranges and the backend URL. Errors from every section
//! are collected into a single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::QueryChatConfig;
use querychat_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &QueryChatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_backend(&mut errors, config);
    sections::validate_rate_limit(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
