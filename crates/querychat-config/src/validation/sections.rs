//! Per-section validators: backend and rate_limit.

use crate::schema::QueryChatConfig;

use super::helpers::{validate_range, validate_range_u64};

/// Validate backend endpoint and pipeline bounds.
pub(crate) fn validate_backend(errors: &mut Vec<String>, config: &QueryChatConfig) {
    let backend = &config.backend;
    if !(backend.url.starts_with("http://") || backend.url.starts_with("https://")) {
        errors.push(format!(
            "backend.url = {:?} must start with http:// or https://",
            backend.url
        ));
    }
    validate_range(errors, "backend.timeout_secs", backend.timeout_secs, 1, 300);
    validate_range(
        errors,
        "backend.connect_timeout_secs",
        backend.connect_timeout_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "backend.cold_start_threshold_ms",
        backend.cold_start_threshold_ms,
        1,
        300_000,
    );
    validate_range(errors, "backend.max_attempts", backend.max_attempts, 1, 10);
    validate_range(errors, "backend.retry_delay_ms", backend.retry_delay_ms, 0, 60_000);
}

/// Validate rate limit window.
pub(crate) fn validate_rate_limit(errors: &mut Vec<String>, config: &QueryChatConfig) {
    validate_range(
        errors,
        "rate_limit.max_requests",
        config.rate_limit.max_requests,
        1,
        10_000,
    );
    validate_range_u64(
        errors,
        "rate_limit.period_secs",
        config.rate_limit.period_secs,
        60,
        604_800,
    );
}
