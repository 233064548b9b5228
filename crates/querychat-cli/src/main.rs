mod cli;
mod render;
mod repl;

use std::sync::Arc;
use std::time::Duration;

use querychat_client::{
    ChatSession, FileStorage, HttpBackend, RateLimiter, RequestTransport, RetryPolicy,
    SnapshotStore,
};
use querychat_common::{QueryChatError, StorageError};
use querychat_config::QueryChatConfig;
use tracing_subscriber::EnvFilter;

/// Load config before logging is up; a failure is returned so it can be
/// reported once the subscriber exists.
///
/// The result is validated after the command-line overrides are applied. If
/// that fails the whole config falls back to defaults.
fn load_config(args: &cli::Args) -> (QueryChatConfig, Option<QueryChatError>) {
    let loaded = match &args.config {
        Some(path) => querychat_config::load_from_path(path),
        None => querychat_config::load_config(),
    };
    let (mut config, failure) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (QueryChatConfig::default(), Some(e.into())),
    };

    if let Some(url) = &args.backend_url {
        config.backend.url = url.clone();
    }
    if let Some(dir) = &args.storage_dir {
        config.storage.directory = Some(dir.clone());
    }

    if let Err(e) = querychat_config::validation::validate(&config) {
        return (QueryChatConfig::default(), Some(e.into()));
    }
    (config, failure)
}

fn build_session(config: &QueryChatConfig) -> Result<ChatSession, QueryChatError> {
    let backend = &config.backend;
    let http = HttpBackend::new(
        backend.url.clone(),
        Duration::from_secs(backend.connect_timeout_secs.into()),
    )
    .map_err(|e| QueryChatError::Network(e.to_string()))?;

    let transport = RequestTransport::new(Arc::new(http))
        .with_timeout(Duration::from_secs(backend.timeout_secs.into()))
        .with_cold_start_threshold(Duration::from_millis(backend.cold_start_threshold_ms.into()));
    let retry = RetryPolicy::new(backend.max_attempts)
        .with_delay(Duration::from_millis(backend.retry_delay_ms.into()));
    let rate_limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.period_secs),
    );

    let storage_dir = config
        .storage
        .resolved_directory()
        .ok_or_else(|| QueryChatError::Other("could not determine data directory".into()))?;
    std::fs::create_dir_all(&storage_dir).map_err(StorageError::from)?;
    tracing::info!("Conversation stored in {}", storage_dir.display());
    let store = SnapshotStore::new(FileStorage::new(storage_dir));

    Ok(ChatSession::new(transport, store)
        .with_retry_policy(retry)
        .with_rate_limiter(rate_limiter)
        .rehydrate())
}

#[tokio::main]
async fn main() {
    let args = cli::parse();
    let (config, config_failure) = load_config(&args);

    // Logging goes to stderr so the conversation owns stdout.
    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("querychat={}", config.logging.level.as_directive()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "querychat=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("querychat v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_failure {
        tracing::warn!("Config rejected, using defaults: {e}");
    }
    tracing::info!("Backend: {}", config.backend.url);

    let session = match build_session(&config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to start session: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = repl::run(&session).await {
        tracing::error!("Input error: {e}");
    }
    tracing::info!("Shutdown complete");
}
