use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encode error: {0}")]
    Encode(String),

    #[error("snapshot decode error: {0}")]
    Decode(String),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum QueryChatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("backend.timeout_secs".into());
        assert_eq!(
            err.to_string(),
            "config validation error: backend.timeout_secs"
        );
    }

    #[test]
    fn storage_error_display() {
        let err = StorageError::Decode("expected value at line 1".into());
        assert_eq!(
            err.to_string(),
            "snapshot decode error: expected value at line 1"
        );

        let err = StorageError::UnsupportedVersion(9);
        assert_eq!(err.to_string(), "unsupported snapshot version: 9");
    }

    #[test]
    fn querychat_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: QueryChatError = config_err.into();
        assert!(matches!(err, QueryChatError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn querychat_error_from_storage() {
        let storage_err = StorageError::Encode("recursion limit".into());
        let err: QueryChatError = storage_err.into();
        assert!(matches!(err, QueryChatError::Storage(_)));
        assert!(err.to_string().contains("recursion limit"));
    }

    #[test]
    fn storage_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StorageError = io_err.into();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn querychat_error_other_variants() {
        let err = QueryChatError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");

        let err = QueryChatError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
