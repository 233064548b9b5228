//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# querychat Configuration
# Only override what you want to change -- missing fields use defaults.

[backend]
url = "http://localhost:8000/api/query"
# timeout_secs = 30              # 1-300, per attempt
# connect_timeout_secs = 10      # 1-60
# cold_start_threshold_ms = 3000 # slower successes raise the cold start warning
# max_attempts = 3               # 1-10, first try included
# retry_delay_ms = 0             # 0-60000

[rate_limit]
# max_requests = 50              # 1-10000
# period_secs = 86400            # 60-604800

[storage]
# directory = "/path/to/querychat/data"

[logging]
# level = "INFO"                 # DEBUG, INFO, WARNING, ERROR
"##
}
