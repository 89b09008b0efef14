//! Diagnostic logging setup
//!
//! Records go to stderr so they never interleave with query output on
//! stdout. The filter comes from `FBSQL_LOG` and defaults to `warn`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "FBSQL_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Build the filter from a directive string such as `debug` or
/// `fbsql::db=trace`, with the line editor kept quiet
fn build_env_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    let directives = if directives.trim().is_empty() {
        DEFAULT_LEVEL
    } else {
        directives
    };

    let filter_str = format!("{},rustyline=warn", directives);
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", filter_str, e))
}

/// Install the global subscriber
pub fn init_logging() -> anyhow::Result<()> {
    let directives = std::env::var(LOG_ENV_VAR).unwrap_or_default();
    let filter = build_env_filter(&directives)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    tracing::trace!(directives = %directives, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = build_env_filter("").unwrap();
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn test_invalid_filter() {
        let err = build_env_filter("fbsql=notalevel").unwrap_err();
        assert!(err.to_string().starts_with("Invalid log filter"));
    }
}
