//! Tracing setup for RepSense binaries.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{RepsenseError, RepsenseResult};

/// Parse a filter directive string such as `info` or
/// `warn,repsense_metrics_core=debug`.
pub fn build_filter(directives: &str) -> RepsenseResult<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| RepsenseError::config(format!("invalid log filter {directives:?}: {e}")))
}

/// Install the global subscriber, writing to stderr so stdout stays clean
/// for reports and `--json` output.
///
/// `RUST_LOG` takes precedence over `config.level`. If a subscriber is
/// already installed this is a no-op.
pub fn init_logging(config: &LoggingConfig) -> RepsenseResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(e) = installed {
        tracing::debug!(error = %e, "Subscriber already installed");
    }
    Ok(())
}
