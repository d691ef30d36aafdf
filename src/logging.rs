//! Structured logging setup.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &Config) -> Result<()> {
    let rust_log = std::env::var_os(EnvFilter::DEFAULT_ENV)
        .map(|value| {
            value
                .into_string()
                .map_err(|value| anyhow!("RUST_LOG is not valid UTF-8: {:?}", value))
        })
        .transpose()?;
    let filter = build_filter(rust_log.as_deref(), &config.log_level)?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_logs {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    tracing::info!(
        level = %config.log_level,
        json = config.json_logs,
        "logging initialized"
    );
    Ok(())
}

/// The configured level only applies when `RUST_LOG` is absent; a set but
/// unparsable `RUST_LOG` is an error.
fn build_filter(rust_log: Option<&str>, level: &str) -> Result<EnvFilter> {
    match rust_log {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow!("invalid RUST_LOG {:?}: {}", directives, e)),
        None => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("invalid log filter {:?}: {}", level, e)),
    }
}
