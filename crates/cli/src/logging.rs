//! Logging setup for the `rebound` binary

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "rebound=info,rebound_core=info,rebound_infra_system=info,rebound_infra_json=info";

/// Install the global tracing subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: info for rebound crates)
/// - `REBOUND_LOG_FORMAT`: `pretty` (default) or `json`
pub fn init_logging() -> Result<()> {
    let log_format = std::env::var("REBOUND_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => {
            // Machine-readable: one JSON object per event
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()
                .context("Failed to install JSON subscriber")?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .try_init()
                .context("Failed to install subscriber")?;
        }
    }

    Ok(())
}
