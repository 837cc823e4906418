//! # Attestia Telemetry
//!
//! Structured logging bootstrap shared by every subsystem. Subsystems log
//! through `tracing` with `[at-NN]` prefixes; this crate wires the
//! subscriber once per process.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ATTESTIA_LOG_LEVEL` | `info` | Log level filter (env-filter syntax) |
//! | `ATTESTIA_LOG_JSON` | unset | Any value switches to JSON line output |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attestia_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Subsystem logs now flow through the configured subscriber.
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level filter could not be parsed.
    #[error("Invalid log filter {filter:?}: {detail}")]
    InvalidFilter {
        /// The rejected filter expression.
        filter: String,
        /// Parser error.
        detail: String,
    },

    /// A global subscriber is already installed.
    #[error("Telemetry already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Subscriber configuration. Passed explicitly; read from the environment
/// only in `from_env`.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// env-filter expression (`info`, `at_01_event_store=debug`, ...).
    pub log_filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            json_output: false,
        }
    }
}

impl TelemetryConfig {
    /// Read configuration from `ATTESTIA_LOG_LEVEL` / `ATTESTIA_LOG_JSON`.
    pub fn from_env() -> Self {
        Self {
            log_filter: std::env::var("ATTESTIA_LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),
            json_output: std::env::var("ATTESTIA_LOG_JSON").is_ok(),
        }
    }
}

/// Guard that keeps the subscriber installed. Hold it for the lifetime of
/// the process.
pub struct TelemetryGuard {
    _private: (),
}

/// Install the global tracing subscriber.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_filter).map_err(|err| {
        TelemetryError::InvalidFilter {
            filter: config.log_filter.clone(),
            detail: err.to_string(),
        }
    })?;

    let result = if config.json_output {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };
    result.map_err(|err| TelemetryError::AlreadyInitialized(err.to_string()))?;

    tracing::info!("[telemetry] subscriber installed (filter {})", config.log_filter);
    Ok(TelemetryGuard { _private: () })
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
