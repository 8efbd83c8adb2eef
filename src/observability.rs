//! Log output setup for the `lead-codec` binary.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to whoever embeds it.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::ObservabilityConfig;

/// Environment switch for JSON output, checked alongside `json_logs`.
pub const LOG_FORMAT_ENV: &str = "LEAD_LOG_FORMAT";

static SUBSCRIBER: OnceLock<()> = OnceLock::new();

/// Shape of each emitted log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// JSON if the config asks for it or `format_env` says `json`.
    pub fn resolve(config: &ObservabilityConfig, format_env: Option<&str>) -> Self {
        let env_json = format_env.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"));
        if config.json_logs || env_json {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// `RUST_LOG` first, then the configured level, then `info`.
fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber, writing to stderr so stdout stays clean for
/// encoded output. Later calls are no-ops.
pub fn init_tracing(config: &ObservabilityConfig) {
    SUBSCRIBER.get_or_init(|| {
        let format_env = std::env::var(LOG_FORMAT_ENV).ok();
        let format = LogFormat::resolve(config, format_env.as_deref());

        let json_layer = (format == LogFormat::Json)
            .then(|| fmt::layer().json().with_writer(std::io::stderr));
        let compact_layer = (format == LogFormat::Compact)
            .then(|| fmt::layer().compact().with_writer(std::io::stderr));

        let installed = tracing_subscriber::registry()
            .with(env_filter(config))
            .with(json_layer)
            .with(compact_layer)
            .try_init();

        if let Err(err) = installed {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
