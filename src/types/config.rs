//! Configuration structures.
//!
//! Every section has defaults; the binary overrides them from flags and
//! environment variables before calling [`Config::validate`].

use serde::{Deserialize, Serialize};

use crate::types::{Error, Result};
use crate::validation::{validate_at_most, validate_positive};

/// Deepest nesting the JSON parser accepts before its own recursion guard trips.
pub const PARSER_DEPTH_CEILING: usize = 127;

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Codec limits.
    #[serde(default)]
    pub codec: CodecConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Parse a JSON config document, filling absent sections with defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Error::config(format!("invalid config document: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limits the codec cannot honour.
    pub fn validate(&self) -> Result<()> {
        self.codec.validate()
    }
}

/// Limits applied by the codec on both encode and decode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum container nesting. A scalar has depth 0, `[]` has depth 1.
    pub max_depth: usize,

    /// Maximum size of the serialized JSON text in bytes (before base64).
    /// `None` leaves payload size unbounded.
    pub max_payload_bytes: Option<usize>,
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.max_depth, "codec.max_depth")?;
        validate_at_most(self.max_depth, PARSER_DEPTH_CEILING, "codec.max_depth")?;
        if let Some(limit) = self.max_payload_bytes {
            validate_positive(limit, "codec.max_payload_bytes")?;
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_payload_bytes: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
