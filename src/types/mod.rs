//! Core types for the lead payload codec.
//!
//! - **Errors**: codec error taxonomy with thiserror derives
//! - **Config**: codec limits and observability settings

mod config;
mod errors;

pub use config::{CodecConfig, Config, ObservabilityConfig, PARSER_DEPTH_CEILING};
pub use errors::{DecodeError, Error, Result};
