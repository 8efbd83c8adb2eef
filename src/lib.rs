//! # Lead Enrichment Core - Payload Codec
//!
//! The lead enrichment pipeline moves structured payloads (lead records,
//! service-account documents) through environment variables and CRM fields
//! as base64 text. This crate owns that transform:
//! - [`encode`]: any serializable value to compact JSON, then standard base64
//! - [`decode`] / [`decode_as`]: the reverse, with one unified failure kind
//! - [`is_valid`]: a yes/no check that never errors
//!
//! ```
//! use lead_enrichment_core::{decode, encode, is_valid};
//! use serde_json::json;
//!
//! let lead = json!({"name": "John Doe", "age": 30, "active": true});
//! let encoded = encode(&lead).unwrap();
//! assert_eq!(decode(&encoded).unwrap(), lead);
//! assert!(!is_valid("invalid_base64!!!"));
//! ```
//!
//! Limits on nesting depth and payload size live in [`CodecConfig`]; build a
//! [`Codec`] to apply non-default ones.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod codec;
pub mod types;
pub mod validation;

// Internal utilities
pub mod observability;

pub use codec::{decode, decode_as, encode, is_valid, Codec};
pub use types::{CodecConfig, Config, DecodeError, Error, Result};
