//! JSON ↔ base64 payload codec.
//!
//! Encoded form:
//! ```text
//! value ──serde_json (compact, raw UTF-8)──▶ JSON text ──base64 (standard, padded)──▶ String
//! ```
//! Decoding runs the same pipeline backwards. Any stage failing on the way
//! back is reported as [`Error::DecodingFailure`]; the stage is kept in the
//! [`DecodeError`] cause.
//!
//! The free functions use [`CodecConfig::default`]: nesting is capped, payload
//! size is not. Build a [`Codec`] to apply other limits.

mod depth;
mod finite;
mod writer;

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;
use serde_json::Value;
use tracing::debug;

use crate::types::{CodecConfig, DecodeError, Error, Result};
use depth::exceeds_depth;
use finite::check_finite;
use writer::BoundedWriter;

/// Stateless codec carrying only its limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec, rejecting limits that fail [`CodecConfig::validate`].
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode any serializable value. `NaN` and infinities are rejected
    /// rather than written as `null`.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        check_finite(value).map_err(|e| Error::unserializable(e.to_string()))?;
        let value =
            serde_json::to_value(value).map_err(|e| Error::unserializable(e.to_string()))?;
        self.encode_value(&value)
    }

    /// Encode a JSON value.
    pub fn encode_value(&self, value: &Value) -> Result<String> {
        if exceeds_depth(value, self.config.max_depth) {
            return Err(Error::unserializable(format!(
                "nesting depth exceeds {}",
                self.config.max_depth
            )));
        }

        let sink = EncoderStringWriter::new(&STANDARD);
        let limit = self.config.max_payload_bytes.unwrap_or(usize::MAX);
        let mut writer = BoundedWriter::new(sink, limit);
        serde_json::to_writer(&mut writer, value).map_err(|e| match e.classify() {
            Category::Io => Error::encoding_failure(e.to_string()),
            _ => Error::unserializable(e.to_string()),
        })?;

        let payload_bytes = writer.written();
        let encoded = writer.into_inner().into_inner();
        debug!(payload_bytes, encoded_len = encoded.len(), "encoded payload");
        Ok(encoded)
    }

    /// Decode base64 text back into a JSON value.
    pub fn decode(&self, encoded: &str) -> Result<Value> {
        match self.decode_stages(encoded) {
            Ok(value) => {
                debug!(encoded_len = encoded.len(), "decoded payload");
                Ok(value)
            }
            Err(cause) => {
                debug!(encoded_len = encoded.len(), %cause, "rejected payload");
                Err(Error::DecodingFailure(cause))
            }
        }
    }

    /// Decode base64 text straight into `T`.
    pub fn decode_as<T: DeserializeOwned>(&self, encoded: &str) -> Result<T> {
        let value = self.decode(encoded)?;
        serde_json::from_value(value).map_err(|e| Error::DecodingFailure(DecodeError::Shape(e)))
    }

    /// True iff [`Codec::decode`] would succeed.
    pub fn is_valid(&self, encoded: &str) -> bool {
        self.decode(encoded).is_ok()
    }

    fn decode_stages(&self, encoded: &str) -> std::result::Result<Value, DecodeError> {
        let too_large = |limit| DecodeError::TooLarge {
            len: encoded.len(),
            limit,
        };
        if let Some(limit) = self.config.max_payload_bytes {
            let max_encoded_len = base64::encoded_len(limit, true).unwrap_or(usize::MAX);
            if encoded.len() > max_encoded_len {
                return Err(too_large(limit));
            }
        }

        let bytes = STANDARD.decode(encoded)?;
        if let Some(limit) = self.config.max_payload_bytes.filter(|&l| bytes.len() > l) {
            return Err(too_large(limit));
        }
        let text = String::from_utf8(bytes)?;
        let value: Value = serde_json::from_str(&text).map_err(DecodeError::Json)?;

        if exceeds_depth(&value, self.config.max_depth) {
            return Err(DecodeError::TooDeep {
                limit: self.config.max_depth,
            });
        }
        Ok(value)
    }
}

/// Encode `value` with default limits.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Codec::default().encode(value)
}

/// Decode `encoded` with default limits.
pub fn decode(encoded: &str) -> Result<Value> {
    Codec::default().decode(encoded)
}

/// Decode `encoded` into `T` with default limits.
pub fn decode_as<T: DeserializeOwned>(encoded: &str) -> Result<T> {
    Codec::default().decode_as(encoded)
}

/// Check `encoded` with default limits. Never errors.
pub fn is_valid(encoded: &str) -> bool {
    Codec::default().is_valid(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::ser::Error as _;
    use serde::{Deserialize, Serializer};
    use serde_json::json;
    use std::collections::BTreeMap;
    use tracing_test::traced_test;

    fn codec(max_depth: usize, max_payload_bytes: usize) -> Codec {
        Codec::new(CodecConfig {
            max_depth,
            max_payload_bytes: Some(max_payload_bytes),
        })
        .unwrap()
    }

    fn payload_text(encoded: &str) -> String {
        String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap()
    }

    struct CallbackRef;

    impl Serialize for CallbackRef {
        fn serialize<S: Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("callbacks have no JSON form"))
        }
    }

    // ── encode ──────────────────────────────────────────────────────────

    #[test]
    fn test_encode_known_vectors() {
        let lead = json!({"name": "John Doe", "age": 30, "active": true});
        assert_eq!(
            encode(&lead).unwrap(),
            "eyJuYW1lIjoiSm9obiBEb2UiLCJhZ2UiOjMwLCJhY3RpdmUiOnRydWV9"
        );
        assert_eq!(encode(&json!({})).unwrap(), "e30=");
        assert_eq!(encode(&Value::Null).unwrap(), "bnVsbA==");
        assert_eq!(
            encode(&["reading", "coding", "traveling"]).unwrap(),
            "WyJyZWFkaW5nIiwiY29kaW5nIiwidHJhdmVsaW5nIl0="
        );
    }

    #[test]
    fn test_encode_is_compact() {
        let value = json!({"a": [1, 2, {"b": null}], "c": "d e"});
        assert_eq!(
            payload_text(&encode(&value).unwrap()),
            r#"{"a":[1,2,{"b":null}],"c":"d e"}"#
        );
    }

    #[test]
    fn test_encode_keeps_non_ascii_raw() {
        let encoded = encode(&json!({"city": "Zürich"})).unwrap();
        assert_eq!(encoded, "eyJjaXR5IjoiWsO8cmljaCJ9");
        assert_eq!(payload_text(&encoded), "{\"city\":\"Zürich\"}");
    }

    #[test]
    fn test_encode_preserves_insertion_order() {
        let value = json!({"zeta": 1, "alpha": 2});
        assert_eq!(
            payload_text(&encode(&value).unwrap()),
            r#"{"zeta":1,"alpha":2}"#
        );
    }

    #[test]
    fn test_encode_typed_struct() {
        #[derive(Serialize)]
        struct Lead<'a> {
            email: &'a str,
            score: u8,
        }
        let encoded = encode(&Lead {
            email: "ada@example.com",
            score: 87,
        })
        .unwrap();
        assert_eq!(
            payload_text(&encoded),
            r#"{"email":"ada@example.com","score":87}"#
        );
    }

    #[test]
    fn test_encode_rejects_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), "pair");
        let err = encode(&map).unwrap_err();
        assert!(matches!(err, Error::Unserializable(_)), "got {err:?}");
    }

    #[test]
    fn test_encode_rejects_failing_serialize_impl() {
        let err = encode(&vec![CallbackRef]).unwrap_err();
        match err {
            Error::Unserializable(msg) => assert!(msg.contains("callbacks have no JSON form")),
            other => panic!("expected Unserializable, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_rejects_non_finite_numbers_in_nested_struct() {
        #[derive(Serialize)]
        struct Score {
            value: f64,
        }
        #[derive(Serialize)]
        struct Lead {
            name: &'static str,
            scores: Vec<Score>,
        }

        let nan = Lead {
            name: "Ada",
            scores: vec![Score { value: 1.5 }, Score { value: f64::NAN }],
        };
        let err = encode(&nan).unwrap_err();
        assert!(matches!(err, Error::Unserializable(ref msg) if msg.contains("NaN")));

        let inf = Lead {
            name: "Ada",
            scores: vec![Score {
                value: f64::NEG_INFINITY,
            }],
        };
        assert!(matches!(encode(&inf), Err(Error::Unserializable(_))));
        assert!(matches!(
            encode(&vec![f64::NAN, 1.5]),
            Err(Error::Unserializable(_))
        ));
    }

    #[test]
    fn test_default_codec_has_no_payload_cap() {
        let notes = "x".repeat(6 * 1024 * 1024);
        let value = json!({"notes": notes});
        let encoded = encode(&value).unwrap();
        assert_eq!(decode(&encoded).unwrap(), value);
        assert!(is_valid(&encoded));
    }

    #[test]
    fn test_encode_rejects_excess_depth() {
        let err = codec(2, 1024).encode(&json!([[[1]]])).unwrap_err();
        assert!(matches!(err, Error::Unserializable(ref msg) if msg.contains("depth")));
        assert!(codec(3, 1024).encode(&json!([[[1]]])).is_ok());
    }

    #[test]
    fn test_encode_over_size_limit_is_encoding_failure() {
        let err = codec(8, 4).encode("hello world").unwrap_err();
        assert!(matches!(err, Error::EncodingFailure(_)), "got {err:?}");

        // Exactly at the limit: `"abc"` is five bytes.
        assert_eq!(codec(8, 5).encode("abc").unwrap(), "ImFiYyI=");
    }

    // ── decode ──────────────────────────────────────────────────────────

    #[test]
    fn test_decode_known_vector() {
        let value = decode("eyJuYW1lIjoiSm9obiBEb2UiLCJhZ2UiOjMwLCJhY3RpdmUiOnRydWV9").unwrap();
        assert_eq!(value, json!({"name": "John Doe", "age": 30, "active": true}));
    }

    #[test]
    fn test_decode_map_equality_ignores_key_order() {
        let encoded = encode(&json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(decode(&encoded).unwrap(), json!({"a": 2, "b": 1}));
    }

    #[test]
    fn test_decode_rejects_characters_outside_alphabet() {
        let err = decode("not-valid-base64-@@@").unwrap_err();
        assert!(matches!(err.decode_cause(), Some(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_non_canonical_padding() {
        // "e30" is `{}` without its padding.
        let err = decode("e30").unwrap_err();
        assert!(matches!(err.decode_cause(), Some(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let err = decode("//4=").unwrap_err();
        assert!(matches!(err.decode_cause(), Some(DecodeError::Utf8(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_json() {
        let err = decode("eyJhIjo=").unwrap_err();
        assert!(matches!(err.decode_cause(), Some(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_empty_input() {
        let err = decode("").unwrap_err();
        assert!(matches!(err.decode_cause(), Some(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_excess_depth() {
        let encoded = encode(&json!([[[1]]])).unwrap();
        let err = codec(2, 1024).decode(&encoded).unwrap_err();
        assert!(matches!(
            err.decode_cause(),
            Some(DecodeError::TooDeep { limit: 2 })
        ));
    }

    #[test]
    fn test_decode_rejects_oversized_input_before_decoding() {
        // Three bytes encode to four characters; eight cannot fit.
        let err = codec(8, 3).decode("!!!!!!!!").unwrap_err();
        assert!(matches!(
            err.decode_cause(),
            Some(DecodeError::TooLarge { len: 8, limit: 3 })
        ));
    }

    #[test]
    fn test_decode_rejects_payload_just_over_limit() {
        // `"abcd"` is six bytes, encoded in eight characters.
        let encoded = encode("abcd").unwrap();
        let err = codec(8, 5).decode(&encoded).unwrap_err();
        assert!(matches!(
            err.decode_cause(),
            Some(DecodeError::TooLarge { limit: 5, .. })
        ));
    }

    #[test]
    fn test_decode_as_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Lead {
            name: String,
            age: u32,
        }
        let encoded = encode(&json!({"name": "John Doe", "age": 30})).unwrap();
        let lead: Lead = decode_as(&encoded).unwrap();
        assert_eq!(
            lead,
            Lead {
                name: "John Doe".to_string(),
                age: 30
            }
        );

        let err = decode_as::<Lead>(&encode(&json!(["John"])).unwrap()).unwrap_err();
        assert!(matches!(err.decode_cause(), Some(DecodeError::Shape(_))));
    }

    // ── is_valid ────────────────────────────────────────────────────────

    #[test]
    fn test_is_valid_scenarios() {
        assert!(!is_valid("invalid_base64!!!"));
        assert!(!is_valid("invalid_base64"));
        assert!(is_valid(&encode(&json!({})).unwrap()));
        assert!(!is_valid("//4="));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_is_valid_honours_codec_limits() {
        let encoded = encode(&json!([[[1]]])).unwrap();
        assert!(codec(3, 1024).is_valid(&encoded));
        assert!(!codec(2, 1024).is_valid(&encoded));
    }

    #[test]
    fn test_codec_new_validates_config() {
        let err = Codec::new(CodecConfig {
            max_depth: 0,
            max_payload_bytes: Some(16),
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    // ── tracing ─────────────────────────────────────────────────────────

    #[traced_test]
    #[test]
    fn test_encode_logs_sizes() {
        encode(&json!({})).unwrap();
        assert!(logs_contain("encoded payload"));
        assert!(logs_contain("payload_bytes=2"));
    }

    #[traced_test]
    #[test]
    fn test_rejection_logs_cause() {
        assert!(!is_valid("//4="));
        assert!(logs_contain("rejected payload"));
        assert!(logs_contain("not valid UTF-8"));
    }
}
