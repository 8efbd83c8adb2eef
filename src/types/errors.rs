//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The codec
//! reports three kinds: [`Error::Unserializable`] and
//! [`Error::EncodingFailure`] from encoding, [`Error::DecodingFailure`] from
//! decoding. The decode cause stays reachable through [`DecodeError`].

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the lead payload codec.
#[derive(Error, Debug)]
pub enum Error {
    /// The value has no JSON representation, or nests deeper than allowed.
    #[error("value is not serializable: {0}")]
    Unserializable(String),

    /// Serialization succeeded but producing the encoded text failed.
    #[error("encoding failed: {0}")]
    EncodingFailure(String),

    /// Any failure turning base64 text back into a value.
    #[error("decoding failed: {0}")]
    DecodingFailure(#[source] DecodeError),

    /// Caller input that is not what the operation expects.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Underlying cause of a [`Error::DecodingFailure`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Input is longer than any payload within the size limit could encode to.
    #[error("encoded input of {len} bytes exceeds the {limit} byte payload limit")]
    TooLarge { len: usize, limit: usize },

    /// Characters outside the standard alphabet, or bad padding.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text is not a JSON document.
    #[error("payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Decoded document nests deeper than the configured limit.
    #[error("payload nesting depth exceeds {limit}")]
    TooDeep { limit: usize },

    /// Decoded document does not fit the requested type.
    #[error("payload does not match the expected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

// Convenience constructors
impl Error {
    pub fn unserializable(msg: impl Into<String>) -> Self {
        Self::Unserializable(msg.into())
    }

    pub fn encoding_failure(msg: impl Into<String>) -> Self {
        Self::EncodingFailure(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for any [`Error::DecodingFailure`], whatever its cause.
    pub fn is_decoding_failure(&self) -> bool {
        matches!(self, Self::DecodingFailure(_))
    }

    /// The decode cause, if this is a decoding failure.
    pub fn decode_cause(&self) -> Option<&DecodeError> {
        match self {
            Self::DecodingFailure(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::DecodingFailure(err)
    }
}
