//! The `{code, data, message}` response envelope.
//!
//! The backend wraps every body, successful or not, in an [`ApiEnvelope`].
//! A `code` of [`CODE_OK`] means `data` holds the payload; any other code
//! means the request failed and `message` explains why.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope code for a successful response.
pub const CODE_OK: i32 = 0;

/// Envelope code the backend uses for domain errors.
pub const CODE_ERROR: i32 = -1;

/// Errors produced while opening an envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The body was not a well-formed envelope, or `data` did not have the
    /// expected shape.
    #[error("malformed envelope: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope carried a non-zero code.
    #[error("{message}")]
    Api {
        /// Code reported by the backend.
        code: i32,
        /// Human readable failure reason.
        message: String,
    },
}

/// Response wrapper used by every dida endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T = Value> {
    /// `0` on success, anything else on failure.
    pub code: i32,
    /// Payload; `null` for failures and for endpoints without a body.
    #[serde(default)]
    pub data: T,
    /// Failure reason, usually empty on success.
    #[serde(default)]
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    /// Wraps a successful payload.
    pub const fn ok(data: T) -> Self {
        Self {
            code: CODE_OK,
            data,
            message: String::new(),
        }
    }

    /// Returns `true` if the envelope reports success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

impl ApiEnvelope<Value> {
    /// Builds a failure envelope with a `null` payload.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            data: Value::Null,
            message: message.into(),
        }
    }

    /// Parses an envelope from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Decode`] if the bytes are not an envelope.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Unwraps the payload, decoding it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Api`] for a non-zero code, or
    /// [`EnvelopeError::Decode`] if `data` does not match `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        if !self.is_ok() {
            return Err(EnvelopeError::Api {
                code: self.code,
                message: self.message,
            });
        }
        Ok(serde_json::from_value(self.data)?)
    }
}
