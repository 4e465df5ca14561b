//! Decoding of the service's JSON-RPC style response envelopes.
//!
//! A successful call answers `{"result": ...}`, a failed one
//! `{"error": {"code": <int>, "message": "<text>"}}`. [`decode_response`]
//! turns either shape into a plain `Result` without touching any client
//! state.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Why a response body could not be turned into a result value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not JSON, or not a JSON object.
    Malformed,
    /// A well-formed envelope without a `result` member.
    MissingResult,
    /// The service reported an error.
    Remote { code: i64 },
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Malformed => f.write_str("malformed response"),
            DecodeErrorKind::MissingResult => f.write_str("missing result"),
            DecodeErrorKind::Remote { code } => write!(f, "remote error {}", code),
        }
    }
}

/// A failed decode: what went wrong and the message describing it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub message: String,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Decodes a response envelope into its `result` value.
pub fn decode_response(body: &[u8]) -> Result<Value, DecodeError> {
    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| DecodeError::new(DecodeErrorKind::Malformed, e.to_string()))?;

    let Value::Object(mut members) = envelope else {
        return Err(DecodeError::new(
            DecodeErrorKind::Malformed,
            "the response is not a JSON object",
        ));
    };

    match members.remove("error") {
        None | Some(Value::Null) => (),
        Some(error) => {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
            let message = match error.get("message").and_then(Value::as_str) {
                Some(message) => message.to_string(),
                None => error.to_string(),
            };
            return Err(DecodeError::new(DecodeErrorKind::Remote { code }, message));
        }
    }

    members.remove("result").ok_or_else(|| {
        DecodeError::new(
            DecodeErrorKind::MissingResult,
            "the response has neither a result nor an error",
        )
    })
}

/// Extracts the file key from the result of an initialise call.
///
/// The service answers either with the bare key or with `{"key": "..."}`.
pub fn file_key(result: &Value) -> Option<&str> {
    let key = match result {
        Value::String(key) => Some(key.as_str()),
        Value::Object(members) => members.get("key").and_then(Value::as_str),
        _ => None,
    };
    key.filter(|key| !key.is_empty())
}
