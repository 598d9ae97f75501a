//! Wire request/response envelopes.
//!
//! One JSON object per direction, no framing beyond "whatever arrives in
//! one read" — see `wisdom-fort-relayer`'s connection dispatcher. Grounded
//! in the original's `pkg/api` (`request.go`, `response.go`): the payload
//! is carried as a raw, un-interpreted JSON value so the envelope can be
//! decoded before the caller's action is known to select the right payload
//! schema.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// A single inbound request frame. Also built and serialized by callers
/// of `wisdom-fort-client`, so it derives both directions of serde.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub token: Option<String>,
    pub action: String,
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

/// A single outbound response frame. Exactly one of `payload` or
/// (`error`, `error_code`) is populated. Also decoded by
/// `wisdom-fort-client`, so it derives both directions of serde.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payload: Option<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        rename = "error_code"
    )]
    pub error_code: Option<String>,
}

impl Response {
    pub fn success(token: impl Into<String>, payload: Box<RawValue>) -> Self {
        Self {
            token: token.into(),
            payload: Some(payload),
            error: None,
            error_code: None,
        }
    }

    pub fn error(token: impl Into<String>, message: impl Into<String>, code: &str) -> Self {
        Self {
            token: token.into(),
            payload: None,
            error: Some(message.into()),
            error_code: Some(code.to_string()),
        }
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
