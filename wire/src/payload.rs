//! Action-specific payload schemas, decoded from/encoded to the
//! envelope's raw `payload` field.
//!
//! Field names are bit-exact to the original `pkg/scheme` package,
//! including the quote's wire field name `quote` for what the data model
//! calls its text (`server/internal/service/quotes/service.go` /
//! `pkg/scheme/payload.go`).

use serde::{Deserialize, Serialize};

/// A single quote, as carried on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub author: String,
    #[serde(rename = "quote")]
    pub text: String,
}

/// Challenge response payload: `{"target": <uint8>}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChallengePayload {
    pub target: u8,
}

/// Solution request payload: `{"solution": <uint64>}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolutionRequestPayload {
    pub solution: u64,
}

/// Solution response payload: `{"quote": {"author": ..., "quote": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionResponsePayload {
    pub quote: Quote,
}
