//! Wire protocol: request/response envelopes, the action and error-code
//! enums, payload schemas, the proof-of-work hash contract, and the
//! opaque token codec.
//!
//! The single source of truth both sides of the connection agree on; no
//! protobuf compiler is involved since this protocol is one JSON object
//! per direction.

pub mod action;
pub mod envelope;
pub mod error_code;
pub mod payload;
pub mod pow;
pub mod token;

pub use action::{Action, UnknownAction};
pub use envelope::{Request, Response};
pub use error_code::ErrorCode;
pub use payload::{ChallengePayload, Quote, SolutionRequestPayload, SolutionResponsePayload};
pub use token::Token;
