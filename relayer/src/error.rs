//! Dispatch-time error taxonomy — the subset of failures a connection can
//! hit between decoding a frame and writing a response.
//!
//! Split between this rich internal type (used for logging) and the small
//! wire-facing [`wisdom_fort_wire::ErrorCode`] (used for the response's
//! `error_code` field), so the stable wire contract stays decoupled from
//! whatever context the internal error carries.

use thiserror::Error;
use wisdom_fort_wire::ErrorCode;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0}")]
    Generic(String),

    #[error("invalid message format: {0}")]
    InvalidMsgFormat(String),

    #[error("invalid payload format: {0}")]
    InvalidPayloadFormat(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("solution submitted without a token")]
    MissingToken,

    #[error("too many requests")]
    TooManyRequests,

    #[error("solution is invalid")]
    InvalidSolution,
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::Generic(_) => ErrorCode::Generic,
            DispatchError::InvalidMsgFormat(_) => ErrorCode::InvalidMsgFormat,
            DispatchError::InvalidPayloadFormat(_) => ErrorCode::InvalidPayloadFormat,
            DispatchError::InvalidAction(_) => ErrorCode::InvalidAction,
            DispatchError::MissingToken => ErrorCode::MissingToken,
            DispatchError::TooManyRequests => ErrorCode::TooManyRequests,
            DispatchError::InvalidSolution => ErrorCode::InvalidSolution,
        }
    }
}
