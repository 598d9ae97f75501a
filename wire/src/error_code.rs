//! Stable wire-facing error codes.
//!
//! Kept as a small, standalone enum (rather than the full error type each
//! crate defines with `thiserror`) so the wire contract — a fixed set of
//! string names — stays decoupled from whatever rich context an internal
//! error carries for logs, the same separation the original draws between
//! `ErrorCode` (`codeStr` table) and the wrapped `originalError` in
//! `server/internal/service/error.go`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Generic,
    InvalidMsgFormat,
    InvalidPayloadFormat,
    InvalidAction,
    MissingToken,
    TooManyRequests,
    InvalidSolution,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Generic => "ErrGeneric",
            ErrorCode::InvalidMsgFormat => "ErrInvalidMsgFormat",
            ErrorCode::InvalidPayloadFormat => "ErrInvalidPayloadFormat",
            ErrorCode::InvalidAction => "ErrInvalidAction",
            ErrorCode::MissingToken => "ErrMissingToken",
            ErrorCode::TooManyRequests => "ErrTooManyRequests",
            ErrorCode::InvalidSolution => "ErrInvalidSolution",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Generic => "something went wrong",
            ErrorCode::InvalidMsgFormat => "invalid message format",
            ErrorCode::InvalidPayloadFormat => "invalid payload format",
            ErrorCode::InvalidAction => "invalid action",
            ErrorCode::MissingToken => "solution submitted without a token",
            ErrorCode::TooManyRequests => "too many requests",
            ErrorCode::InvalidSolution => "solution is invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
