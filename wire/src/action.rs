//! The two request actions a caller may ask for.

use std::fmt;

/// Action requested by a caller. Kept as a thin enum over the wire's raw
/// `action` string (see [`crate::envelope::Request`]) so that an
/// unrecognized action surfaces as `ErrInvalidAction` at dispatch time
/// rather than failing JSON decode — matching the original's
/// `switch req.Action { ... default: ErrInvalidAction }` (`server/app.go`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Challenge,
    Solution,
}

impl Action {
    pub const CHALLENGE_STR: &'static str = "challenge";
    pub const SOLUTION_STR: &'static str = "solution";

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Challenge => Self::CHALLENGE_STR,
            Action::Solution => Self::SOLUTION_STR,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a request's `action` field isn't one of the known actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAction;

impl TryFrom<&str> for Action {
    type Error = UnknownAction;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            Action::CHALLENGE_STR => Ok(Action::Challenge),
            Action::SOLUTION_STR => Ok(Action::Solution),
            _ => Err(UnknownAction),
        }
    }
}
