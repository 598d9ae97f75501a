//! Per-connection admission, authentication, and routing — the heart of
//! the request-processing pipeline.
//!
//! Deliberately takes the already-read bytes and the already-extracted
//! peer IP as plain arguments rather than a socket, so the admission and
//! routing logic is unit-testable without a TCP listener.

use std::sync::Arc;

use log::{debug, trace, warn};
use serde::Serialize;
use serde_json::value::RawValue;
use wisdom_fort_wire::{
    Action, ChallengePayload, Request, SolutionRequestPayload, SolutionResponsePayload, Token,
};

use crate::challenges::ChallengeRegistry;
use crate::error::DispatchError;
use crate::quotes::QuoteSource;
use crate::rps::RpsCounter;

#[derive(Clone)]
pub struct Dispatcher {
    rps: RpsCounter,
    challenges: ChallengeRegistry,
    quotes: Arc<QuoteSource>,
    rps_limit_unauth: u64,
}

impl Dispatcher {
    pub fn new(
        rps: RpsCounter,
        challenges: ChallengeRegistry,
        quotes: Arc<QuoteSource>,
        rps_limit_unauth: u64,
    ) -> Self {
        Self {
            rps,
            challenges,
            quotes,
            rps_limit_unauth,
        }
    }

    /// Decodes `raw`, admits/authenticates the caller at `peer_ip`, and
    /// routes to the requested action.
    ///
    /// Returns the token that should appear in the response envelope
    /// (empty if none could be determined, e.g. a malformed frame or a
    /// missing-token rejection) alongside either a success payload or the
    /// error that should be reported.
    pub async fn handle(&self, peer_ip: &str, raw: &[u8]) -> (Option<Token>, Result<Box<RawValue>, DispatchError>) {
        let request: Request = match serde_json::from_slice(raw) {
            Ok(r) => r,
            Err(e) => {
                warn!("malformed request from {peer_ip}: {e}");
                return (None, Err(DispatchError::InvalidMsgFormat(e.to_string())));
            }
        };

        self.rps.inc(peer_ip).await;

        let token = match self.authenticate(peer_ip, &request).await {
            Ok(t) => t,
            Err(e) => return (None, Err(e)),
        };

        let result = self.route(&token, &request).await;
        (Some(token), result)
    }

    /// Determines the token to act under: a non-empty caller-supplied
    /// token is trusted as-is; an anonymous
    /// `solution` request is rejected; an anonymous non-`solution` request
    /// is subject to the unauthenticated RPS ceiling and, if accepted,
    /// gets a freshly minted token.
    async fn authenticate(&self, peer_ip: &str, request: &Request) -> Result<Token, DispatchError> {
        if let Some(t) = request.token.as_deref().filter(|t| !t.is_empty()) {
            trace!("caller presented token");
            return Ok(Token::from(t.to_string()));
        }

        if request.action == Action::SOLUTION_STR {
            return Err(DispatchError::MissingToken);
        }

        let current_rps = self.rps.get(peer_ip).await;
        if current_rps > self.rps_limit_unauth {
            debug!("rejecting {peer_ip}: rps {current_rps} exceeds unauth limit {}", self.rps_limit_unauth);
            return Err(DispatchError::TooManyRequests);
        }

        Ok(Token::mint(peer_ip))
    }

    async fn route(&self, token: &Token, request: &Request) -> Result<Box<RawValue>, DispatchError> {
        match Action::try_from(request.action.as_str()) {
            Ok(Action::Challenge) => self.handle_challenge(token).await,
            Ok(Action::Solution) => self.handle_solution(token, request).await,
            Err(_) => Err(DispatchError::InvalidAction(request.action.clone())),
        }
    }

    /// Returns the existing difficulty for `token` if one is already
    /// issued and unexpired; otherwise computes and stores a fresh one.
    async fn handle_challenge(&self, token: &Token) -> Result<Box<RawValue>, DispatchError> {
        let difficulty = match self.challenges.current(token).await {
            Ok(d) => d,
            Err(_not_found) => self.challenges.compute(token).await,
        };
        to_raw(&ChallengePayload { target: difficulty })
    }

    async fn handle_solution(&self, token: &Token, request: &Request) -> Result<Box<RawValue>, DispatchError> {
        let raw_payload = request
            .payload
            .as_ref()
            .ok_or_else(|| DispatchError::InvalidPayloadFormat("missing payload".to_string()))?;

        let payload: SolutionRequestPayload = serde_json::from_str(raw_payload.get())
            .map_err(|e| DispatchError::InvalidPayloadFormat(e.to_string()))?;

        match self.challenges.verify(token, payload.solution).await {
            Ok(true) => {
                let quote = self.quotes.get_random();
                to_raw(&SolutionResponsePayload { quote })
            }
            Ok(false) | Err(_) => Err(DispatchError::InvalidSolution),
        }
    }
}

fn to_raw<T: Serialize>(value: &T) -> Result<Box<RawValue>, DispatchError> {
    let json = serde_json::to_string(value).map_err(|e| DispatchError::Generic(e.to_string()))?;
    RawValue::from_string(json).map_err(|e| DispatchError::Generic(e.to_string()))
}
