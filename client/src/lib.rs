//! Thin client for the wisdom-fort proof-of-work quote server.
//!
//! Mirrors the original `client/client.go`: connect, request a challenge,
//! solve it, submit the solution, receive a quote. Each request opens a
//! fresh connection, writes one JSON frame, and reads the single response
//! frame back — there is no persistent session.

mod error;

use log::debug;
use serde_json::value::RawValue;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use wisdom_fort_wire::{
    pow, Action, ChallengePayload, Quote, Request as WireRequest, Response,
    SolutionRequestPayload, SolutionResponsePayload,
};

pub use error::ClientError;

/// A challenge issued by the server: the token it was issued under and
/// the proof-of-work difficulty that must be met to solve it.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub token: String,
    pub difficulty: u8,
}

#[derive(Debug, Clone)]
pub struct Client {
    host: String,
    port: u16,
}

impl Client {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Runs the full flow: get a challenge, solve it, submit the solution.
    pub async fn get_quote(&self) -> Result<Quote, ClientError> {
        let challenge = self.get_challenge().await?;
        let solution = self.solve_challenge(&challenge);
        self.submit_solution(&challenge.token, solution).await
    }

    pub async fn get_challenge(&self) -> Result<Challenge, ClientError> {
        debug!("requesting challenge from {}:{}", self.host, self.port);
        let request = WireRequest {
            token: None,
            action: Action::CHALLENGE_STR.to_string(),
            payload: None,
        };
        let response = self.roundtrip(&request).await?;
        let payload = response_payload::<ChallengePayload>(&response)?;
        Ok(Challenge {
            token: response.token,
            difficulty: payload.target,
        })
    }

    pub fn solve_challenge(&self, challenge: &Challenge) -> u64 {
        pow::solve(&challenge.token, challenge.difficulty)
    }

    pub async fn submit_solution(&self, token: &str, solution: u64) -> Result<Quote, ClientError> {
        let payload = serde_json::to_string(&SolutionRequestPayload { solution })?;
        let request = WireRequest {
            token: Some(token.to_string()),
            action: Action::SOLUTION_STR.to_string(),
            payload: Some(RawValue::from_string(payload)?),
        };
        let response = self.roundtrip(&request).await?;
        let payload = response_payload::<SolutionResponsePayload>(&response)?;
        Ok(payload.quote)
    }

    async fn roundtrip(&self, request: &WireRequest) -> Result<Response, ClientError> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port)).await?;

        let bytes = serde_json::to_vec(request)?;
        stream.write_all(&bytes).await?;
        stream.shutdown().await?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;

        let response: Response = serde_json::from_slice(&buf)?;
        if let Some(message) = &response.error {
            return Err(ClientError::Server {
                message: message.clone(),
                code: response.error_code.clone(),
            });
        }
        Ok(response)
    }
}

fn response_payload<T: serde::de::DeserializeOwned>(response: &Response) -> Result<T, ClientError> {
    let raw = response.payload.as_ref().ok_or_else(|| ClientError::Server {
        message: "response carried no payload".to_string(),
        code: None,
    })?;
    Ok(serde_json::from_str(raw.get())?)
}
