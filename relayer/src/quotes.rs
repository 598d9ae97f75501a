//! Loads the rotating quote set once at startup and hands out random
//! entries. Grounded in the original `server/internal/service/quotes/
//! service.go`.

use std::path::Path;

use rand::Rng;
use thiserror::Error;
use wisdom_fort_wire::Quote;

#[derive(Debug, Error)]
pub enum QuotesError {
    #[error("failed to read quotes file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse quotes file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no quotes found")]
    Empty,
}

pub struct QuoteSource {
    quotes: Vec<Quote>,
}

impl QuoteSource {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuotesError> {
        let data = std::fs::read_to_string(path)?;
        let quotes: Vec<Quote> = serde_json::from_str(&data)?;
        if quotes.is_empty() {
            return Err(QuotesError::Empty);
        }
        Ok(Self { quotes })
    }

    pub fn get_random(&self) -> Quote {
        let idx = rand::thread_rng().gen_range(0..self.quotes.len());
        self.quotes[idx].clone()
    }
}
