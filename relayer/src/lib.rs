//! Wisdom Fort relayer core components.
//!
//! This crate provides the request-processing services that sit behind
//! the listener in `wisdom-fort-server`: per-IP rate tracking, a
//! proof-of-work challenge registry, the rotating quote source handed out
//! on a solved challenge, and the connection-scoped dispatcher that wires
//! them together.
//!
//! ## Main components
//!
//! - **rps**: per-IP requests-per-second counter, built on a TTL=1s
//!   [`wisdom_fort_core::StorageRegistry`] namespace.
//! - **challenges**: issues and verifies proof-of-work challenges whose
//!   difficulty scales with the issuer's current RPS.
//! - **quotes**: loads the rotating quote set and hands out random entries.
//! - **dispatcher**: admits, authenticates, and routes a single decoded
//!   request frame to the right action.
//! - **error**: the dispatch-time error taxonomy and its mapping onto the
//!   wire's stable error codes.

pub mod challenges;
pub mod dispatcher;
pub mod error;
pub mod quotes;
pub mod rps;

pub use challenges::ChallengeRegistry;
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use quotes::{QuoteSource, QuotesError};
pub use rps::RpsCounter;
