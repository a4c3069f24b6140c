//! Artswap - assignment service for art exchange events
//!
//! This library pairs every participant with another participant to create art
//! for, respecting self-assignment, blacklist and repeat-pairing constraints.
//! The engine in [`core`] is a randomized greedy matcher with bounded retries
//! that reports who could not be placed instead of failing.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{can_assign, MatchReport, Matcher, MatchRun, RetryPolicy};
pub use error::MatchError;
pub use models::{AttemptOutcome, Pairing, Participant, Roster};
