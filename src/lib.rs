//! Number Duel server library.
//!
//! Two players race to crack the same secret 4-digit code. The game rules
//! live in [`number_duel_core`]; this crate wraps them in a versioned round
//! store, an atomic service, and a JSON HTTP API.
//!
//! # Architecture
//!
//! - **Store**: load/save of the single shared round, with compare-and-swap
//!   versions (in-memory or SQLite)
//! - **Service**: get-or-create, new round, guess submission, player views
//! - **HTTP**: axum router mirroring the service operations
//! - **Client**: reqwest client for the HTTP API
//!
//! # Example
//!
//! ```
//! use number_duel::{DuelService, MemoryStore};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), number_duel::DuelError> {
//! let service = DuelService::new(Arc::new(MemoryStore::new()));
//! let outcome = service.submit_guess(1, "1234")?;
//! println!("feedback: {}", outcome.feedback());
//!
//! let view = service.view_for(2)?;
//! assert_eq!(view.other_guess_count, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod config;
mod error;
mod http;
mod service;
mod store;

// Crate-level exports - Client
pub use client::DuelClient;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig, StoreBackend};

// Crate-level exports - Errors
pub use error::DuelError;

// Crate-level exports - HTTP API
pub use http::{
    ApiError, ErrorBody, GuessRequest, GuessResponse, NewGameResponse, RawPlayerId, RoundSummary,
    StateQuery, router,
};

// Crate-level exports - Service
pub use service::{DEFAULT_MAX_RETRIES, DuelService};

// Crate-level exports - Storage
pub use store::{MemoryStore, ROUND_KEY, RoundStore, SqliteStore, StoreError, StoreErrorKind, Versioned};

// Crate-level exports - Game types
pub use number_duel_core::{
    Code, Feedback, GuessOutcome, GuessRecord, MAX_GUESSES, Mark, Outcome, PlayerId, PlayerView,
    Round, RoundStatus, RulesError,
};
