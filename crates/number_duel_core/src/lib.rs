//! Pure game logic for the number duel.
//!
//! Two players race to discover the same secret 4-digit code. Each guess
//! earns per-digit feedback ([`Mark::Correct`], [`Mark::Present`],
//! [`Mark::Absent`]); the first player to submit the secret wins, and the
//! round is a draw once both players have spent [`MAX_GUESSES`] guesses.
//!
//! This crate has no I/O. Persistence and transport live in `number_duel`.
//!
//! # Example
//!
//! ```
//! use number_duel_core::{Mark, PlayerId, Round};
//!
//! let mut round = Round::new("1234".parse().unwrap());
//! let outcome = round.submit_guess(1, "1123").unwrap();
//! assert_eq!(
//!     outcome.feedback().marks(),
//!     &[Mark::Correct, Mark::Absent, Mark::Present, Mark::Present]
//! );
//!
//! // Player 2 cannot see player 1's guesses while the round is live.
//! let view = round.view_for(PlayerId::Two);
//! assert_eq!(view.other_guess_count, 1);
//! assert!(view.other_guesses.is_empty());
//! assert!(view.target_revealed.is_none());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod evaluate;
mod invariants;
mod round;
mod types;
mod view;

pub use error::{MalformedCode, RulesError};
pub use evaluate::{evaluate, score};
pub use invariants::{
    FeedbackConsistentInvariant, HistoryBoundedInvariant, Invariant, InvariantSet,
    InvariantViolation, OutcomeConsistentInvariant, RoundInvariants,
};
pub use round::{GuessOutcome, GuessRecord, Outcome, PlayerRecord, Round, RoundStatus};
pub use types::{Code, DIGITS, Feedback, MAX_GUESSES, Mark, PlayerId};
pub use view::PlayerView;
