//! Rule violations raised by the evaluator and the round state machine.

use crate::types::PlayerId;

/// Error that can occur when validating or applying a guess.
///
/// Every variant is a local validation failure; the round is left
/// untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RulesError {
    /// Player id is not 1 or 2.
    #[display("playerId must be 1 or 2 (got {:?})", _0)]
    InvalidPlayer(String),

    /// Guess is not exactly four decimal digits.
    #[display("guess must be 4 digits (got {:?})", _0)]
    InvalidGuess(String),

    /// The round has already finished.
    #[display("Game already over")]
    RoundOver,

    /// The player has used every guess in their budget.
    #[display("No guesses left for player {}", _0)]
    NoGuessesLeft(PlayerId),

    /// Malformed input that is neither a player nor a guess: a bad
    /// evaluator sequence or an unreadable request body.
    #[display("Invalid input: {:?}", _0)]
    InvalidInput(String),
}

impl RulesError {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPlayer(_) => "invalid_player",
            Self::InvalidGuess(_) => "invalid_guess",
            Self::RoundOver => "round_over",
            Self::NoGuessesLeft(_) => "no_guesses_left",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

impl std::error::Error for RulesError {}

/// A string that is not a 4-digit code.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{:?} is not a 4-digit code", input)]
pub struct MalformedCode {
    /// The rejected input.
    pub input: String,
}

impl MalformedCode {
    /// Creates a new malformed-code error.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

impl std::error::Error for MalformedCode {}
