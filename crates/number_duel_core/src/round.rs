//! The shared round and its state machine.
//!
//! A round starts `Live` and moves to `Finished` exactly once, either when a
//! player submits the secret or when both players have spent their budget.

use crate::error::RulesError;
use crate::evaluate::score;
use crate::invariants::assert_invariants;
use crate::types::{Code, Feedback, MAX_GUESSES, PlayerId};
use crate::view::PlayerView;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// A submitted guess paired with the feedback it earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    value: Code,
    #[serde(rename = "colors")]
    feedback: Feedback,
}

impl GuessRecord {
    /// Creates a new guess record.
    pub fn new(value: Code, feedback: Feedback) -> Self {
        Self { value, feedback }
    }

    /// The guessed code.
    pub fn value(&self) -> &Code {
        &self.value
    }

    /// The feedback computed at submission time.
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }
}

/// One player's append-only guess history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    guesses: Vec<GuessRecord>,
}

impl PlayerRecord {
    /// Guesses in submission order.
    pub fn guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    /// Number of guesses submitted.
    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    /// True if no guess has been submitted.
    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }

    /// Guesses still available.
    pub fn remaining(&self) -> usize {
        MAX_GUESSES.saturating_sub(self.guesses.len())
    }

    /// True once the budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.guesses.len() >= MAX_GUESSES
    }
}

/// How a finished round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A player submitted the secret.
    Winner(PlayerId),
    /// Both players ran out of guesses.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the round was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "Player {} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Accepting guesses.
    #[default]
    Live,
    /// Concluded; absorbing.
    Finished(Outcome),
}

impl RoundStatus {
    /// True once the round has concluded.
    pub fn is_finished(&self) -> bool {
        matches!(self, RoundStatus::Finished(_))
    }

    /// The winner, if the round was won.
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            RoundStatus::Live => None,
            RoundStatus::Finished(outcome) => outcome.winner(),
        }
    }
}

/// Result of an accepted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessOutcome {
    guess: GuessRecord,
    status: RoundStatus,
}

impl GuessOutcome {
    /// The recorded guess with its feedback.
    pub fn guess(&self) -> &GuessRecord {
        &self.guess
    }

    /// Feedback for the guess.
    pub fn feedback(&self) -> &Feedback {
        self.guess.feedback()
    }

    /// Round status right after the guess.
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// True if this guess ended the round.
    pub fn game_over(&self) -> bool {
        self.status.is_finished()
    }

    /// Winner after this guess, if any.
    pub fn winner(&self) -> Option<PlayerId> {
        self.status.winner()
    }
}

/// One complete duel: a secret and both players' histories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    secret: Code,
    player_one: PlayerRecord,
    player_two: PlayerRecord,
    status: RoundStatus,
}

impl Round {
    /// Creates a live round with the given secret and empty histories.
    #[instrument(skip(secret))]
    pub fn new(secret: Code) -> Self {
        debug!("Creating round");
        Self {
            secret,
            player_one: PlayerRecord::default(),
            player_two: PlayerRecord::default(),
            status: RoundStatus::Live,
        }
    }

    /// Creates a live round with a freshly drawn secret.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(Code::random(rng))
    }

    /// The secret code.
    ///
    /// Never hand this to players directly; use [`Round::view_for`].
    pub fn secret(&self) -> &Code {
        &self.secret
    }

    /// Current status.
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// True once the round has concluded.
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// The given player's history.
    pub fn record(&self, player: PlayerId) -> &PlayerRecord {
        match player {
            PlayerId::One => &self.player_one,
            PlayerId::Two => &self.player_two,
        }
    }

    fn record_mut(&mut self, player: PlayerId) -> &mut PlayerRecord {
        match player {
            PlayerId::One => &mut self.player_one,
            PlayerId::Two => &mut self.player_two,
        }
    }

    /// Validates and applies a raw guess submission.
    ///
    /// Input checks (player id, then guess format) run before the state
    /// checks (round over, then budget).
    ///
    /// # Errors
    ///
    /// Returns a [`RulesError`] and leaves the round unchanged if the
    /// player id is not 1 or 2, the value is not four digits, the round is
    /// over, or the player has no guesses left.
    #[instrument(skip(self), fields(status = ?self.status))]
    pub fn submit_guess(&mut self, player: i64, value: &str) -> Result<GuessOutcome, RulesError> {
        let (player, guess) = Self::parse_submission(player, value)?;
        self.apply_guess(player, guess)
    }

    /// Validates the input half of a submission without touching any round.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::InvalidPlayer`] or [`RulesError::InvalidGuess`].
    pub fn parse_submission(player: i64, value: &str) -> Result<(PlayerId, Code), RulesError> {
        let player = PlayerId::try_from(player).inspect_err(|e| {
            warn!(error = %e, "Rejected guess from unknown player");
        })?;
        let guess: Code = value.parse().map_err(|_| {
            warn!(%player, value, "Rejected malformed guess");
            RulesError::InvalidGuess(value.to_string())
        })?;
        Ok((player, guess))
    }

    /// Applies an already-parsed guess.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::RoundOver`] or [`RulesError::NoGuessesLeft`]
    /// and leaves the round unchanged.
    #[instrument(skip(self), fields(status = ?self.status))]
    pub fn apply_guess(&mut self, player: PlayerId, guess: Code) -> Result<GuessOutcome, RulesError> {
        if self.is_finished() {
            warn!(%player, "Guess after round finished");
            return Err(RulesError::RoundOver);
        }
        if self.record(player).is_exhausted() {
            warn!(%player, "Guess budget exhausted");
            return Err(RulesError::NoGuessesLeft(player));
        }

        let record = GuessRecord::new(guess, score(&guess, &self.secret));
        self.record_mut(player).guesses.push(record);
        self.update_status(player, &guess);

        if cfg!(debug_assertions) {
            assert_invariants(self);
        }

        info!(
            %player,
            feedback = %record.feedback(),
            guesses = self.record(player).len(),
            status = ?self.status,
            "Guess accepted"
        );

        Ok(GuessOutcome {
            guess: record,
            status: self.status,
        })
    }

    /// Decides termination after a guess was appended.
    fn update_status(&mut self, player: PlayerId, guess: &Code) {
        if *guess == self.secret {
            info!(%player, "Secret found, round won");
            self.status = RoundStatus::Finished(Outcome::Winner(player));
        } else if PlayerId::ALL.iter().all(|p| self.record(*p).is_exhausted()) {
            info!("Both players out of guesses, round drawn");
            self.status = RoundStatus::Finished(Outcome::Draw);
        }
    }

    /// Projects the round as seen by `player`.
    ///
    /// The opponent's guesses and the secret stay hidden while the round
    /// is live.
    pub fn view_for(&self, player: PlayerId) -> PlayerView {
        let mine = self.record(player);
        let theirs = self.record(player.opponent());
        let finished = self.is_finished();

        PlayerView {
            player,
            my_guesses: mine.guesses().to_vec(),
            my_guess_count: mine.len(),
            other_guess_count: theirs.len(),
            other_guesses: if finished {
                theirs.guesses().to_vec()
            } else {
                Vec::new()
            },
            max_guesses: MAX_GUESSES,
            winner: self.status.winner(),
            game_over: finished,
            target_revealed: finished.then_some(self.secret),
        }
    }
}

#[cfg(test)]
impl Round {
    /// Appends a record without any checks, for invariant tests.
    pub(crate) fn push_unchecked(&mut self, player: PlayerId, record: GuessRecord) {
        self.record_mut(player).guesses.push(record);
    }

    /// Overwrites the status without any checks, for invariant tests.
    pub(crate) fn set_status_unchecked(&mut self, status: RoundStatus) {
        self.status = status;
    }
}
