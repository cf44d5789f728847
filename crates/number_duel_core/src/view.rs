//! Per-player projection of a round.

use crate::round::GuessRecord;
use crate::types::{Code, PlayerId};
use serde::{Deserialize, Serialize};

/// What one player is allowed to see of the shared round.
///
/// Built by [`Round::view_for`](crate::Round::view_for). While the round is
/// live, `other_guesses` is empty and `target_revealed` is `None`; both are
/// filled in once the round finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// The requesting player.
    pub player: PlayerId,
    /// The requesting player's own guesses.
    pub my_guesses: Vec<GuessRecord>,
    /// Number of own guesses.
    pub my_guess_count: usize,
    /// Number of opponent guesses.
    pub other_guess_count: usize,
    /// Opponent guesses, only after the round finished.
    pub other_guesses: Vec<GuessRecord>,
    /// Guess budget per player.
    pub max_guesses: usize,
    /// Winner, if the round was won.
    pub winner: Option<PlayerId>,
    /// Whether the round has finished.
    pub game_over: bool,
    /// The secret, only after the round finished.
    pub target_revealed: Option<Code>,
}

impl PlayerView {
    /// Guesses the requesting player still has.
    pub fn remaining(&self) -> usize {
        self.max_guesses.saturating_sub(self.my_guess_count)
    }
}
