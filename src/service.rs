//! Atomic operations on the single shared round.
//!
//! Every write is a load → mutate → compare-and-swap save cycle. A lost
//! race reloads and replays the submission against the fresh round, so two
//! simultaneous guesses can neither overrun a budget nor erase each other.

use crate::error::DuelError;
use crate::store::{RoundStore, Versioned};
use number_duel_core::{GuessOutcome, PlayerId, PlayerView, Round};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Default number of compare-and-swap attempts per operation.
pub const DEFAULT_MAX_RETRIES: usize = 8;

/// Game service owning the store handle.
#[derive(Debug, Clone)]
pub struct DuelService {
    store: Arc<dyn RoundStore>,
    max_retries: usize,
}

impl DuelService {
    /// Creates a service on top of `store`.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn RoundStore>) -> Self {
        info!("Creating DuelService");
        Self {
            store,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets how many compare-and-swap attempts an operation may make.
    ///
    /// Values below 1 are treated as 1.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn RoundStore> {
        &self.store
    }

    fn fresh_round() -> Round {
        Round::random(&mut rand::thread_rng())
    }

    /// Loads the current round, creating and saving one if none exists.
    fn load_or_create(&self) -> Result<Versioned<Round>, DuelError> {
        for attempt in 1..=self.max_retries {
            if let Some(current) = self.store.load()? {
                return Ok(current);
            }
            let round = Self::fresh_round();
            match self.store.save(&round, None) {
                Ok(version) => {
                    info!(version, "Created new round");
                    return Ok(Versioned::new(round, version));
                }
                Err(e) if e.is_conflict() => {
                    debug!(attempt, "Another writer created the round first");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(DuelError::Contention {
            attempts: self.max_retries,
        })
    }

    /// Returns the current round, creating one if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError`] if the store fails.
    #[instrument(skip(self))]
    pub fn get_or_create_round(&self) -> Result<Round, DuelError> {
        self.load_or_create().map(Versioned::into_value)
    }

    /// Discards any existing round and starts a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError`] if the store fails.
    #[instrument(skip(self))]
    pub fn start_new_round(&self) -> Result<Round, DuelError> {
        let round = Self::fresh_round();
        let version = self.store.replace(&round)?;
        info!(version, "Started new round");
        Ok(round)
    }

    /// Submits a guess as one atomic transaction.
    ///
    /// Player id and guess format are validated before the round is even
    /// loaded; a rejected submission never writes.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::Rules`] for rule violations,
    /// [`DuelError::Contention`] if every attempt lost the race, or
    /// [`DuelError::Store`] on store failure.
    #[instrument(skip(self))]
    pub fn submit_guess(&self, player: i64, value: &str) -> Result<GuessOutcome, DuelError> {
        let (player, guess) = Round::parse_submission(player, value)?;

        for attempt in 1..=self.max_retries {
            let current = self.load_or_create()?;
            let version = *current.version();
            let mut round = current.into_value();

            let outcome = round.apply_guess(player, guess)?;

            match self.store.save(&round, Some(version)) {
                Ok(saved) => {
                    info!(
                        %player,
                        version = saved,
                        game_over = outcome.game_over(),
                        winner = ?outcome.winner(),
                        "Guess recorded"
                    );
                    return Ok(outcome);
                }
                Err(e) if e.is_conflict() => {
                    warn!(attempt, %player, "Concurrent write detected, retrying guess");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DuelError::Contention {
            attempts: self.max_retries,
        })
    }

    /// Returns `player`'s filtered view of the current round.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::Rules`] for an unknown player or
    /// [`DuelError::Store`] on store failure.
    #[instrument(skip(self))]
    pub fn view_for(&self, player: i64) -> Result<PlayerView, DuelError> {
        let player = PlayerId::try_from(player)?;
        let round = self.get_or_create_round()?;
        Ok(round.view_for(player))
    }
}
