//! Round persistence behind a versioned load/save contract.
//!
//! Exactly one round exists, under [`ROUND_KEY`]. Every stored record
//! carries a version so writers can detect that someone else saved first.

mod error;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use derive_getters::Getters;
use derive_new::new;
use number_duel_core::Round;

/// Logical key of the single shared round.
pub const ROUND_KEY: &str = "number-duel-game";

/// A stored value together with its version.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct Versioned<T> {
    value: T,
    version: u64,
}

impl<T> Versioned<T> {
    /// Consumes the wrapper, returning the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Persistence contract for the shared round.
///
/// Versions start at 1 for the first save and grow by one with every
/// successful write.
pub trait RoundStore: Send + Sync + std::fmt::Debug {
    /// Loads the current round, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure or an undecodable record.
    fn load(&self) -> Result<Option<Versioned<Round>>, StoreError>;

    /// Saves `round` if the stored version still equals `expected`.
    ///
    /// `None` means no round may exist yet. Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreErrorKind::Conflict`] error when the stored version
    /// differs, or a backend error.
    fn save(&self, round: &Round, expected: Option<u64>) -> Result<u64, StoreError>;

    /// Overwrites whatever is stored, bumping the version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn replace(&self, round: &Round) -> Result<u64, StoreError>;
}
