//! In-process round store.

use super::{RoundStore, StoreError, Versioned};
use number_duel_core::Round;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

/// Mutex-guarded single-slot store for one process.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<Versioned<Round>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating in-memory round store");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Versioned<Round>>>, StoreError> {
        self.slot
            .lock()
            .map_err(|e| StoreError::backend(format!("Round slot poisoned: {}", e)))
    }
}

impl RoundStore for MemoryStore {
    #[instrument(skip(self))]
    fn load(&self) -> Result<Option<Versioned<Round>>, StoreError> {
        Ok(self.lock()?.clone())
    }

    #[instrument(skip(self, round))]
    fn save(&self, round: &Round, expected: Option<u64>) -> Result<u64, StoreError> {
        let mut slot = self.lock()?;
        let current = slot.as_ref().map(|v| *v.version());
        if current != expected {
            warn!(?current, ?expected, "Version mismatch on save");
            return Err(StoreError::conflict(format!(
                "expected version {:?}, found {:?}",
                expected, current
            )));
        }
        let next = current.unwrap_or(0) + 1;
        *slot = Some(Versioned::new(round.clone(), next));
        debug!(version = next, "Round saved");
        Ok(next)
    }

    #[instrument(skip(self, round))]
    fn replace(&self, round: &Round) -> Result<u64, StoreError> {
        let mut slot = self.lock()?;
        let next = slot.as_ref().map_or(0, |v| *v.version()) + 1;
        *slot = Some(Versioned::new(round.clone(), next));
        debug!(version = next, "Round replaced");
        Ok(next)
    }
}
