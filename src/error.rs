//! Service-level errors.

use crate::store::StoreError;
use derive_more::Display;
use number_duel_core::RulesError;

/// Error returned by [`DuelService`](crate::DuelService) operations.
#[derive(Debug, Clone, Display)]
pub enum DuelError {
    /// The submission broke a game rule; nothing was changed.
    #[display("{}", _0)]
    Rules(RulesError),

    /// The store failed.
    #[display("{}", _0)]
    Store(StoreError),

    /// Every attempt lost the compare-and-swap race.
    #[display("Round still contended after {} attempts", attempts)]
    Contention {
        /// Attempts made before giving up.
        attempts: usize,
    },
}

impl DuelError {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Rules(e) => e.reason(),
            Self::Store(_) => "store_failure",
            Self::Contention { .. } => "contention",
        }
    }
}

impl std::error::Error for DuelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rules(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Contention { .. } => None,
        }
    }
}

impl From<RulesError> for DuelError {
    fn from(err: RulesError) -> Self {
        Self::Rules(err)
    }
}

impl From<StoreError> for DuelError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
