//! Database row models.

use chrono::NaiveDateTime;
use derive_new::new;
use diesel::prelude::*;
use number_duel_core::{InvariantSet, Round, RoundInvariants};
use tracing::instrument;

use super::{StoreError, StoreErrorKind, Versioned, schema};

/// Stored round row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schema::rounds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RoundRow {
    key: String,
    version: i64,
    data: String,
    updated_at: NaiveDateTime,
}

impl RoundRow {
    /// Decodes the JSON payload into a versioned round.
    #[instrument(skip(self), fields(key = %self.key, version = self.version, updated_at = %self.updated_at))]
    pub fn decode(&self) -> Result<Versioned<Round>, StoreError> {
        let version = u64::try_from(self.version).map_err(|_| {
            StoreError::new(
                StoreErrorKind::Corrupt,
                format!("Negative version {} for '{}'", self.version, self.key),
            )
        })?;
        let round: Round = serde_json::from_str(&self.data)?;
        RoundInvariants::check_all(&round).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            StoreError::new(
                StoreErrorKind::Corrupt,
                format!("Stored round for '{}' is inconsistent: {}", self.key, descriptions),
            )
        })?;
        Ok(Versioned::new(round, version))
    }
}

/// Insertable round row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::rounds)]
pub struct NewRoundRow {
    key: String,
    version: i64,
    data: String,
    updated_at: NaiveDateTime,
}
