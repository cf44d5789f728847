//! Durable round store on SQLite.

use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use number_duel_core::Round;
use tracing::{debug, info, instrument, warn};

use super::models::{NewRoundRow, RoundRow};
use super::{ROUND_KEY, RoundStore, StoreError, Versioned, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Key-value round store backed by a SQLite file.
///
/// Each operation opens its own connection, so clones and separate
/// processes sharing the file all see the same round. Compare-and-swap is
/// a conditional `UPDATE` on the version column.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the store at `db_path`, creating the schema if needed.
    ///
    /// `":memory:"` is not useful here: every call gets a fresh connection
    /// and would see an empty database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StoreError> {
        info!(path = %db_path, "Opening SQLite round store");
        let store = Self { db_path };
        let mut conn = store.connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::backend(format!("Migrations failed: {}", e)))?;
        Ok(store)
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::backend(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }
}

fn to_db_version(version: u64) -> Result<i64, StoreError> {
    i64::try_from(version).map_err(|_| StoreError::backend(format!("Version {} out of range", version)))
}

impl RoundStore for SqliteStore {
    #[instrument(skip(self))]
    fn load(&self) -> Result<Option<Versioned<Round>>, StoreError> {
        let mut conn = self.connection()?;

        let row = schema::rounds::table
            .filter(schema::rounds::key.eq(ROUND_KEY))
            .select(RoundRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => {
                let round = row.decode()?;
                debug!(version = round.version(), "Round loaded");
                Ok(Some(round))
            }
            None => {
                debug!("No round stored");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, round))]
    fn save(&self, round: &Round, expected: Option<u64>) -> Result<u64, StoreError> {
        let mut conn = self.connection()?;
        let data = serde_json::to_string(round)?;
        let now = Utc::now().naive_utc();

        let Some(expected) = expected else {
            // Unique key violation maps to a conflict.
            diesel::insert_into(schema::rounds::table)
                .values(&NewRoundRow::new(ROUND_KEY.to_string(), 1, data, now))
                .execute(&mut conn)?;
            debug!(version = 1, "Round inserted");
            return Ok(1);
        };

        let current = to_db_version(expected)?;
        let updated = diesel::update(
            schema::rounds::table
                .filter(schema::rounds::key.eq(ROUND_KEY))
                .filter(schema::rounds::version.eq(current)),
        )
        .set((
            schema::rounds::version.eq(current + 1),
            schema::rounds::data.eq(&data),
            schema::rounds::updated_at.eq(now),
        ))
        .execute(&mut conn)?;

        if updated == 1 {
            debug!(version = expected + 1, "Round saved");
            Ok(expected + 1)
        } else {
            warn!(expected, "Version mismatch on save");
            Err(StoreError::conflict(format!(
                "round is no longer at version {}",
                expected
            )))
        }
    }

    #[instrument(skip(self, round))]
    fn replace(&self, round: &Round) -> Result<u64, StoreError> {
        let mut conn = self.connection()?;
        let data = serde_json::to_string(round)?;
        let now = Utc::now().naive_utc();

        let next = conn.immediate_transaction(|conn| {
            let current: Option<i64> = schema::rounds::table
                .filter(schema::rounds::key.eq(ROUND_KEY))
                .select(schema::rounds::version)
                .first(conn)
                .optional()?;
            let next = current.unwrap_or(0) + 1;
            diesel::replace_into(schema::rounds::table)
                .values(&NewRoundRow::new(ROUND_KEY.to_string(), next, data, now))
                .execute(conn)?;
            Ok::<_, StoreError>(next)
        })?;

        debug!(version = next, "Round replaced");
        u64::try_from(next).map_err(|_| StoreError::backend(format!("Version {} out of range", next)))
    }
}
