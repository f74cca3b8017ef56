//! SQLite-backed review store implementation.
//!
//! One row per review key. Enum columns store the same SCREAMING_SNAKE_CASE
//! text the JSON API uses; timestamps store RFC 3339 text, which compares
//! chronologically as text for UTC values.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};

use reprise_core::error::{RepriseError, RepriseResult};
use reprise_core::traits::{ReviewStore, TransactFn};
use reprise_core::types::{ContentType, DueCursor, ProgrammedReview, ReviewKey, StatusTally};

/// SQLite-backed store for review records.
///
/// A single connection behind a mutex serializes writers; `transact` wraps
/// its read-modify-write in an immediate transaction, so a closure never
/// observes a record another call is still mutating.
pub struct SqliteReviewStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReviewStore {
    /// Create a new review store with the given database path.
    ///
    /// Creates the database file and schema if it doesn't exist.
    pub fn new<P: AsRef<Path>>(path: P) -> RepriseResult<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| {
            RepriseError::store_connection(format!("failed to open review database: {}", e))
        })?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        tracing::debug!(path = %path.as_ref().display(), "opened review database");
        Ok(store)
    }

    /// Create an in-memory review store (useful for testing).
    pub fn in_memory() -> RepriseResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            RepriseError::store_connection(format!("failed to open review database: {}", e))
        })?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> RepriseResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepriseError::store_unavailable(e.to_string()))?;

        conn.execute_batch(
            "
            -- Review records, one row per (user, content, content family)
            CREATE TABLE IF NOT EXISTS programmed_reviews (
                user_id TEXT NOT NULL,
                content_id TEXT NOT NULL,
                content_type TEXT NOT NULL,
                status TEXT NOT NULL,
                ease_factor REAL NOT NULL,
                interval_days INTEGER NOT NULL,
                repetitions INTEGER NOT NULL DEFAULT 0,
                lapses INTEGER NOT NULL DEFAULT 0,
                last_reviewed_at TEXT NOT NULL,
                next_review_at TEXT NOT NULL,
                original_answer_correct INTEGER NOT NULL,
                PRIMARY KEY (user_id, content_id, content_type)
            );

            CREATE INDEX IF NOT EXISTS idx_programmed_reviews_due
                ON programmed_reviews(user_id, next_review_at, content_type, content_id);
            CREATE INDEX IF NOT EXISTS idx_programmed_reviews_status
                ON programmed_reviews(user_id, status);
            ",
        )
        .map_err(RepriseError::store_unavailable)?;

        Ok(())
    }
}

#[async_trait]
impl ReviewStore for SqliteReviewStore {
    async fn get(&self, key: &ReviewKey) -> RepriseResult<Option<ProgrammedReview>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepriseError::store_unavailable(e.to_string()))?;

        let review = conn
            .query_row(
                "SELECT user_id, content_id, content_type, status, ease_factor, interval_days,
                        repetitions, lapses, last_reviewed_at, next_review_at,
                        original_answer_correct
                 FROM programmed_reviews
                 WHERE user_id = ?1 AND content_id = ?2 AND content_type = ?3",
                params![key.user_id, key.content_id, key.content_type.to_string()],
                row_to_review,
            )
            .optional()
            .map_err(RepriseError::store_unavailable)?;

        Ok(review)
    }

    async fn transact(&self, key: &ReviewKey, f: TransactFn) -> RepriseResult<ProgrammedReview> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepriseError::store_unavailable(e.to_string()))?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(RepriseError::store_unavailable)?;

        let current = tx
            .query_row(
                "SELECT user_id, content_id, content_type, status, ease_factor, interval_days,
                        repetitions, lapses, last_reviewed_at, next_review_at,
                        original_answer_correct
                 FROM programmed_reviews
                 WHERE user_id = ?1 AND content_id = ?2 AND content_type = ?3",
                params![key.user_id, key.content_id, key.content_type.to_string()],
                row_to_review,
            )
            .optional()
            .map_err(RepriseError::store_unavailable)?;

        // A closure error drops the transaction unwritten
        let updated = f(current)?;

        tx.execute(
            "INSERT OR REPLACE INTO programmed_reviews
             (user_id, content_id, content_type, status, ease_factor, interval_days,
              repetitions, lapses, last_reviewed_at, next_review_at, original_answer_correct)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                updated.user_id,
                updated.content_id,
                updated.content_type.to_string(),
                updated.status.to_string(),
                updated.ease_factor,
                updated.interval_days,
                updated.repetitions,
                updated.lapses,
                updated.last_reviewed_at.to_rfc3339(),
                updated.next_review_at.to_rfc3339(),
                if updated.original_answer_correct { 1 } else { 0 },
            ],
        )
        .map_err(RepriseError::store_unavailable)?;

        tx.commit().map_err(RepriseError::store_unavailable)?;

        Ok(updated)
    }

    async fn query_due(
        &self,
        user_id: &str,
        content_type: Option<ContentType>,
        now: DateTime<Utc>,
        cursor: Option<DueCursor>,
        limit: usize,
    ) -> RepriseResult<(Vec<ProgrammedReview>, Option<DueCursor>)> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepriseError::store_unavailable(e.to_string()))?;

        // Every bind value is TEXT, so the clauses are assembled with their
        // parameters side by side. Fetching one row past `limit` tells us
        // whether another page exists.
        let mut sql = String::from(
            "SELECT user_id, content_id, content_type, status, ease_factor, interval_days,
                    repetitions, lapses, last_reviewed_at, next_review_at,
                    original_answer_correct
             FROM programmed_reviews
             WHERE user_id = ?1 AND status != 'SUSPENDED' AND next_review_at <= ?2",
        );
        let mut binds: Vec<String> = vec![user_id.to_string(), now.to_rfc3339()];

        if let Some(kind) = content_type {
            binds.push(kind.to_string());
            sql.push_str(&format!(" AND content_type = ?{}", binds.len()));
        }
        if let Some(c) = &cursor {
            let t = binds.len() + 1;
            binds.push(c.next_review_at.to_rfc3339());
            binds.push(c.content_type.to_string());
            binds.push(c.content_id.clone());
            sql.push_str(&format!(
                " AND (next_review_at > ?{t}
                   OR (next_review_at = ?{t} AND content_type > ?{u})
                   OR (next_review_at = ?{t} AND content_type = ?{u} AND content_id > ?{v}))",
                t = t,
                u = t + 1,
                v = t + 2,
            ));
        }
        sql.push_str(&format!(
            " ORDER BY next_review_at ASC, content_type ASC, content_id ASC LIMIT {}",
            limit.saturating_add(1)
        ));

        let mut stmt = conn.prepare(&sql).map_err(RepriseError::store_unavailable)?;
        let mut rows: Vec<ProgrammedReview> = stmt
            .query_map(params_from_iter(binds.iter()), row_to_review)
            .map_err(RepriseError::store_unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepriseError::store_unavailable)?;

        let next = if rows.len() > limit {
            rows.truncate(limit);
            rows.last()
                .map(|r| DueCursor::after(r.next_review_at, r.content_type, r.content_id.clone()))
        } else {
            None
        };

        Ok((rows, next))
    }

    async fn delete(&self, key: &ReviewKey) -> RepriseResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepriseError::store_unavailable(e.to_string()))?;

        conn.execute(
            "DELETE FROM programmed_reviews
             WHERE user_id = ?1 AND content_id = ?2 AND content_type = ?3",
            params![key.user_id, key.content_id, key.content_type.to_string()],
        )
        .map_err(RepriseError::store_unavailable)?;

        Ok(())
    }

    async fn count_by_status(
        &self,
        user_id: &str,
        content_type: Option<ContentType>,
        now: DateTime<Utc>,
        leech_threshold: u32,
    ) -> RepriseResult<StatusTally> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepriseError::store_unavailable(e.to_string()))?;

        let tally = conn
            .query_row(
                "SELECT
                     COUNT(CASE WHEN status = 'LEARNING' THEN 1 END),
                     COUNT(CASE WHEN status = 'REVIEWING' THEN 1 END),
                     COUNT(CASE WHEN status = 'SUSPENDED' THEN 1 END),
                     COUNT(CASE WHEN status != 'SUSPENDED' AND next_review_at <= ?2 THEN 1 END),
                     COUNT(CASE WHEN lapses >= ?3 THEN 1 END)
                 FROM programmed_reviews
                 WHERE user_id = ?1 AND (?4 IS NULL OR content_type = ?4)",
                params![
                    user_id,
                    now.to_rfc3339(),
                    leech_threshold,
                    content_type.map(|kind| kind.to_string()),
                ],
                |row| {
                    Ok(StatusTally {
                        learning: row.get::<_, i64>(0)? as u64,
                        reviewing: row.get::<_, i64>(1)? as u64,
                        suspended: row.get::<_, i64>(2)? as u64,
                        due: row.get::<_, i64>(3)? as u64,
                        leeches: row.get::<_, i64>(4)? as u64,
                    })
                },
            )
            .map_err(RepriseError::store_unavailable)?;

        Ok(tally)
    }
}

/// Map one `programmed_reviews` row onto a record.
fn row_to_review(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProgrammedReview> {
    let content_type_str: String = row.get(2)?;
    let status_str: String = row.get(3)?;
    let last_reviewed_str: String = row.get(8)?;
    let next_review_str: String = row.get(9)?;
    let original_correct: i64 = row.get(10)?;

    let content_type = content_type_str
        .parse::<ContentType>()
        .map_err(|e| text_column_error(2, e))?;
    let status = status_str
        .parse()
        .map_err(|e| text_column_error(3, e))?;
    let last_reviewed_at = DateTime::parse_from_rfc3339(&last_reviewed_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| text_column_error(8, e))?;
    let next_review_at = DateTime::parse_from_rfc3339(&next_review_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| text_column_error(9, e))?;

    Ok(ProgrammedReview {
        user_id: row.get(0)?,
        content_id: row.get(1)?,
        content_type,
        status,
        ease_factor: row.get(4)?,
        interval_days: row.get(5)?,
        repetitions: row.get(6)?,
        lapses: row.get(7)?,
        last_reviewed_at,
        next_review_at,
        original_answer_correct: original_correct != 0,
    })
}

/// Conversion failure for a TEXT column holding an enum or timestamp.
fn text_column_error(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}
