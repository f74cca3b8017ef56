//! Review record store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RepriseResult;
use crate::types::{ContentType, DueCursor, ProgrammedReview, ReviewKey, StatusTally};

/// Mutation applied inside a store transaction.
///
/// Receives the current record for the key (`None` when it has never been
/// reviewed) and returns the record to persist. Returning an error aborts
/// the transaction with nothing written.
pub type TransactFn =
    Box<dyn FnOnce(Option<ProgrammedReview>) -> RepriseResult<ProgrammedReview> + Send>;

/// Core ReviewStore trait - all review record backends implement this.
///
/// One record per [`ReviewKey`]; different keys are fully independent.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Fetch the record for a key.
    async fn get(&self, key: &ReviewKey) -> RepriseResult<Option<ProgrammedReview>>;

    /// Atomic read-modify-write on one key.
    ///
    /// Concurrent calls for the same key serialize: the second closure sees
    /// the record the first one committed, never the same prior state. On
    /// error nothing is written. Returns the record the closure produced.
    async fn transact(&self, key: &ReviewKey, f: TransactFn) -> RepriseResult<ProgrammedReview>;

    /// List non-suspended records with `next_review_at <= now`, oldest first.
    ///
    /// Ties on `next_review_at` order by content type then content id, so a
    /// cursor identifies an exact position. `cursor` is the sort key of the
    /// last record already returned; the page starts strictly after it.
    /// Returns at most `limit` records plus the cursor for the next page
    /// (`None` when the listing is exhausted).
    async fn query_due(
        &self,
        user_id: &str,
        content_type: Option<ContentType>,
        now: DateTime<Utc>,
        cursor: Option<DueCursor>,
        limit: usize,
    ) -> RepriseResult<(Vec<ProgrammedReview>, Option<DueCursor>)>;

    /// Delete the record for a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &ReviewKey) -> RepriseResult<()>;

    /// Per-status counts for a user, optionally narrowed to one family.
    ///
    /// `now` bounds the due count; `leech_threshold` bounds the leech count.
    async fn count_by_status(
        &self,
        user_id: &str,
        content_type: Option<ContentType>,
        now: DateTime<Utc>,
        leech_threshold: u32,
    ) -> RepriseResult<StatusTally>;
}
