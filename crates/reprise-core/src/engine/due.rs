//! Due-item querying and scheduling summaries.

use chrono::Utc;

use crate::error::RepriseResult;
use crate::types::{ContentType, DueCursor, Page, ProgrammedReview, ReviewSummary};

use super::{validate_identifier, ReviewEngine};

impl ReviewEngine {
    /// List a user's due reviews, oldest due first.
    ///
    /// Selects active records whose `next_review_at` has elapsed, optionally
    /// narrowed to one content family. `limit` 0 selects the configured
    /// default page size; oversized limits are clamped, not rejected. The
    /// cursor must be a token from a previous page of the same listing.
    /// Nothing due is an empty page, not an error.
    ///
    /// # Errors
    /// * `InvalidInput` - malformed user id or undecodable cursor
    /// * `StoreUnavailable` - the query did not run
    pub async fn due_reviews(
        &self,
        user_id: &str,
        content_type: Option<ContentType>,
        limit: usize,
        cursor: Option<&str>,
    ) -> RepriseResult<Page<ProgrammedReview>> {
        validate_identifier("user_id", user_id)?;

        let limit = self.clamp_limit(limit);
        let cursor = cursor.map(DueCursor::decode).transpose()?;
        let (items, next) = self
            .store
            .query_due(user_id, content_type, Utc::now(), cursor, limit)
            .await?;
        let next_cursor = next.map(|c| c.encode()).transpose()?;

        tracing::debug!(
            "due query for {}: {} item(s), more={}",
            user_id,
            items.len(),
            next_cursor.is_some()
        );

        Ok(Page { items, next_cursor })
    }

    /// Scheduling summary for one user, optionally one content family.
    ///
    /// Counts are computed by the store in one pass; the engine only
    /// supplies the clock and the leech threshold.
    pub async fn review_summary(
        &self,
        user_id: &str,
        content_type: Option<ContentType>,
    ) -> RepriseResult<ReviewSummary> {
        validate_identifier("user_id", user_id)?;

        let tally = self
            .store
            .count_by_status(
                user_id,
                content_type,
                Utc::now(),
                self.config.scheduler.leech_lapse_threshold,
            )
            .await?;

        Ok(ReviewSummary {
            user_id: user_id.to_string(),
            content_type,
            learning: tally.learning,
            reviewing: tally.reviewing,
            suspended: tally.suspended,
            due: tally.due,
            leeches: tally.leeches,
            total: tally.total(),
        })
    }

    fn clamp_limit(&self, limit: usize) -> usize {
        let query = &self.config.query;
        if limit == 0 {
            query.default_page_size
        } else {
            limit.min(query.max_page_size)
        }
    }
}
