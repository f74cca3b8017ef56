//! In-memory review store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use reprise_core::error::RepriseResult;
use reprise_core::traits::{ReviewStore, TransactFn};
use reprise_core::types::{
    ContentType, DueCursor, ProgrammedReview, ReviewKey, ReviewStatus, StatusTally,
};

/// In-memory review store.
///
/// Backs tests and single-process deployments; records do not survive a
/// restart. The write lock spans the whole `transact` call, so mutations on
/// the same key always observe the previous committed record.
#[derive(Default)]
pub struct MemoryReviewStore {
    records: RwLock<HashMap<ReviewKey, ProgrammedReview>>,
}

impl MemoryReviewStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, across all users.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn get(&self, key: &ReviewKey) -> RepriseResult<Option<ProgrammedReview>> {
        let records = self.records.read().await;
        Ok(records.get(key).cloned())
    }

    async fn transact(&self, key: &ReviewKey, f: TransactFn) -> RepriseResult<ProgrammedReview> {
        let mut records = self.records.write().await;
        let current = records.get(key).cloned();
        let updated = f(current)?;
        records.insert(key.clone(), updated.clone());
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
        let records = self.records.read().await;

        let mut due: Vec<ProgrammedReview> = records
            .values()
            .filter(|r| r.user_id == user_id)
            .filter(|r| content_type.map_or(true, |kind| r.content_type == kind))
            .filter(|r| r.is_due(now))
            .filter(|r| match &cursor {
                Some(c) => c.precedes(r.next_review_at, r.content_type, &r.content_id),
                None => true,
            })
            .cloned()
            .collect();

        // Same sort key the cursor encodes: time, then content type text,
        // then content id
        due.sort_by(|a, b| {
            a.next_review_at
                .cmp(&b.next_review_at)
                .then_with(|| a.content_type.to_string().cmp(&b.content_type.to_string()))
                .then_with(|| a.content_id.cmp(&b.content_id))
        });

        let next = if due.len() > limit {
            due.truncate(limit);
            due.last()
                .map(|r| DueCursor::after(r.next_review_at, r.content_type, r.content_id.clone()))
        } else {
            None
        };

        Ok((due, next))
    }

    async fn delete(&self, key: &ReviewKey) -> RepriseResult<()> {
        let mut records = self.records.write().await;
        records.remove(key);
        Ok(())
    }

    async fn count_by_status(
        &self,
        user_id: &str,
        content_type: Option<ContentType>,
        now: DateTime<Utc>,
        leech_threshold: u32,
    ) -> RepriseResult<StatusTally> {
        let records = self.records.read().await;

        let mut tally = StatusTally::default();
        for record in records.values() {
            if record.user_id != user_id {
                continue;
            }
            if let Some(kind) = content_type {
                if record.content_type != kind {
                    continue;
                }
            }

            match record.status {
                ReviewStatus::Learning => tally.learning += 1,
                ReviewStatus::Reviewing => tally.reviewing += 1,
                ReviewStatus::Suspended => tally.suspended += 1,
            }
            if record.is_due(now) {
                tally.due += 1;
            }
            if record.is_leech(leech_threshold) {
                tally.leeches += 1;
            }
        }

        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use reprise_core::error::RepriseError;

    fn overdue_review(user_id: &str, content_id: &str) -> ProgrammedReview {
        let now = Utc::now();
        ProgrammedReview {
            user_id: user_id.to_string(),
            content_id: content_id.to_string(),
            content_type: ContentType::Flashcard,
            status: ReviewStatus::Learning,
            ease_factor: 2.5,
            interval_days: 1,
            repetitions: 1,
            lapses: 0,
            last_reviewed_at: now - Duration::days(2),
            next_review_at: now - Duration::days(1),
            original_answer_correct: true,
        }
    }

    #[tokio::test]
    async fn test_transact_inserts_and_get_reads_back() {
        let store = MemoryReviewStore::new();
        let review = overdue_review("u1", "c1");
        let key = review.key();

        let written = store
            .transact(&key, Box::new(move |_| Ok(review)))
            .await
            .unwrap();
        assert_eq!(written.content_id, "c1");

        let read = store.get(&key).await.unwrap().unwrap();
        assert_eq!(read, written);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_transact_error_writes_nothing() {
        let store = MemoryReviewStore::new();
        let key = ReviewKey::new("u1", "c1", ContentType::Flashcard);

        let result = store
            .transact(
                &key,
                Box::new(|_| Err(RepriseError::invalid_input("rejected"))),
            )
            .await;

        assert!(result.is_err());
        assert!(store.get(&key).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryReviewStore::new();
        let review = overdue_review("u1", "c1");
        let key = review.key();

        store
            .transact(&key, Box::new(move |_| Ok(review)))
            .await
            .unwrap();
        store.delete(&key).await.unwrap();
        assert!(store.get(&key).await.unwrap().is_none());

        // A second delete of the same key is not an error
        store.delete(&key).await.unwrap();
    }
}
