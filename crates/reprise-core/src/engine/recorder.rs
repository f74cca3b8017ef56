//! Review recording and record lifecycle operations.

use chrono::{Duration, Utc};

use crate::error::{RepriseError, RepriseResult};
use crate::scheduler::SchedulerState;
use crate::types::{ContentType, ProgrammedReview, QualityGrade, ReviewKey, ReviewStatus};

use super::{validate_identifier, ReviewEngine};

impl ReviewEngine {
    /// Record one graded review for a (user, content) pair.
    ///
    /// Loads the existing record for the key, or seeds a fresh one with ease
    /// 2.5 and an unscheduled interval, then applies the scheduler and
    /// persists the result in a single atomic read-modify-write. Exactly one
    /// durable write happens per call.
    ///
    /// # Errors
    /// * `InvalidInput` - malformed identifiers
    /// * `InvalidState` - the record is suspended; reactivate it first
    /// * `StoreUnavailable` - the write did not commit; safe to retry
    pub async fn record_review(
        &self,
        user_id: &str,
        content_id: &str,
        content_type: ContentType,
        quality: QualityGrade,
    ) -> RepriseResult<ProgrammedReview> {
        validate_identifier("user_id", user_id)?;
        validate_identifier("content_id", content_id)?;

        let key = ReviewKey::new(user_id, content_id, content_type);
        let now = Utc::now();
        let scheduler = self.scheduler.clone();
        let closure_key = key.clone();

        let updated = self
            .store
            .transact(
                &key,
                Box::new(move |current| {
                    let (prior, original_answer_correct, lapses) = match current {
                        Some(existing) => {
                            if existing.status == ReviewStatus::Suspended {
                                return Err(RepriseError::invalid_state(format!(
                                    "review '{}' is suspended and cannot be graded",
                                    closure_key
                                )));
                            }
                            (
                                SchedulerState::from(&existing),
                                existing.original_answer_correct,
                                existing.lapses,
                            )
                        }
                        None => (scheduler.seed_state(), quality.is_success(), 0),
                    };

                    let next = scheduler.next(quality, &prior);
                    let lapses = if quality.is_failure() { lapses + 1 } else { lapses };

                    Ok(ProgrammedReview {
                        user_id: closure_key.user_id.clone(),
                        content_id: closure_key.content_id.clone(),
                        content_type: closure_key.content_type,
                        status: ReviewStatus::for_repetitions(next.repetitions),
                        ease_factor: next.ease_factor,
                        interval_days: next.interval_days,
                        repetitions: next.repetitions,
                        lapses,
                        last_reviewed_at: now,
                        next_review_at: now + Duration::days(next.interval_days as i64),
                        original_answer_correct,
                    })
                }),
            )
            .await?;

        tracing::debug!(
            "recorded review {}: quality={}, interval={}d, status={}",
            key,
            quality.value(),
            updated.interval_days,
            updated.status
        );

        let leech_threshold = self.config.scheduler.leech_lapse_threshold;
        if quality.is_failure() && updated.lapses == leech_threshold {
            tracing::warn!(
                "review {} crossed the leech threshold after {} lapses",
                key,
                updated.lapses
            );
        }

        Ok(updated)
    }

    /// Take a record out of scheduling (mastered or archived by an adapter).
    ///
    /// Scheduling fields are left frozen so reactivation resumes where the
    /// learner stopped. Suspending an already-suspended record is a no-op.
    ///
    /// # Errors
    /// * `NotFound` - the key has never been reviewed
    pub async fn suspend(
        &self,
        user_id: &str,
        content_id: &str,
        content_type: ContentType,
    ) -> RepriseResult<()> {
        validate_identifier("user_id", user_id)?;
        validate_identifier("content_id", content_id)?;

        let key = ReviewKey::new(user_id, content_id, content_type);
        let closure_key = key.clone();
        self.store
            .transact(
                &key,
                Box::new(move |current| match current {
                    Some(mut existing) => {
                        existing.status = ReviewStatus::Suspended;
                        Ok(existing)
                    }
                    None => Err(RepriseError::not_found(closure_key.to_string())),
                }),
            )
            .await?;

        tracing::debug!("suspended review {}", key);
        Ok(())
    }

    /// Put a suspended record back into scheduling.
    ///
    /// The restored status derives from the frozen repetition count, so a
    /// record suspended mid-review cycle resumes as REVIEWING rather than
    /// restarting. Reactivating a record that is not suspended is a no-op.
    ///
    /// # Errors
    /// * `NotFound` - the key has never been reviewed
    pub async fn reactivate(
        &self,
        user_id: &str,
        content_id: &str,
        content_type: ContentType,
    ) -> RepriseResult<()> {
        validate_identifier("user_id", user_id)?;
        validate_identifier("content_id", content_id)?;

        let key = ReviewKey::new(user_id, content_id, content_type);
        let closure_key = key.clone();
        self.store
            .transact(
                &key,
                Box::new(move |current| match current {
                    Some(mut existing) => {
                        if existing.status == ReviewStatus::Suspended {
                            existing.status = ReviewStatus::for_repetitions(existing.repetitions);
                        }
                        Ok(existing)
                    }
                    None => Err(RepriseError::not_found(closure_key.to_string())),
                }),
            )
            .await?;

        tracing::debug!("reactivated review {}", key);
        Ok(())
    }

    /// Fetch the record for a key, if one exists.
    pub async fn get_review(
        &self,
        user_id: &str,
        content_id: &str,
        content_type: ContentType,
    ) -> RepriseResult<Option<ProgrammedReview>> {
        validate_identifier("user_id", user_id)?;
        validate_identifier("content_id", content_id)?;

        let key = ReviewKey::new(user_id, content_id, content_type);
        self.store.get(&key).await
    }

    /// Delete the record for a key.
    ///
    /// Called by adapters when the parent content is deleted; removing a key
    /// that was never reviewed is a no-op.
    pub async fn delete_review(
        &self,
        user_id: &str,
        content_id: &str,
        content_type: ContentType,
    ) -> RepriseResult<()> {
        validate_identifier("user_id", user_id)?;
        validate_identifier("content_id", content_id)?;

        let key = ReviewKey::new(user_id, content_id, content_type);
        self.store.delete(&key).await?;

        tracing::debug!("deleted review {}", key);
        Ok(())
    }

    /// The interval each grade 0-5 would produce for this key, without
    /// recording anything.
    ///
    /// Keys with no record preview from the fresh seed state. Suspended
    /// records preview as if already reactivated.
    pub async fn preview_intervals(
        &self,
        user_id: &str,
        content_id: &str,
        content_type: ContentType,
    ) -> RepriseResult<[u32; 6]> {
        validate_identifier("user_id", user_id)?;
        validate_identifier("content_id", content_id)?;

        let key = ReviewKey::new(user_id, content_id, content_type);
        let prior = match self.store.get(&key).await? {
            Some(existing) => SchedulerState::from(&existing),
            None => self.scheduler.seed_state(),
        };
        Ok(self.scheduler.preview_intervals(&prior))
    }
}
