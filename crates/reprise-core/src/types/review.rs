//! Review record types.
//!
//! `ProgrammedReview` is the central entity: one record per
//! (user, content, content family) key, created on the first graded attempt
//! and mutated only by the review engine. Field names serialize camelCase and
//! enum variants SCREAMING_SNAKE_CASE to match the platform's JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// Content family a review record belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    /// Question-bank question.
    Question,
    /// Flashcard.
    Flashcard,
    /// Simulated-exam question.
    ExamQuestion,
}

/// Scheduling status of a review record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    /// Durable recall not yet demonstrated (fewer than two consecutive successes).
    Learning,
    /// In the long-interval review cycle.
    Reviewing,
    /// Taken out of scheduling by an explicit adapter action (mastered/archived).
    Suspended,
}

impl ReviewStatus {
    /// Consecutive successful repetitions that demonstrate durable recall.
    pub const DURABLE_RECALL_REPETITIONS: u32 = 2;

    /// Status implied by a repetition count, for active (non-suspended) records.
    pub fn for_repetitions(repetitions: u32) -> Self {
        if repetitions >= Self::DURABLE_RECALL_REPETITIONS {
            ReviewStatus::Reviewing
        } else {
            ReviewStatus::Learning
        }
    }
}

/// Unique key of a review record: (user, content, content family).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewKey {
    pub user_id: String,
    pub content_id: String,
    pub content_type: ContentType,
}

impl ReviewKey {
    /// Create a new review key.
    pub fn new(
        user_id: impl Into<String>,
        content_id: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            content_id: content_id.into(),
            content_type,
        }
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.user_id, self.content_type, self.content_id
        )
    }
}

/// One user's scheduling state for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammedReview {
    pub user_id: String,
    pub content_id: String,
    pub content_type: ContentType,
    pub status: ReviewStatus,
    /// Interval multiplier; never below 1.3, starts at 2.5.
    pub ease_factor: f32,
    /// Days until the next presentation; 0 only before the first attempt.
    pub interval_days: u32,
    /// Consecutive successful (quality >= 3) reviews.
    pub repetitions: u32,
    /// Failed (quality < 3) reviews across the record's lifetime.
    pub lapses: u32,
    pub last_reviewed_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
    /// Whether the very first graded attempt was correct. Set once, never mutated.
    pub original_answer_correct: bool,
}

impl ProgrammedReview {
    /// The record's unique key.
    pub fn key(&self) -> ReviewKey {
        ReviewKey::new(
            self.user_id.clone(),
            self.content_id.clone(),
            self.content_type,
        )
    }

    /// Whether the record is due at `now`.
    ///
    /// Suspended records are never due regardless of their timestamps.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status != ReviewStatus::Suspended && self.next_review_at <= now
    }

    /// Whether the record qualifies as a leech under the given lapse threshold.
    ///
    /// Derived classification, never persisted; callers get it for UI
    /// treatment (flag for rewriting, special handling).
    pub fn is_leech(&self, lapse_threshold: u32) -> bool {
        self.lapses >= lapse_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_review(status: ReviewStatus, due_offset_days: i64) -> ProgrammedReview {
        let now = Utc::now();
        ProgrammedReview {
            user_id: "u1".to_string(),
            content_id: "c1".to_string(),
            content_type: ContentType::Flashcard,
            status,
            ease_factor: 2.5,
            interval_days: 1,
            repetitions: 1,
            lapses: 0,
            last_reviewed_at: now - Duration::days(1),
            next_review_at: now + Duration::days(due_offset_days),
            original_answer_correct: true,
        }
    }

    #[test]
    fn test_status_for_repetitions_threshold() {
        assert_eq!(ReviewStatus::for_repetitions(0), ReviewStatus::Learning);
        assert_eq!(ReviewStatus::for_repetitions(1), ReviewStatus::Learning);
        assert_eq!(ReviewStatus::for_repetitions(2), ReviewStatus::Reviewing);
        assert_eq!(ReviewStatus::for_repetitions(10), ReviewStatus::Reviewing);
    }

    #[test]
    fn test_is_due_respects_timestamp_and_status() {
        let now = Utc::now();
        assert!(sample_review(ReviewStatus::Learning, -1).is_due(now));
        assert!(!sample_review(ReviewStatus::Learning, 1).is_due(now));
        // Suspended records are never due, even when overdue by the clock
        assert!(!sample_review(ReviewStatus::Suspended, -10).is_due(now));
    }

    #[test]
    fn test_leech_threshold() {
        let mut review = sample_review(ReviewStatus::Learning, 0);
        review.lapses = 3;
        assert!(!review.is_leech(4));
        review.lapses = 4;
        assert!(review.is_leech(4));
    }

    #[test]
    fn test_key_display_format() {
        let key = ReviewKey::new("user-9", "card-3", ContentType::ExamQuestion);
        assert_eq!(key.to_string(), "user-9:EXAM_QUESTION:card-3");
    }

    #[test]
    fn test_enum_text_round_trip() {
        // DB columns store the same text the JSON API exposes
        assert_eq!(ContentType::ExamQuestion.to_string(), "EXAM_QUESTION");
        assert_eq!(
            "EXAM_QUESTION".parse::<ContentType>().unwrap(),
            ContentType::ExamQuestion
        );
        assert_eq!(ReviewStatus::Learning.to_string(), "LEARNING");
        assert_eq!(
            "SUSPENDED".parse::<ReviewStatus>().unwrap(),
            ReviewStatus::Suspended
        );
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let review = sample_review(ReviewStatus::Learning, 0);
        let json = serde_json::to_value(&review).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("easeFactor").is_some());
        assert!(json.get("nextReviewAt").is_some());
        assert_eq!(json["contentType"], "FLASHCARD");
        assert_eq!(json["status"], "LEARNING");
    }
}
