//! Question-bank practice sessions.
//!
//! Practice answers are graded right/wrong by the platform, so they map onto
//! the engine's binary grades rather than self-assessment. The session struct
//! only tallies; scheduling state lives entirely in the engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reprise_core::engine::ReviewEngine;
use reprise_core::error::RepriseResult;
use reprise_core::types::{ContentType, Page, ProgrammedReview, QualityGrade};

use crate::types::ReviewOutcome;

/// Running tally for one practice sitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub session_id: String,
    pub user_id: String,
    pub correct: u32,
    pub incorrect: u32,
    pub started_at: DateTime<Utc>,
}

impl StudySession {
    /// Start an empty session for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            correct: 0,
            incorrect: 0,
            started_at: Utc::now(),
        }
    }

    /// Questions answered so far.
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Fraction of answers that were correct, 0.0 before any answer.
    pub fn accuracy(&self) -> f32 {
        let answered = self.answered();
        if answered == 0 {
            return 0.0;
        }
        self.correct as f32 / answered as f32
    }
}

/// Adapter between question-bank practice and the review engine.
pub struct QuestionBankAdapter {
    engine: Arc<ReviewEngine>,
}

impl QuestionBankAdapter {
    /// Create an adapter over a shared engine.
    pub fn new(engine: Arc<ReviewEngine>) -> Self {
        Self { engine }
    }

    /// Open a new practice session.
    pub fn start_session(&self, user_id: &str) -> StudySession {
        StudySession::new(user_id)
    }

    /// Record one graded answer and update the session tally.
    ///
    /// The tally moves only after the engine accepts the review, so a failed
    /// write leaves the session consistent with stored state.
    pub async fn submit_answer(
        &self,
        session: &mut StudySession,
        question_id: &str,
        correct: bool,
    ) -> RepriseResult<ReviewOutcome> {
        let review = self
            .engine
            .record_review(
                &session.user_id,
                question_id,
                ContentType::Question,
                QualityGrade::from_binary(correct),
            )
            .await?;

        if correct {
            session.correct += 1;
        } else {
            session.incorrect += 1;
        }

        Ok(ReviewOutcome::new(
            review,
            self.engine.config().scheduler.leech_lapse_threshold,
        ))
    }

    /// Questions due for another pass, oldest first.
    pub async fn due_questions(
        &self,
        user_id: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> RepriseResult<Page<ProgrammedReview>> {
        self.engine
            .due_reviews(user_id, Some(ContentType::Question), limit, cursor)
            .await
    }

    /// Drop the review record for a question retired from the bank.
    pub async fn question_removed(&self, user_id: &str, question_id: &str) -> RepriseResult<()> {
        self.engine
            .delete_review(user_id, question_id, ContentType::Question)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reprise_core::config::EngineConfig;
    use reprise_stores::MemoryReviewStore;

    fn adapter() -> QuestionBankAdapter {
        let engine = ReviewEngine::new(EngineConfig::default(), Arc::new(MemoryReviewStore::new()));
        QuestionBankAdapter::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn test_session_tallies_answers() {
        let adapter = adapter();
        let mut session = adapter.start_session("u1");

        adapter
            .submit_answer(&mut session, "q-1", true)
            .await
            .unwrap();
        adapter
            .submit_answer(&mut session, "q-2", false)
            .await
            .unwrap();
        adapter
            .submit_answer(&mut session, "q-3", true)
            .await
            .unwrap();

        assert_eq!(session.answered(), 3);
        assert_eq!(session.correct, 2);
        assert!((session.accuracy() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_empty_session_accuracy_is_zero() {
        let adapter = adapter();
        let session = adapter.start_session("u1");
        assert_eq!(session.accuracy(), 0.0);
    }

    #[tokio::test]
    async fn test_wrong_answer_resets_streak() {
        let adapter = adapter();
        let mut session = adapter.start_session("u1");

        adapter
            .submit_answer(&mut session, "q-1", true)
            .await
            .unwrap();
        let outcome = adapter
            .submit_answer(&mut session, "q-1", false)
            .await
            .unwrap();

        assert_eq!(outcome.streak, 0);
        assert_eq!(outcome.due_in_days, 1);
        assert_eq!(outcome.review.lapses, 1);
    }

    #[tokio::test]
    async fn test_sessions_share_scheduling_state() {
        let adapter = adapter();

        let mut morning = adapter.start_session("u1");
        adapter
            .submit_answer(&mut morning, "q-1", true)
            .await
            .unwrap();

        let mut evening = adapter.start_session("u1");
        let outcome = adapter
            .submit_answer(&mut evening, "q-1", true)
            .await
            .unwrap();

        assert_eq!(outcome.streak, 2, "streak carries across sessions");
        assert_eq!(evening.answered(), 1, "tally does not");
    }
}
