//! Exam grading integration.
//!
//! A submitted exam is graded as a batch: every answer becomes one review,
//! recorded in parallel since each question is an independent key. Wrong
//! answers come back in the report so the error notebook can pick them up.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reprise_core::engine::ReviewEngine;
use reprise_core::error::RepriseResult;
use reprise_core::types::{ContentType, Page, ProgrammedReview, QualityGrade};

use crate::types::ReviewOutcome;

/// One graded answer from a submitted exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnswer {
    pub question_id: String,
    pub correct: bool,
}

/// Grading result for a whole exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamReport {
    pub exam_id: String,
    pub user_id: String,
    pub graded_at: DateTime<Utc>,
    /// Questions on the exam.
    pub total: u32,
    pub correct: u32,
    /// Percentage score, 0-100. An empty exam scores 0.
    pub score: f32,
    /// Scheduling outcome per answer, in submission order.
    pub outcomes: Vec<ReviewOutcome>,
    /// Questions answered wrong, in submission order.
    pub missed: Vec<String>,
}

/// Adapter between exam grading and the review engine.
pub struct ExamAdapter {
    engine: Arc<ReviewEngine>,
}

impl ExamAdapter {
    /// Create an adapter over a shared engine.
    pub fn new(engine: Arc<ReviewEngine>) -> Self {
        Self { engine }
    }

    /// Record reviews for every answer on a submitted exam.
    ///
    /// Answers are written concurrently; an error on one question does not
    /// roll back the others, so a retried submission converges on the same
    /// stored state.
    pub async fn grade_exam(
        &self,
        user_id: &str,
        exam_id: &str,
        answers: &[ExamAnswer],
    ) -> RepriseResult<ExamReport> {
        let writes: Vec<_> = answers
            .iter()
            .map(|answer| {
                let engine = self.engine.clone();
                let user_id = user_id.to_string();
                let question_id = answer.question_id.clone();
                let grade = QualityGrade::from_binary(answer.correct);
                async move {
                    engine
                        .record_review(&user_id, &question_id, ContentType::ExamQuestion, grade)
                        .await
                }
            })
            .collect();

        let results = futures::future::join_all(writes).await;

        let leech_threshold = self.engine.config().scheduler.leech_lapse_threshold;
        let mut outcomes = Vec::with_capacity(answers.len());
        let mut missed = Vec::new();
        let mut correct = 0u32;

        for (answer, result) in answers.iter().zip(results) {
            outcomes.push(ReviewOutcome::new(result?, leech_threshold));
            if answer.correct {
                correct += 1;
            } else {
                missed.push(answer.question_id.clone());
            }
        }

        let total = answers.len() as u32;
        let score = if total == 0 {
            0.0
        } else {
            correct as f32 * 100.0 / total as f32
        };

        tracing::debug!(
            "graded exam {} for {}: {}/{} correct",
            exam_id,
            user_id,
            correct,
            total
        );

        Ok(ExamReport {
            exam_id: exam_id.to_string(),
            user_id: user_id.to_string(),
            graded_at: Utc::now(),
            total,
            correct,
            score,
            outcomes,
            missed,
        })
    }

    /// Exam questions due for another look, oldest first.
    pub async fn due_exam_questions(
        &self,
        user_id: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> RepriseResult<Page<ProgrammedReview>> {
        self.engine
            .due_reviews(user_id, Some(ContentType::ExamQuestion), limit, cursor)
            .await
    }
}
