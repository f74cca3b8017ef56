//! Error-notebook integration.
//!
//! The notebook collects questions a user got wrong on exams so they can be
//! drilled until resolved. Exam grading already records the failed review;
//! importing a report only annotates those misses, it never writes a second
//! review for the same mistake.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reprise_core::engine::ReviewEngine;
use reprise_core::error::RepriseResult;
use reprise_core::types::{ContentType, Page, ProgrammedReview};

use crate::exam::ExamReport;
use crate::types::{ReviewOutcome, SelfRating};

/// One collected mistake, pointing back at its source exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookEntry {
    pub entry_id: String,
    pub user_id: String,
    pub question_id: String,
    pub source_exam_id: String,
    pub created_at: DateTime<Utc>,
}

/// Adapter between the error notebook and the review engine.
pub struct ErrorNotebookAdapter {
    engine: Arc<ReviewEngine>,
}

impl ErrorNotebookAdapter {
    /// Create an adapter over a shared engine.
    pub fn new(engine: Arc<ReviewEngine>) -> Self {
        Self { engine }
    }

    /// Build notebook entries for every miss in a graded exam.
    ///
    /// Grading already scheduled the failed questions, so this touches no
    /// review state.
    pub fn import_from_exam(&self, report: &ExamReport) -> Vec<NotebookEntry> {
        let created_at = Utc::now();
        let entries: Vec<NotebookEntry> = report
            .missed
            .iter()
            .map(|question_id| NotebookEntry {
                entry_id: Uuid::new_v4().to_string(),
                user_id: report.user_id.clone(),
                question_id: question_id.clone(),
                source_exam_id: report.exam_id.clone(),
                created_at,
            })
            .collect();

        tracing::debug!(
            "imported {} notebook entries from exam {} for {}",
            entries.len(),
            report.exam_id,
            report.user_id
        );

        entries
    }

    /// Record a drill pass over one notebook entry.
    pub async fn review_entry(
        &self,
        user_id: &str,
        question_id: &str,
        rating: SelfRating,
    ) -> RepriseResult<ReviewOutcome> {
        let review = self
            .engine
            .record_review(
                user_id,
                question_id,
                ContentType::ExamQuestion,
                rating.quality(),
            )
            .await?;
        Ok(ReviewOutcome::new(
            review,
            self.engine.config().scheduler.leech_lapse_threshold,
        ))
    }

    /// Mark an entry resolved and stop scheduling it.
    pub async fn resolve_entry(&self, user_id: &str, question_id: &str) -> RepriseResult<()> {
        self.engine
            .suspend(user_id, question_id, ContentType::ExamQuestion)
            .await
    }

    /// Put a resolved entry back into rotation.
    pub async fn reopen_entry(&self, user_id: &str, question_id: &str) -> RepriseResult<()> {
        self.engine
            .reactivate(user_id, question_id, ContentType::ExamQuestion)
            .await
    }

    /// Notebook entries due for a drill, oldest first.
    pub async fn due_entries(
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
