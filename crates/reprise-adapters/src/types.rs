//! Types shared across the content-family adapters.

use serde::{Deserialize, Serialize};

use reprise_core::types::{ProgrammedReview, QualityGrade};

/// Four-button self-assessment shown on flashcards and notebook entries.
///
/// Self-rated recall is deliberately coarser than the engine's 0-5 scale;
/// each button maps onto the grade it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelfRating {
    /// Recall failed; the card restarts its learning cycle.
    Again,
    /// Recalled with real difficulty.
    Hard,
    /// Recalled correctly.
    Good,
    /// Recalled instantly.
    Easy,
}

impl SelfRating {
    /// The quality grade submitted to the engine for this button.
    pub fn quality(self) -> QualityGrade {
        match self {
            SelfRating::Again => QualityGrade::Incorrect,
            SelfRating::Hard => QualityGrade::Difficult,
            SelfRating::Good => QualityGrade::Hesitant,
            SelfRating::Easy => QualityGrade::Perfect,
        }
    }
}

/// What a learner-facing surface needs after one graded review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// The updated review record.
    pub review: ProgrammedReview,
    /// Days until the next presentation.
    pub due_in_days: u32,
    /// Consecutive successful repetitions.
    pub streak: u32,
    /// Whether the record sits at or past the leech threshold.
    pub leech: bool,
}

impl ReviewOutcome {
    /// Build the display outcome for an updated record.
    pub fn new(review: ProgrammedReview, leech_threshold: u32) -> Self {
        Self {
            due_in_days: review.interval_days,
            streak: review.repetitions,
            leech: review.is_leech(leech_threshold),
            review,
        }
    }
}
