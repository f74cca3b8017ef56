//! reprise-adapters - Content-family adapters for the reprise review engine.
//!
//! Each adapter translates one content family's vocabulary (flashcard rating
//! buttons, graded practice answers, exam submissions, error-notebook drills)
//! into engine grades and operations, sharing one [`ReviewEngine`] across
//! families.

mod error_notebook;
mod exam;
mod flashcards;
mod question_bank;
mod types;

// Public exports
pub use error_notebook::{ErrorNotebookAdapter, NotebookEntry};
pub use exam::{ExamAdapter, ExamAnswer, ExamReport};
pub use flashcards::{DeckProgress, FlashcardAdapter};
pub use question_bank::{QuestionBankAdapter, StudySession};
pub use types::{ReviewOutcome, SelfRating};

// Re-export core types for convenience
pub use reprise_core::engine::ReviewEngine;
pub use reprise_core::error::{RepriseError, RepriseResult};
pub use reprise_core::types::{ContentType, Page, ProgrammedReview, QualityGrade};
