//! reprise-core - Core library for reprise.
//!
//! This crate provides the review record types, the SM-2 scheduler, the
//! review store contract, and the `ReviewEngine` that orchestrates them for
//! the spaced-repetition layer of a learning platform.
//!
//! # Example
//!
//! ```ignore
//! use reprise_core::{ContentType, EngineConfig, QualityGrade, ReviewEngine};
//!
//! let engine = ReviewEngine::new(EngineConfig::default(), store);
//!
//! // Record a graded recall attempt
//! let review = engine
//!     .record_review("user-1", "card-42", ContentType::Flashcard, QualityGrade::Perfect)
//!     .await?;
//!
//! // List what the learner should clear next
//! let due = engine.due_reviews("user-1", None, 20, None).await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, QueryConfig, SchedulerConfig, StoreConfig, StoreProvider};
pub use engine::ReviewEngine;
pub use error::{ErrorCode, RepriseError, RepriseResult};
pub use scheduler::{SchedulerState, Sm2Scheduler};
pub use traits::{ReviewStore, TransactFn};
pub use types::{
    ContentType, DueCursor, Page, ProgrammedReview, QualityGrade, ReviewKey, ReviewStatus,
    ReviewSummary, StatusTally,
};
