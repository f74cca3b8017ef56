//! Core data types for review scheduling.

pub mod grade;
pub mod page;
pub mod review;

pub use grade::QualityGrade;
pub use page::{DueCursor, Page, ReviewSummary, StatusTally};
pub use review::{ContentType, ProgrammedReview, ReviewKey, ReviewStatus};
