//! Spaced-repetition interval scheduling.

mod sm2;

pub use sm2::{SchedulerState, Sm2Scheduler};
