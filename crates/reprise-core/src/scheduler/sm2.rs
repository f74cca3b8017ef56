//! SM-2 interval calculator.
//!
//! Pure arithmetic over (grade, prior state); no clocks, no I/O. The engine
//! owns timestamps and persistence, so everything here is deterministic and
//! unit-testable in isolation.

use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::types::{ProgrammedReview, QualityGrade};

/// The scheduling triple the calculator reads and produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    /// Interval multiplier, floored at the configured minimum (1.3).
    pub ease_factor: f32,
    /// Days until the next presentation.
    pub interval_days: u32,
    /// Consecutive successful reviews.
    pub repetitions: u32,
}

impl From<&ProgrammedReview> for SchedulerState {
    fn from(review: &ProgrammedReview) -> Self {
        Self {
            ease_factor: review.ease_factor,
            interval_days: review.interval_days,
            repetitions: review.repetitions,
        }
    }
}

/// SM-2 scheduler.
///
/// Implements the classic recurrence: every review nudges the ease factor by
/// a quadratic penalty in (5 - quality); successes walk the interval up the
/// 1-day, 6-day, then ease-multiplied ladder; failures reset the ladder.
#[derive(Clone)]
pub struct Sm2Scheduler {
    config: SchedulerConfig,
}

impl Sm2Scheduler {
    /// Create a scheduler with the standard SM-2 parameters.
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create a scheduler with custom parameters.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The scheduler's parameters.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// State seeded for a key with no prior record, before its first review.
    ///
    /// Interval 0 means "never scheduled"; the first review moves it to at
    /// least 1 day, so a correct first answer leaves the unscheduled state
    /// immediately rather than needing a second grading cycle.
    pub fn seed_state(&self) -> SchedulerState {
        SchedulerState {
            ease_factor: self.config.initial_ease,
            interval_days: 0,
            repetitions: 0,
        }
    }

    /// Apply one graded review to a prior state.
    ///
    /// The ease update applies on success and failure alike:
    /// `ease' = ease + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at
    /// the configured minimum, with no ceiling. Note that quality 3 still
    /// lowers ease (-0.14) and quality 4 leaves it unchanged; only a 5 raises
    /// it. On success the new interval uses the *updated* ease.
    ///
    /// # Arguments
    /// * `grade` - Recall quality for this review
    /// * `prior` - State before this review
    ///
    /// # Returns
    /// The post-review state; `interval_days` is always >= 1.
    pub fn next(&self, grade: QualityGrade, prior: &SchedulerState) -> SchedulerState {
        let miss = (5 - grade.value()) as f32;
        let ease_factor =
            (prior.ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(self.config.minimum_ease);

        let (repetitions, interval_days) = if grade.is_success() {
            let repetitions = prior.repetitions + 1;
            let interval_days = match repetitions {
                1 => self.config.first_interval_days,
                2 => self.config.second_interval_days,
                _ => (prior.interval_days as f32 * ease_factor).round() as u32,
            };
            (repetitions, interval_days)
        } else {
            // Failed recall: the ladder restarts from a 1-day interval
            (0, 1)
        };

        SchedulerState {
            ease_factor,
            interval_days: interval_days.max(1),
            repetitions,
        }
    }

    /// The interval each grade 0-5 would produce from the given state.
    ///
    /// Nothing is recorded; UI layers use this to label grading buttons
    /// ("Good - 6 d") before the learner answers.
    pub fn preview_intervals(&self, prior: &SchedulerState) -> [u32; 6] {
        QualityGrade::ALL.map(|grade| self.next(grade, prior).interval_days)
    }
}

impl Default for Sm2Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn state(ease_factor: f32, interval_days: u32, repetitions: u32) -> SchedulerState {
        SchedulerState {
            ease_factor,
            interval_days,
            repetitions,
        }
    }

    #[test]
    fn test_deterministic_for_fixed_inputs() {
        let scheduler = Sm2Scheduler::new();
        let prior = state(2.2, 14, 4);

        let a = scheduler.next(QualityGrade::Hesitant, &prior);
        let b = scheduler.next(QualityGrade::Hesitant, &prior);
        assert_eq!(a, b, "same inputs must produce the same state");
    }

    #[test]
    fn test_first_success_schedules_immediately() {
        let scheduler = Sm2Scheduler::new();
        let seed = scheduler.seed_state();
        assert_eq!(seed.interval_days, 0, "seed is unscheduled");

        let next = scheduler.next(QualityGrade::Perfect, &seed);
        assert_eq!(next.repetitions, 1);
        assert_eq!(next.interval_days, 1, "first success schedules for tomorrow");
        assert!(
            (next.ease_factor - 2.6).abs() < EPS,
            "quality 5 raises ease by 0.1, got {}",
            next.ease_factor
        );
    }

    #[test]
    fn test_first_failure_schedules_relearn() {
        let scheduler = Sm2Scheduler::new();
        let next = scheduler.next(QualityGrade::Blackout, &scheduler.seed_state());

        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1, "failures still schedule a 1-day retry");
    }

    #[test]
    fn test_perfect_ladder_one_six_seventeen() {
        let scheduler = Sm2Scheduler::new();
        let mut state = scheduler.seed_state();
        let mut intervals = Vec::new();

        for _ in 0..3 {
            state = scheduler.next(QualityGrade::Perfect, &state);
            intervals.push(state.interval_days);
        }

        // Ease walks 2.5 -> 2.6 -> 2.7 -> 2.8; third interval is round(6 * 2.8)
        assert_eq!(intervals, vec![1, 6, 17]);
        assert!((state.ease_factor - 2.8).abs() < EPS, "ease after three 5s: {}", state.ease_factor);
    }

    #[test]
    fn test_quality_three_lowers_ease_but_succeeds() {
        let scheduler = Sm2Scheduler::new();
        let next = scheduler.next(QualityGrade::Difficult, &state(2.5, 6, 2));

        assert_eq!(next.repetitions, 3, "quality 3 is still a success");
        assert!(
            (next.ease_factor - 2.36).abs() < EPS,
            "quality 3 costs 0.14 ease, got {}",
            next.ease_factor
        );
        assert_eq!(next.interval_days, 14, "round(6 * 2.36)");
    }

    #[test]
    fn test_quality_four_leaves_ease_unchanged() {
        let scheduler = Sm2Scheduler::new();
        let next = scheduler.next(QualityGrade::Hesitant, &state(2.5, 6, 2));

        assert!((next.ease_factor - 2.5).abs() < EPS);
        assert_eq!(next.interval_days, 15);
    }

    #[test]
    fn test_any_failure_resets_repetitions_and_interval() {
        let scheduler = Sm2Scheduler::new();
        let prior = state(2.7, 42, 7);

        for grade in [
            QualityGrade::Blackout,
            QualityGrade::Incorrect,
            QualityGrade::NearMiss,
        ] {
            let next = scheduler.next(grade, &prior);
            assert_eq!(next.repetitions, 0, "{:?} must reset repetitions", grade);
            assert_eq!(next.interval_days, 1, "{:?} must reset the interval", grade);
        }
    }

    #[test]
    fn test_ease_floor_holds_under_repeated_blackouts() {
        let scheduler = Sm2Scheduler::new();
        let mut state = scheduler.seed_state();

        for _ in 0..20 {
            state = scheduler.next(QualityGrade::Blackout, &state);
            assert!(
                state.ease_factor >= 1.3,
                "ease must never drop below 1.3, got {}",
                state.ease_factor
            );
        }
        assert!((state.ease_factor - 1.3).abs() < EPS, "ease settles on the floor");
    }

    #[test]
    fn test_ease_has_no_ceiling() {
        let scheduler = Sm2Scheduler::new();
        let mut state = scheduler.seed_state();

        for _ in 0..50 {
            state = scheduler.next(QualityGrade::Perfect, &state);
        }
        assert!(
            state.ease_factor > 7.0,
            "fifty perfect reviews keep raising ease, got {}",
            state.ease_factor
        );
    }

    #[test]
    fn test_interval_floor_at_minimum_ease() {
        let scheduler = Sm2Scheduler::new();
        // Ease already on the floor with a 1-day interval: round(1 * 1.3) = 1
        let next = scheduler.next(QualityGrade::Difficult, &state(1.3, 1, 5));

        assert_eq!(next.interval_days, 1);
        assert!((next.ease_factor - 1.3).abs() < EPS);
    }

    #[test]
    fn test_growth_uses_updated_ease() {
        let scheduler = Sm2Scheduler::new();
        // Perfect from ease 2.5: new ease 2.6 applies to this interval,
        // not the prior 2.5 (which would give 25)
        let next = scheduler.next(QualityGrade::Perfect, &state(2.5, 10, 2));
        assert_eq!(next.interval_days, 26);
    }

    #[test]
    fn test_preview_matches_recorded_outcomes() {
        let scheduler = Sm2Scheduler::new();
        let prior = state(2.5, 6, 2);

        let previews = scheduler.preview_intervals(&prior);
        assert_eq!(previews, [1, 1, 1, 14, 15, 16]);

        for grade in QualityGrade::ALL {
            assert_eq!(
                previews[grade.value() as usize],
                scheduler.next(grade, &prior).interval_days,
                "preview must equal the interval recording {:?} would produce",
                grade
            );
        }
    }

    #[test]
    fn test_preview_on_fresh_seed_is_all_ones() {
        let scheduler = Sm2Scheduler::new();
        let previews = scheduler.preview_intervals(&scheduler.seed_state());
        assert_eq!(previews, [1; 6], "every first answer lands one day out");
    }

    #[test]
    fn test_grade_sequence_five_five_two() {
        let scheduler = Sm2Scheduler::new();

        let first = scheduler.next(QualityGrade::Perfect, &scheduler.seed_state());
        assert_eq!((first.repetitions, first.interval_days), (1, 1));
        assert!((first.ease_factor - 2.6).abs() < EPS);

        let second = scheduler.next(QualityGrade::Perfect, &first);
        assert_eq!((second.repetitions, second.interval_days), (2, 6));
        assert!((second.ease_factor - 2.7).abs() < EPS);

        let third = scheduler.next(QualityGrade::NearMiss, &second);
        assert_eq!((third.repetitions, third.interval_days), (0, 1));
        assert!(
            (third.ease_factor - 2.38).abs() < EPS,
            "quality 2 costs 0.32 ease, got {}",
            third.ease_factor
        );
    }

    #[test]
    fn test_custom_config_changes_ladder() {
        let config = SchedulerConfig {
            first_interval_days: 2,
            second_interval_days: 10,
            ..Default::default()
        };
        let scheduler = Sm2Scheduler::with_config(config);

        let first = scheduler.next(QualityGrade::Perfect, &scheduler.seed_state());
        assert_eq!(first.interval_days, 2);
        let second = scheduler.next(QualityGrade::Perfect, &first);
        assert_eq!(second.interval_days, 10);
    }
}
