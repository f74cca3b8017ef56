//! Recall quality grades.
//!
//! The closed 0-5 scale the scheduler consumes. Grades 0-2 are recall
//! failures of varying severity, 3-5 are successes of varying ease. Mapping
//! domain signals (binary correctness, self-assessment buttons) onto this
//! scale is an adapter concern; the engine only ever sees a `QualityGrade`.

use serde::{Deserialize, Serialize};

use crate::error::RepriseError;

/// Recall quality on the SM-2 scale.
///
/// - Blackout (0): no recall at all
/// - Incorrect (1): wrong, but the answer was recognized once shown
/// - NearMiss (2): wrong, yet recalling it felt within reach
/// - Difficult (3): correct with serious difficulty
/// - Hesitant (4): correct after hesitation
/// - Perfect (5): immediate correct recall
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum QualityGrade {
    /// No recall at all.
    Blackout = 0,
    /// Wrong answer, recognized once shown.
    Incorrect = 1,
    /// Wrong answer that felt within reach.
    NearMiss = 2,
    /// Correct with serious difficulty.
    Difficult = 3,
    /// Correct after hesitation.
    Hesitant = 4,
    /// Immediate correct recall.
    Perfect = 5,
}

impl QualityGrade {
    /// All grades in ascending order, for previews and iteration.
    pub const ALL: [QualityGrade; 6] = [
        QualityGrade::Blackout,
        QualityGrade::Incorrect,
        QualityGrade::NearMiss,
        QualityGrade::Difficult,
        QualityGrade::Hesitant,
        QualityGrade::Perfect,
    ];

    /// Numeric value on the 0-5 scale.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether this grade counts as successful recall (quality >= 3).
    pub fn is_success(self) -> bool {
        self.value() >= 3
    }

    /// Whether this grade counts as a lapse (quality < 3).
    pub fn is_failure(self) -> bool {
        !self.is_success()
    }

    /// Map a binary correct/incorrect signal onto the scale.
    ///
    /// Question-bank and exam answers carry no self-assessment, so correct
    /// maps to the top of the scale and incorrect to a recognized-miss.
    pub fn from_binary(correct: bool) -> Self {
        if correct {
            QualityGrade::Perfect
        } else {
            QualityGrade::Incorrect
        }
    }
}

impl From<QualityGrade> for u8 {
    fn from(grade: QualityGrade) -> Self {
        grade.value()
    }
}

impl TryFrom<u8> for QualityGrade {
    type Error = RepriseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QualityGrade::Blackout),
            1 => Ok(QualityGrade::Incorrect),
            2 => Ok(QualityGrade::NearMiss),
            3 => Ok(QualityGrade::Difficult),
            4 => Ok(QualityGrade::Hesitant),
            5 => Ok(QualityGrade::Perfect),
            other => Err(RepriseError::invalid_quality(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_grade_values_cover_scale() {
        for (i, grade) in QualityGrade::ALL.iter().enumerate() {
            assert_eq!(grade.value() as usize, i);
        }
    }

    #[test]
    fn test_success_threshold_at_three() {
        assert!(!QualityGrade::Blackout.is_success());
        assert!(!QualityGrade::Incorrect.is_success());
        assert!(!QualityGrade::NearMiss.is_success());
        assert!(QualityGrade::Difficult.is_success());
        assert!(QualityGrade::Hesitant.is_success());
        assert!(QualityGrade::Perfect.is_success());
    }

    #[test]
    fn test_try_from_round_trip() {
        for grade in QualityGrade::ALL {
            assert_eq!(QualityGrade::try_from(grade.value()).unwrap(), grade);
        }
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        let err = QualityGrade::try_from(6).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InputInvalidQuality);
        let err = QualityGrade::try_from(255).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InputInvalidQuality);
    }

    #[test]
    fn test_binary_mapping() {
        assert_eq!(QualityGrade::from_binary(true), QualityGrade::Perfect);
        assert_eq!(QualityGrade::from_binary(false), QualityGrade::Incorrect);
    }
}
