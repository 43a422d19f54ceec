//! Course-side entities: course, teacher, rating summary, reviews.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::time;

/// Shown when a course has no teacher.
pub const NO_TEACHER: &str = "No teacher assigned";

/// Shown when a teacher record carries no usable name.
pub const UNKNOWN_TEACHER: &str = "Unknown";

/// A course as returned by `GET /courses/{id}/details`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    #[serde(default)]
    pub id: i64,

    pub name: String,

    /// `None` while unknown; every permission check fails closed in that case
    #[serde(default)]
    pub faculty_id: Option<i64>,

    #[serde(default)]
    pub teacher_id: Option<i64>,
}

/// A teacher record. Backends return either split or plain names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Teacher {
    #[serde(default, alias = "teacher_id")]
    pub id: Option<i64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

impl Teacher {
    /// Resolve the display name: `first last`, then `name`, then "Unknown".
    pub fn display_name(&self) -> String {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        match (non_empty(&self.first_name), non_empty(&self.last_name)) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => non_empty(&self.name).unwrap_or_else(|| UNKNOWN_TEACHER.to_string()),
        }
    }
}

/// Average ratings of a course; all zero when nobody reviewed it yet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CourseRatingSummary {
    #[serde(default)]
    pub average_clarity: f64,

    #[serde(default)]
    pub average_feasibility: f64,

    #[serde(default)]
    pub average_availability: f64,
}

/// A star-rating review of a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: i64,

    #[serde(default)]
    pub course_id: Option<i64>,

    /// Author; some endpoints omit it
    #[serde(default)]
    pub student_id: Option<i64>,

    pub rating_clarity: u8,
    pub rating_feasibility: u8,
    pub rating_availability: u8,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(with = "time::flexible")]
    pub created_at: NaiveDateTime,
}

/// Body of `POST /courses/{id}/reviews`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating_clarity: u8,
    pub rating_feasibility: u8,
    pub rating_availability: u8,
    pub comment: Option<String>,
}

impl ReviewDraft {
    /// Every dimension must be rated 1 through 5 before submission.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("clarity", self.rating_clarity),
            ("feasibility", self.rating_feasibility),
            ("availability", self.rating_availability),
        ] {
            if !(1..=5).contains(&value) {
                return Err(AppError::validation(format!(
                    "{label} rating must be between 1 and 5, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_prefers_split_name() {
        let teacher = Teacher {
            id: Some(1),
            name: Some("Rossi".into()),
            first_name: Some("Mario".into()),
            last_name: Some("Rossi".into()),
        };
        assert_eq!(teacher.display_name(), "Mario Rossi");
    }

    #[test]
    fn test_teacher_falls_back_to_name_then_unknown() {
        let teacher: Teacher =
            serde_json::from_str(r#"{"teacher_id": 4, "name": "Prof. Bianchi"}"#).unwrap();
        assert_eq!(teacher.id, Some(4));
        assert_eq!(teacher.display_name(), "Prof. Bianchi");

        let half = Teacher {
            first_name: Some("Anna".into()),
            ..Teacher::default()
        };
        assert_eq!(half.display_name(), UNKNOWN_TEACHER);
    }

    #[test]
    fn test_review_accepts_plain_date() {
        let json = r#"{
            "id": 3,
            "created_at": "2025-01-14",
            "rating_clarity": 4,
            "rating_feasibility": 2,
            "rating_availability": 5,
            "comment": null
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.student_id, None);
        assert_eq!(review.created_at.to_string(), "2025-01-14 00:00:00");
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = ReviewDraft {
            rating_clarity: 5,
            rating_feasibility: 1,
            rating_availability: 3,
            comment: None,
        };
        assert!(draft.validate().is_ok());

        draft.rating_feasibility = 0;
        assert!(matches!(draft.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rating_summary_missing_fields_are_zero() {
        let summary: CourseRatingSummary =
            serde_json::from_str(r#"{"course_id": 1, "average_clarity": 3.5}"#).unwrap();
        assert_eq!(summary.average_clarity, 3.5);
        assert_eq!(summary.average_feasibility, 0.0);
    }
}
