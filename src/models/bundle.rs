//! The aggregated per-view snapshot of a course page.

use serde::Serialize;

use super::{Course, CourseRatingSummary, Note, Review, User};

/// One independently fetched slice of the bundle.
///
/// `error` is set when the fetch failed for any reason other than "not found";
/// `data` then holds the empty default so the rest of the page can still render.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Section<T> {
    pub data: T,
    pub error: Option<String>,
}

impl<T> Section<T> {
    pub fn loaded(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn failed(data: T, error: impl Into<String>) -> Self {
        Self {
            data,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything the course page shows, fetched in one pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseDetailBundle {
    pub course_id: i64,

    pub course: Section<Option<Course>>,

    /// `None` when the course itself could not be loaded
    pub teacher_name: Option<String>,

    pub ratings: Section<CourseRatingSummary>,

    pub reviews: Section<Vec<Review>>,

    /// Each note carries its average rating and rating list
    pub notes: Section<Vec<Note>>,

    pub current_user: Section<Option<User>>,
}

impl CourseDetailBundle {
    /// An empty bundle, as shown before the first fetch completes.
    pub fn empty(course_id: i64) -> Self {
        Self {
            course_id,
            course: Section::default(),
            teacher_name: None,
            ratings: Section::default(),
            reviews: Section::default(),
            notes: Section::default(),
            current_user: Section::default(),
        }
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.data.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.current_user.data.as_ref()
    }

    /// Names of the sections that failed, for summaries.
    pub fn failed_sections(&self) -> Vec<&'static str> {
        [
            ("course", self.course.is_ok()),
            ("ratings", self.ratings.is_ok()),
            ("reviews", self.reviews.is_ok()),
            ("notes", self.notes.is_ok()),
            ("user", self.current_user.is_ok()),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect()
    }
}
