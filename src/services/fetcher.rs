// src/services/fetcher.rs

//! Course detail fetcher.
//!
//! Issues the independent course page requests concurrently and folds every
//! outcome into a [`CourseDetailBundle`]. "Not found" means "empty"; any other
//! failure flags only the section it belongs to.

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{
    Course, CourseDetailBundle, CourseRatingSummary, NO_TEACHER, Note, Review, Section,
    UNKNOWN_TEACHER, User,
};
use crate::services::CourseApi;

/// Fold a fetch result into a section.
///
/// 404 yields `empty()` with no error; every other failure yields `empty()`
/// with the error recorded.
pub fn settle<T>(section: &str, result: Result<T>, empty: impl FnOnce() -> T) -> Section<T> {
    match result {
        Ok(data) => Section::loaded(data),
        Err(e) if e.is_not_found() => {
            log::debug!("No {} available: {}", section, e);
            Section::loaded(empty())
        }
        Err(e) => {
            log::warn!("Failed to fetch {}: {}", section, e);
            Section::failed(empty(), format!("Failed to load {section}: {e}"))
        }
    }
}

/// Like [`settle`] but for per-note details, where any failure degrades to
/// the empty value for that one note.
fn degrade<T: Default>(note_id: i64, what: &str, result: Result<T>) -> T {
    match result {
        Ok(data) => data,
        Err(e) if e.is_not_found() => T::default(),
        Err(e) => {
            log::warn!("Failed to fetch {} of note {}: {}", what, note_id, e);
            T::default()
        }
    }
}

/// Fetches everything a course page shows.
pub struct CourseDetailFetcher<'a> {
    api: &'a dyn CourseApi,
    max_concurrent: usize,
}

impl<'a> CourseDetailFetcher<'a> {
    /// Create a fetcher; `max_concurrent` bounds the per-note fan-out.
    pub fn new(api: &'a dyn CourseApi, max_concurrent: usize) -> Self {
        Self {
            api,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Fetch the whole bundle. Never fails as a whole.
    pub async fn fetch(&self, course_id: i64) -> CourseDetailBundle {
        let ((course, teacher_name), ratings, reviews, notes, current_user) = futures::join!(
            self.fetch_course(course_id),
            self.fetch_ratings(course_id),
            self.fetch_reviews(course_id),
            self.fetch_notes(course_id),
            self.fetch_user()
        );

        let bundle = CourseDetailBundle {
            course_id,
            course,
            teacher_name,
            ratings,
            reviews,
            notes,
            current_user,
        };

        let failed = bundle.failed_sections();
        if failed.is_empty() {
            log::info!(
                "Loaded course {} ({} reviews, {} notes)",
                course_id,
                bundle.reviews.data.len(),
                bundle.notes.data.len()
            );
        } else {
            log::warn!(
                "Loaded course {} with failed sections: {}",
                course_id,
                failed.join(", ")
            );
        }
        bundle
    }

    /// Course details, then the teacher name once the course is known.
    pub async fn fetch_course(&self, course_id: i64) -> (Section<Option<Course>>, Option<String>) {
        let mut section = settle("course", self.api.course(course_id).await.map(Some), || None);

        let teacher_name = match section.data.as_ref() {
            Some(course) => Some(self.resolve_teacher(course).await),
            None => {
                if section.is_ok() {
                    let missing = AppError::not_found(format!("course {course_id}"));
                    section.error = Some(missing.to_string());
                }
                None
            }
        };

        (section, teacher_name)
    }

    async fn resolve_teacher(&self, course: &Course) -> String {
        if course.teacher_id.is_none() {
            return NO_TEACHER.to_string();
        }
        match self.api.course_teacher(course.id).await {
            Ok(teacher) => teacher.display_name(),
            Err(e) => {
                log::warn!("Failed to fetch teacher of course {}: {}", course.id, e);
                UNKNOWN_TEACHER.to_string()
            }
        }
    }

    pub async fn fetch_ratings(&self, course_id: i64) -> Section<CourseRatingSummary> {
        settle(
            "ratings",
            self.api.course_ratings(course_id).await,
            CourseRatingSummary::default,
        )
    }

    pub async fn fetch_reviews(&self, course_id: i64) -> Section<Vec<Review>> {
        settle("reviews", self.api.course_reviews(course_id).await, Vec::new)
    }

    /// Notes in source order, each with its average rating and rating list.
    pub async fn fetch_notes(&self, course_id: i64) -> Section<Vec<Note>> {
        match self.api.course_notes(course_id).await {
            Ok(notes) => Section::loaded(self.attach_details(notes).await),
            Err(e) => settle("notes", Err(e), Vec::new),
        }
    }

    pub async fn fetch_user(&self) -> Section<Option<User>> {
        settle("user", self.api.current_user().await.map(Some), || None)
    }

    async fn attach_details(&self, notes: Vec<Note>) -> Vec<Note> {
        stream::iter(notes)
            .map(|note| self.with_details(note))
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    async fn with_details(&self, mut note: Note) -> Note {
        let (average, ratings) = futures::join!(
            self.api.note_average_rating(note.id),
            self.api.note_ratings(note.id)
        );
        note.average_rating = degrade(note.id, "average rating", average).average_rating;
        note.ratings = degrade(note.id, "ratings", ratings);
        note
    }
}
