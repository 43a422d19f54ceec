// src/pipeline/view.rs

//! Course view state.
//!
//! A [`CourseView`] lives as long as the course page is open. It owns the
//! latest fetched sections, the locally reported ids, and the review order,
//! and turns them into a renderable [`CourseViewState`].

use serde::Serialize;

use crate::models::{
    Course, CourseDetailBundle, CourseRatingSummary, Note, NoteRating, ReportTarget, Review,
    Section, User,
};
use crate::pipeline::sort::{ReviewList, ReviewSort};
use crate::services::permissions::{Permissions, ReportLedger};

/// Identifies one refresh of a view.
///
/// Results carrying an outdated generation are dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Take a successful fetch; on failure keep the previous data next to the error.
fn merge<T>(current: &mut Section<T>, incoming: Section<T>) {
    if incoming.is_ok() {
        *current = incoming;
    } else {
        current.error = incoming.error;
    }
}

/// A review plus the actions offered on it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewItem {
    #[serde(flatten)]
    pub review: Review,
    pub can_report: bool,
}

/// A note plus the actions offered on it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NoteItem {
    #[serde(flatten)]
    pub note: Note,
    pub can_rate: bool,
    pub can_report: bool,
}

/// Everything the rendering layer needs for one course page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseViewState {
    pub course_id: i64,
    pub course_name: Option<String>,
    pub teacher_name: Option<String>,
    pub course_error: Option<String>,

    pub ratings: CourseRatingSummary,
    pub ratings_error: Option<String>,

    pub reviews: Vec<ReviewItem>,
    pub reviews_error: Option<String>,
    pub review_sort: Option<ReviewSort>,

    pub notes: Vec<NoteItem>,
    pub notes_error: Option<String>,

    pub user_error: Option<String>,
    pub can_add_review: bool,
    pub can_add_note: bool,
}

/// Per-page state for one course.
#[derive(Debug, Clone)]
pub struct CourseView {
    course_id: i64,
    generation: u64,
    course: Section<Option<Course>>,
    teacher_name: Option<String>,
    ratings: Section<CourseRatingSummary>,
    reviews: ReviewList,
    reviews_error: Option<String>,
    notes: Section<Vec<Note>>,
    user: Section<Option<User>>,
    ledger: ReportLedger,
}

impl CourseView {
    pub fn new(course_id: i64, compound_sorts: bool) -> Self {
        Self {
            course_id,
            generation: 0,
            course: Section::default(),
            teacher_name: None,
            ratings: Section::default(),
            reviews: ReviewList::new(compound_sorts),
            reviews_error: None,
            notes: Section::default(),
            user: Section::default(),
            ledger: ReportLedger::default(),
        }
    }

    pub fn course_id(&self) -> i64 {
        self.course_id
    }

    /// Start a refresh; earlier in-flight refreshes become stale.
    pub fn begin_refresh(&mut self) -> Generation {
        self.generation += 1;
        Generation(self.generation)
    }

    /// Invalidate every in-flight refresh, as when the page is left.
    pub fn close(&mut self) {
        self.generation += 1;
    }

    fn is_current(&self, generation: Generation, what: &str) -> bool {
        if generation.0 == self.generation {
            return true;
        }
        log::debug!(
            "Discarding stale {} for course {} (generation {} != {})",
            what,
            self.course_id,
            generation.0,
            self.generation
        );
        false
    }

    /// Install a freshly fetched bundle. Returns `false` if it was stale.
    pub fn apply(&mut self, generation: Generation, bundle: CourseDetailBundle) -> bool {
        if bundle.course_id != self.course_id || !self.is_current(generation, "bundle") {
            return false;
        }
        merge(&mut self.course, bundle.course);
        if bundle.teacher_name.is_some() {
            self.teacher_name = bundle.teacher_name;
        }
        merge(&mut self.ratings, bundle.ratings);
        self.set_reviews(bundle.reviews);
        merge(&mut self.notes, bundle.notes);
        merge(&mut self.user, bundle.current_user);
        true
    }

    pub fn apply_reviews(&mut self, generation: Generation, reviews: Section<Vec<Review>>) -> bool {
        if !self.is_current(generation, "reviews") {
            return false;
        }
        self.set_reviews(reviews);
        true
    }

    pub fn apply_ratings(
        &mut self,
        generation: Generation,
        ratings: Section<CourseRatingSummary>,
    ) -> bool {
        if !self.is_current(generation, "ratings") {
            return false;
        }
        merge(&mut self.ratings, ratings);
        true
    }

    pub fn apply_notes(&mut self, generation: Generation, notes: Section<Vec<Note>>) -> bool {
        if !self.is_current(generation, "notes") {
            return false;
        }
        merge(&mut self.notes, notes);
        true
    }

    fn set_reviews(&mut self, reviews: Section<Vec<Review>>) {
        if reviews.is_ok() {
            self.reviews.replace(reviews.data);
        }
        self.reviews_error = reviews.error;
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.data.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.data.as_ref()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes.data
    }

    pub fn note(&self, note_id: i64) -> Option<&Note> {
        self.notes.data.iter().find(|n| n.id == note_id)
    }

    pub fn reviews(&self) -> &[Review] {
        self.reviews.displayed()
    }

    pub fn review(&self, review_id: i64) -> Option<&Review> {
        self.reviews.displayed().iter().find(|r| r.id == review_id)
    }

    pub fn permissions(&self) -> Permissions<'_> {
        Permissions::new(self.user(), self.course(), &self.ledger)
    }

    pub fn sort_reviews(&mut self, sort: ReviewSort) {
        self.reviews.apply_sort(sort);
    }

    /// Hide the report action for `target` until the view is rebuilt.
    pub fn mark_reported(&mut self, target: ReportTarget) {
        match target {
            ReportTarget::Review(id) => self.ledger.mark_review(id),
            ReportTarget::Note(id) => self.ledger.mark_note(id),
        }
    }

    /// Add a just-submitted rating to its note so the rate action disappears
    /// before the next refetch.
    pub fn record_note_rating(&mut self, rating: NoteRating) {
        if let Some(note) = self.notes.data.iter_mut().find(|n| n.id == rating.note_id) {
            if !note.rated_by(rating.student_id) {
                note.ratings.push(rating);
            }
        }
    }

    pub fn render(&self) -> CourseViewState {
        let perms = self.permissions();

        let reviews = self
            .reviews
            .displayed()
            .iter()
            .map(|review| ReviewItem {
                can_report: perms.report_review(review),
                review: review.clone(),
            })
            .collect();

        let notes = self
            .notes
            .data
            .iter()
            .map(|note| NoteItem {
                can_rate: perms.rate_note(note),
                can_report: perms.report_note(note),
                note: note.clone(),
            })
            .collect();

        CourseViewState {
            course_id: self.course_id,
            course_name: self.course().map(|c| c.name.clone()),
            teacher_name: self.teacher_name.clone(),
            course_error: self.course.error.clone(),
            ratings: self.ratings.data,
            ratings_error: self.ratings.error.clone(),
            reviews,
            reviews_error: self.reviews_error.clone(),
            review_sort: self.reviews.active_sort(),
            notes,
            notes_error: self.notes.error.clone(),
            user_error: self.user.error.clone(),
            can_add_review: perms.add_review(),
            can_add_note: perms.add_note(),
        }
    }
}
