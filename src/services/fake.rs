//! In-memory [`CourseApi`] used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::{AppError, Result};
use crate::models::{
    Course, CourseRatingSummary, Note, NoteAverage, NoteRating, NoteRatingDraft, NoteUpload,
    Report, ReportRequest, Review, ReviewDraft, Teacher, User,
};
use crate::services::{CourseApi, RawDownload};
use crate::utils::time::parse_timestamp;

#[derive(Debug, Clone, Copy)]
pub enum Fail {
    NotFound,
    Server,
}

pub struct FakeApi {
    pub course: Option<Course>,
    pub teacher: Option<Teacher>,
    pub ratings: CourseRatingSummary,
    pub reviews: Mutex<Vec<Review>>,
    pub notes: Mutex<Vec<Note>>,
    pub note_averages: HashMap<i64, f64>,
    pub note_ratings: Mutex<HashMap<i64, Vec<NoteRating>>>,
    pub user: Option<User>,
    pub download: RawDownload,
    failures: Mutex<HashMap<String, Fail>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicI64,
}

pub fn ts(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap()
}

pub fn review(id: i64, student_id: i64, date: &str, ratings: (u8, u8, u8)) -> Review {
    Review {
        id,
        course_id: Some(1),
        student_id: Some(student_id),
        rating_clarity: ratings.0,
        rating_feasibility: ratings.1,
        rating_availability: ratings.2,
        comment: None,
        created_at: ts(date),
    }
}

pub fn note(id: i64, student_id: i64) -> Note {
    Note {
        id,
        course_id: 1,
        student_id,
        description: Some(format!("Notes {id}")),
        file_id: None,
        created_at: ts("2025-02-01T12:00:00"),
        average_rating: 0.0,
        ratings: Vec::new(),
    }
}

pub fn note_rating(id: i64, note_id: i64, student_id: i64, rating: u8) -> NoteRating {
    NoteRating {
        id,
        note_id,
        student_id,
        rating,
        comment: None,
        created_at: ts("2025-02-02T08:00:00"),
    }
}

pub fn user(id: i64, faculty_id: Option<i64>) -> User {
    User {
        id,
        faculty_id,
        is_admin: false,
        first_name: None,
        last_name: None,
    }
}

impl FakeApi {
    /// Course 1 in faculty 5, current user 100 enrolled in faculty 5.
    pub fn sample() -> Self {
        let reviews = vec![
            review(1, 100, "2025-01-10", (4, 3, 5)),
            review(2, 101, "2025-01-05", (2, 5, 1)),
            review(3, 102, "2025-01-20", (5, 1, 3)),
        ];
        let notes = vec![note(10, 101), note(11, 100), note(12, 102)];
        let note_ratings = HashMap::from([
            (10, vec![note_rating(1, 10, 102, 5), note_rating(2, 10, 103, 4)]),
            (12, vec![note_rating(3, 12, 100, 3)]),
        ]);

        Self {
            course: Some(Course {
                id: 1,
                name: "Sistemi Operativi".into(),
                faculty_id: Some(5),
                teacher_id: Some(2),
            }),
            teacher: Some(Teacher {
                id: Some(2),
                name: None,
                first_name: Some("Mario".into()),
                last_name: Some("Rossi".into()),
            }),
            ratings: CourseRatingSummary {
                average_clarity: 4.0,
                average_feasibility: 3.5,
                average_availability: 2.5,
            },
            reviews: Mutex::new(reviews),
            notes: Mutex::new(notes),
            note_averages: HashMap::from([(10, 4.5), (12, 3.0)]),
            note_ratings: Mutex::new(note_ratings),
            user: Some(user(100, Some(5))),
            download: RawDownload {
                content_disposition: Some(r#"attachment; filename="lezione 1.pdf""#.into()),
                bytes: b"%PDF-1.4".to_vec(),
            },
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1000),
        }
    }

    pub fn fail(&self, key: &str, fail: Fail) {
        self.failures.lock().unwrap().insert(key.to_string(), fail);
    }

    pub fn recover(&self, key: &str) {
        self.failures.lock().unwrap().remove(key);
    }

    pub fn was_called(&self, key: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == key)
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == key).count()
    }

    fn enter(&self, key: &str) -> Result<()> {
        self.calls.lock().unwrap().push(key.to_string());
        match self.failures.lock().unwrap().get(key) {
            Some(Fail::NotFound) => Err(AppError::not_found(key)),
            Some(Fail::Server) => Err(AppError::status(500, format!("fake://{key}"))),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn current_user_id(&self) -> i64 {
        self.user.as_ref().map_or(0, |u| u.id)
    }
}

#[async_trait]
impl CourseApi for FakeApi {
    async fn course(&self, _course_id: i64) -> Result<Course> {
        self.enter("course")?;
        self.course.clone().ok_or_else(|| AppError::not_found("course"))
    }

    async fn course_teacher(&self, _course_id: i64) -> Result<Teacher> {
        self.enter("teacher")?;
        self.teacher.clone().ok_or_else(|| AppError::not_found("teacher"))
    }

    async fn course_ratings(&self, _course_id: i64) -> Result<CourseRatingSummary> {
        self.enter("ratings")?;
        Ok(self.ratings)
    }

    async fn course_reviews(&self, _course_id: i64) -> Result<Vec<Review>> {
        self.enter("reviews")?;
        Ok(self.reviews.lock().unwrap().clone())
    }

    async fn submit_review(&self, course_id: i64, draft: &ReviewDraft) -> Result<Review> {
        self.enter("submit_review")?;
        let review = Review {
            id: self.next_id(),
            course_id: Some(course_id),
            student_id: Some(self.current_user_id()),
            rating_clarity: draft.rating_clarity,
            rating_feasibility: draft.rating_feasibility,
            rating_availability: draft.rating_availability,
            comment: draft.comment.clone(),
            created_at: ts("2025-03-01T09:00:00"),
        };
        self.reviews.lock().unwrap().push(review.clone());
        Ok(review)
    }

    async fn course_notes(&self, _course_id: i64) -> Result<Vec<Note>> {
        self.enter("notes")?;
        Ok(self.notes.lock().unwrap().clone())
    }

    async fn note_average_rating(&self, note_id: i64) -> Result<NoteAverage> {
        self.enter(&format!("note_average:{note_id}"))?;
        Ok(NoteAverage {
            average_rating: self.note_averages.get(&note_id).copied().unwrap_or(0.0),
        })
    }

    async fn note_ratings(&self, note_id: i64) -> Result<Vec<NoteRating>> {
        self.enter(&format!("note_ratings:{note_id}"))?;
        Ok(self
            .note_ratings
            .lock()
            .unwrap()
            .get(&note_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn rate_note(&self, draft: &NoteRatingDraft) -> Result<NoteRating> {
        self.enter("rate_note")?;
        let rating = NoteRating {
            id: self.next_id(),
            note_id: draft.note_id,
            student_id: self.current_user_id(),
            rating: draft.rating,
            comment: draft.comment.clone(),
            created_at: ts("2025-03-01T09:00:00"),
        };
        self.note_ratings
            .lock()
            .unwrap()
            .entry(draft.note_id)
            .or_default()
            .push(rating.clone());
        Ok(rating)
    }

    async fn upload_note(&self, upload: &NoteUpload) -> Result<Note> {
        self.enter("upload_note")?;
        let mut created = note(self.next_id(), self.current_user_id());
        created.course_id = upload.course_id;
        created.description = Some(upload.description.clone());
        self.notes.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn download_note(&self, _note_id: i64) -> Result<RawDownload> {
        self.enter("download")?;
        Ok(self.download.clone())
    }

    async fn submit_report(&self, request: &ReportRequest) -> Result<Report> {
        self.enter("report")?;
        Ok(Report {
            id: self.next_id(),
            user_id: Some(self.current_user_id()),
            id_review: request.id_review,
            id_note: request.id_note,
            reason: request.reason.clone(),
        })
    }

    async fn current_user(&self) -> Result<User> {
        self.enter("user")?;
        self.user.clone().ok_or_else(|| AppError::not_found("user"))
    }
}
