//! Lecture notes and their ratings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::time;

/// Uploaded lecture notes.
///
/// `average_rating` and `ratings` are not part of the listing response;
/// the fetcher fills them in from the per-note endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: i64,

    pub course_id: i64,

    /// Owner
    pub student_id: i64,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub file_id: Option<String>,

    #[serde(with = "time::flexible")]
    pub created_at: NaiveDateTime,

    #[serde(default)]
    pub average_rating: f64,

    #[serde(default)]
    pub ratings: Vec<NoteRating>,
}

impl Note {
    /// Whether `student_id` already rated this note.
    pub fn rated_by(&self, student_id: i64) -> bool {
        self.ratings.iter().any(|r| r.student_id == student_id)
    }
}

/// One student's rating of a note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteRating {
    pub id: i64,
    pub note_id: i64,
    pub student_id: i64,
    pub rating: u8,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(with = "time::flexible")]
    pub created_at: NaiveDateTime,
}

/// Response of `GET /notes/notes/{id}/average-rating`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NoteAverage {
    #[serde(default)]
    pub average_rating: f64,
}

/// Body of `POST /notes/ratings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteRatingDraft {
    pub note_id: i64,
    pub rating: u8,
    pub comment: Option<String>,
}

impl NoteRatingDraft {
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::validation(format!(
                "note rating must be between 1 and 5, got {}",
                self.rating
            )));
        }
        Ok(())
    }
}

/// Multipart payload of `POST /notes/`.
#[derive(Debug, Clone)]
pub struct NoteUpload {
    pub course_id: i64,
    pub description: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl NoteUpload {
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(AppError::validation("note description is empty"));
        }
        if self.bytes.is_empty() {
            return Err(AppError::validation(format!(
                "file {} is empty",
                self.file_name
            )));
        }
        Ok(())
    }
}

/// A fully buffered note download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedNote {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
