// src/models/mod.rs

//! Domain models for the advisor client.
//!
//! Entities are request-scoped copies of what the backend services return;
//! nothing here is persisted.

mod auth;
mod bundle;
mod config;
mod course;
mod note;
mod report;
mod user;

// Re-export all public types
pub use auth::AuthContext;
pub use bundle::{CourseDetailBundle, Section};
pub use config::{ApiConfig, ClientConfig, Config, DownloadConfig, LoggingConfig, ReviewConfig};
pub use course::{
    Course, CourseRatingSummary, NO_TEACHER, Review, ReviewDraft, Teacher, UNKNOWN_TEACHER,
};
pub use note::{DownloadedNote, Note, NoteAverage, NoteRating, NoteRatingDraft, NoteUpload};
pub use report::{Report, ReportRequest, ReportTarget};
pub use user::User;
