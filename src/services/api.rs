// src/services/api.rs

//! Backend API boundary.
//!
//! [`CourseApi`] lists the logical REST operations the course page consumes;
//! [`HttpCourseApi`] maps them onto the course, notes and user services.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::error::Result;
use crate::models::{
    ApiConfig, AuthContext, Course, CourseRatingSummary, Note, NoteAverage, NoteRating,
    NoteRatingDraft, NoteUpload, Report, ReportRequest, Review, ReviewDraft, Teacher, User,
};
use crate::utils::http::{fetch_json, send_authorized};
use crate::utils::join_url;

/// Raw note download: body plus the `Content-Disposition` header, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDownload {
    pub content_disposition: Option<String>,
    pub bytes: Vec<u8>,
}

/// Logical operations offered by the backend services.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn course(&self, course_id: i64) -> Result<Course>;

    async fn course_teacher(&self, course_id: i64) -> Result<Teacher>;

    async fn course_ratings(&self, course_id: i64) -> Result<CourseRatingSummary>;

    async fn course_reviews(&self, course_id: i64) -> Result<Vec<Review>>;

    async fn submit_review(&self, course_id: i64, draft: &ReviewDraft) -> Result<Review>;

    async fn course_notes(&self, course_id: i64) -> Result<Vec<Note>>;

    async fn note_average_rating(&self, note_id: i64) -> Result<NoteAverage>;

    async fn note_ratings(&self, note_id: i64) -> Result<Vec<NoteRating>>;

    async fn rate_note(&self, draft: &NoteRatingDraft) -> Result<NoteRating>;

    async fn upload_note(&self, upload: &NoteUpload) -> Result<Note>;

    async fn download_note(&self, note_id: i64) -> Result<RawDownload>;

    async fn submit_report(&self, request: &ReportRequest) -> Result<Report>;

    async fn current_user(&self) -> Result<User>;
}

/// [`CourseApi`] over HTTP.
pub struct HttpCourseApi {
    client: Client,
    api: ApiConfig,
    auth: AuthContext,
}

impl HttpCourseApi {
    pub fn new(client: Client, api: ApiConfig, auth: AuthContext) -> Self {
        Self { client, api, auth }
    }

    fn courses(&self, path: &str) -> Result<url::Url> {
        join_url(&self.api.course_url, path)
    }

    fn notes(&self, path: &str) -> Result<url::Url> {
        join_url(&self.api.notes_url, path)
    }

    fn users(&self, path: &str) -> Result<url::Url> {
        join_url(&self.api.user_url, path)
    }
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn course(&self, course_id: i64) -> Result<Course> {
        let url = self.courses(&format!("courses/{course_id}/details"))?;
        fetch_json(self.client.get(url), &self.auth).await
    }

    async fn course_teacher(&self, course_id: i64) -> Result<Teacher> {
        let url = self.courses(&format!("courses/{course_id}/teacher"))?;
        fetch_json(self.client.get(url), &self.auth).await
    }

    async fn course_ratings(&self, course_id: i64) -> Result<CourseRatingSummary> {
        let url = self.courses(&format!("courses/{course_id}/ratings"))?;
        fetch_json(self.client.get(url), &self.auth).await
    }

    async fn course_reviews(&self, course_id: i64) -> Result<Vec<Review>> {
        let url = self.courses(&format!("courses/{course_id}/reviews"))?;
        fetch_json(self.client.get(url), &self.auth).await
    }

    async fn submit_review(&self, course_id: i64, draft: &ReviewDraft) -> Result<Review> {
        let url = self.courses(&format!("courses/{course_id}/reviews"))?;
        fetch_json(self.client.post(url).json(draft), &self.auth).await
    }

    async fn course_notes(&self, course_id: i64) -> Result<Vec<Note>> {
        let url = self.notes(&format!("notes/{course_id}"))?;
        fetch_json(self.client.get(url), &self.auth).await
    }

    async fn note_average_rating(&self, note_id: i64) -> Result<NoteAverage> {
        let url = self.notes(&format!("notes/notes/{note_id}/average-rating"))?;
        fetch_json(self.client.get(url), &self.auth).await
    }

    async fn note_ratings(&self, note_id: i64) -> Result<Vec<NoteRating>> {
        let url = self.notes(&format!("notes/notes/{note_id}/reviews"))?;
        fetch_json(self.client.get(url), &self.auth).await
    }

    async fn rate_note(&self, draft: &NoteRatingDraft) -> Result<NoteRating> {
        let url = self.notes("notes/ratings")?;
        fetch_json(self.client.post(url).json(draft), &self.auth).await
    }

    async fn upload_note(&self, upload: &NoteUpload) -> Result<Note> {
        let url = self.notes("notes/")?;
        let file = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let form = Form::new()
            .text("course_id", upload.course_id.to_string())
            .text("description", upload.description.clone())
            .part("file", file);
        fetch_json(self.client.post(url).multipart(form), &self.auth).await
    }

    async fn download_note(&self, note_id: i64) -> Result<RawDownload> {
        let url = self.notes(&format!("notes/download/{note_id}"))?;
        let response = send_authorized(self.client.get(url), &self.auth).await?;
        let content_disposition = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok(RawDownload {
            content_disposition,
            bytes,
        })
    }

    async fn submit_report(&self, request: &ReportRequest) -> Result<Report> {
        let url = self.notes("notes/reports/")?;
        fetch_json(self.client.post(url).json(request), &self.auth).await
    }

    async fn current_user(&self) -> Result<User> {
        let url = self.users("users/me")?;
        fetch_json(self.client.get(url), &self.auth).await
    }
}
