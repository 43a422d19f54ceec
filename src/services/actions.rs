// src/services/actions.rs

//! Course page mutations.
//!
//! Each action re-checks the permission evaluator first and refuses locally
//! when it fails closed, validates its input, calls the backend, then
//! refreshes the affected sections of the view.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{
    DownloadedNote, NoteRatingDraft, NoteUpload, Report, ReportRequest, ReportTarget, Review,
    ReviewDraft,
};
use crate::pipeline::CourseView;
use crate::services::{CourseApi, CourseDetailFetcher};
use crate::utils::disposition::filename_from_disposition;

/// Performs course page actions through a [`CourseApi`].
pub struct CourseActions<'a> {
    api: &'a dyn CourseApi,
    max_concurrent: usize,
    default_file_name: String,
}

impl<'a> CourseActions<'a> {
    pub fn new(
        api: &'a dyn CourseApi,
        max_concurrent: usize,
        default_file_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            max_concurrent,
            default_file_name: default_file_name.into(),
        }
    }

    fn fetcher(&self) -> CourseDetailFetcher<'a> {
        CourseDetailFetcher::new(self.api, self.max_concurrent)
    }

    /// Post a course review, then reload reviews and rating averages.
    pub async fn submit_review(&self, view: &mut CourseView, draft: ReviewDraft) -> Result<Review> {
        if !view.permissions().add_review() {
            return Err(AppError::unauthorized(
                "reviews are limited to students of the course's faculty",
            ));
        }
        draft.validate()?;

        let course_id = view.course_id();
        let review = self.api.submit_review(course_id, &draft).await?;
        log::info!("Submitted review {} for course {}", review.id, course_id);

        let generation = view.begin_refresh();
        let fetcher = self.fetcher();
        let (reviews, ratings) = futures::join!(
            fetcher.fetch_reviews(course_id),
            fetcher.fetch_ratings(course_id)
        );
        view.apply_reviews(generation, reviews);
        view.apply_ratings(generation, ratings);
        Ok(review)
    }

    /// Upload lecture notes, then reload the notes section.
    pub async fn upload_note(
        &self,
        view: &mut CourseView,
        description: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<()> {
        if !view.permissions().add_note() {
            return Err(AppError::unauthorized(
                "notes are limited to students of the course's faculty",
            ));
        }
        let upload = NoteUpload {
            course_id: view.course_id(),
            description: description.into(),
            file_name: file_name.into(),
            bytes,
        };
        upload.validate()?;

        let note = self.api.upload_note(&upload).await?;
        log::info!(
            "Uploaded {} ({} bytes) as note {}",
            upload.file_name,
            upload.bytes.len(),
            note.id
        );

        self.refresh_notes(view).await;
        Ok(())
    }

    /// Rate a note, then reload the notes section.
    ///
    /// The returned rating is recorded on the note right away, so the rate
    /// action is gone even if the reload fails.
    pub async fn rate_note(
        &self,
        view: &mut CourseView,
        note_id: i64,
        rating: u8,
        comment: Option<String>,
    ) -> Result<()> {
        let note = view
            .note(note_id)
            .ok_or_else(|| AppError::validation(format!("note {note_id} is not on this page")))?;
        if !view.permissions().rate_note(note) {
            return Err(AppError::unauthorized(format!(
                "note {note_id} cannot be rated by this user"
            )));
        }
        let draft = NoteRatingDraft {
            note_id,
            rating,
            comment,
        };
        draft.validate()?;

        let created = self.api.rate_note(&draft).await?;
        log::info!("Rated note {} with {} stars", note_id, created.rating);
        view.record_note_rating(created);

        self.refresh_notes(view).await;
        Ok(())
    }

    pub async fn report_review(
        &self,
        view: &mut CourseView,
        review_id: i64,
        reason: &str,
    ) -> Result<Report> {
        let review = view
            .review(review_id)
            .ok_or_else(|| AppError::validation(format!("review {review_id} is not on this page")))?;
        if !view.permissions().report_review(review) {
            return Err(AppError::unauthorized(format!(
                "review {review_id} cannot be reported by this user"
            )));
        }
        self.report(view, ReportTarget::Review(review_id), reason)
            .await
    }

    pub async fn report_note(
        &self,
        view: &mut CourseView,
        note_id: i64,
        reason: &str,
    ) -> Result<Report> {
        let note = view
            .note(note_id)
            .ok_or_else(|| AppError::validation(format!("note {note_id} is not on this page")))?;
        if !view.permissions().report_note(note) {
            return Err(AppError::unauthorized(format!(
                "note {note_id} cannot be reported by this user"
            )));
        }
        self.report(view, ReportTarget::Note(note_id), reason).await
    }

    async fn report(
        &self,
        view: &mut CourseView,
        target: ReportTarget,
        reason: &str,
    ) -> Result<Report> {
        let request = ReportRequest::new(target, reason)?;
        let report = self.api.submit_report(&request).await?;
        log::info!("Submitted report {} for {:?}", report.id, target);
        view.mark_reported(target);
        Ok(report)
    }

    /// Download a note into memory, resolving its file name.
    pub async fn download_note(&self, note_id: i64) -> Result<DownloadedNote> {
        let raw = self.api.download_note(note_id).await?;
        let file_name =
            filename_from_disposition(raw.content_disposition.as_deref(), &self.default_file_name);
        log::debug!("Downloaded note {} as {} ({} bytes)", note_id, file_name, raw.bytes.len());
        Ok(DownloadedNote {
            file_name,
            bytes: raw.bytes,
        })
    }

    async fn refresh_notes(&self, view: &mut CourseView) {
        let generation = view.begin_refresh();
        let notes = self.fetcher().fetch_notes(view.course_id()).await;
        view.apply_notes(generation, notes);
    }
}

/// Write a downloaded note into `dir`, returning the written path.
pub async fn save_download(download: &DownloadedNote, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&download.file_name);
    tokio::fs::write(&path, &download.bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::{Fail, FakeApi, user};
    use tempfile::TempDir;

    async fn setup(api: &FakeApi) -> CourseView {
        let mut view = CourseView::new(1, false);
        let generation = view.begin_refresh();
        view.apply(generation, CourseDetailFetcher::new(api, 4).fetch(1).await);
        view
    }

    fn draft(c: u8, f: u8, a: u8) -> ReviewDraft {
        ReviewDraft {
            rating_clarity: c,
            rating_feasibility: f,
            rating_availability: a,
            comment: Some("Ottimo corso".into()),
        }
    }

    #[tokio::test]
    async fn test_submit_review_refreshes_reviews_and_ratings() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;

        let review = CourseActions::new(&api, 4, "x")
            .submit_review(&mut view, draft(5, 4, 3))
            .await
            .unwrap();

        assert_eq!(view.reviews().len(), 4);
        assert!(view.review(review.id).is_some());
        assert_eq!(api.call_count("reviews"), 2);
        assert_eq!(api.call_count("ratings"), 2);
    }

    #[tokio::test]
    async fn test_submit_review_validates_before_posting() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;

        let err = CourseActions::new(&api, 4, "x")
            .submit_review(&mut view, draft(0, 4, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!api.was_called("submit_review"));
    }

    #[tokio::test]
    async fn test_submit_review_refused_for_other_faculty() {
        let mut api = FakeApi::sample();
        api.user = Some(user(100, Some(9)));
        let mut view = setup(&api).await;

        let err = CourseActions::new(&api, 4, "x")
            .submit_review(&mut view, draft(3, 3, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(!api.was_called("submit_review"));
    }

    #[tokio::test]
    async fn test_rate_note_then_cannot_rate_again() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;
        let actions = CourseActions::new(&api, 4, "x");

        actions.rate_note(&mut view, 10, 4, None).await.unwrap();
        assert!(!view.permissions().rate_note(view.note(10).unwrap()));
        assert_eq!(view.note(10).unwrap().ratings.len(), 3);

        let err = actions.rate_note(&mut view, 10, 5, None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(api.call_count("rate_note"), 1);
    }

    #[tokio::test]
    async fn test_rate_note_recorded_even_if_refresh_fails() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;
        api.fail("notes", Fail::Server);

        CourseActions::new(&api, 4, "x")
            .rate_note(&mut view, 10, 2, Some("ok".into()))
            .await
            .unwrap();

        let state = view.render();
        assert!(state.notes_error.is_some());
        assert_eq!(state.notes.len(), 3);
        assert!(!state.notes[0].can_rate);
    }

    #[tokio::test]
    async fn test_rate_own_note_refused() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;

        let err = CourseActions::new(&api, 4, "x")
            .rate_note(&mut view, 11, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_report_review_hides_action_once() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;
        let actions = CourseActions::new(&api, 4, "x");

        let report = actions
            .report_review(&mut view, 2, "offensive")
            .await
            .unwrap();
        assert_eq!(report.id_review, Some(2));
        assert!(!view.permissions().report_review(view.review(2).unwrap()));

        let err = actions
            .report_review(&mut view, 2, "again")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(api.call_count("report"), 1);
    }

    #[tokio::test]
    async fn test_report_review_without_author() {
        let api = FakeApi::sample();
        for review in api.reviews.lock().unwrap().iter_mut() {
            review.student_id = None;
        }
        let mut view = setup(&api).await;

        let report = CourseActions::new(&api, 4, "x")
            .report_review(&mut view, 3, "spam")
            .await
            .unwrap();
        assert_eq!(report.id_review, Some(3));
        assert!(!view.permissions().report_review(view.review(3).unwrap()));
    }

    #[tokio::test]
    async fn test_failed_report_keeps_action() {
        let api = FakeApi::sample();
        api.fail("report", Fail::Server);
        let mut view = setup(&api).await;

        assert!(
            CourseActions::new(&api, 4, "x")
                .report_note(&mut view, 10, "copied")
                .await
                .is_err()
        );
        assert!(view.permissions().report_note(view.note(10).unwrap()));
    }

    #[tokio::test]
    async fn test_report_requires_reason() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;

        let err = CourseActions::new(&api, 4, "x")
            .report_note(&mut view, 10, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!api.was_called("report"));
    }

    #[tokio::test]
    async fn test_upload_note_refreshes_notes() {
        let api = FakeApi::sample();
        let mut view = setup(&api).await;

        CourseActions::new(&api, 4, "x")
            .upload_note(&mut view, "Esercitazioni", "es.pdf", b"pdf".to_vec())
            .await
            .unwrap();
        assert_eq!(view.notes().len(), 4);
        assert_eq!(view.notes()[3].student_id, 100);
    }

    #[tokio::test]
    async fn test_download_and_save() {
        let mut api = FakeApi::sample();
        let actions = CourseActions::new(&api, 4, "downloaded_note");
        let download = actions.download_note(10).await.unwrap();
        assert_eq!(download.file_name, "lezione 1.pdf");

        let tmp = TempDir::new().unwrap();
        let path = save_download(&download, tmp.path()).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4");

        api.download.content_disposition = Some("attachment".into());
        let actions = CourseActions::new(&api, 4, "downloaded_note");
        assert_eq!(
            actions.download_note(10).await.unwrap().file_name,
            "downloaded_note"
        );
    }
}
