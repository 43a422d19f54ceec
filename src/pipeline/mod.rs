//! View assembly for the course page.
//!
//! - `view`: per-page state, stale-result handling, and rendering
//! - `sort`: review ordering
//! - `run_course_view`: one-shot fetch and render

pub mod sort;
pub mod view;

pub use sort::{RatingCategory, ReviewList, ReviewSort, SortCriteria, SortOrder};
pub use view::{CourseView, CourseViewState, Generation, NoteItem, ReviewItem};

use crate::models::Config;
use crate::services::{CourseApi, CourseDetailFetcher};

/// Fetch a course page and build its view, optionally sorting the reviews.
pub async fn run_course_view(
    config: &Config,
    api: &dyn CourseApi,
    course_id: i64,
    sort: Option<ReviewSort>,
) -> CourseView {
    let mut view = CourseView::new(course_id, config.reviews.compound_sorts);
    let generation = view.begin_refresh();

    log::info!("Fetching course {}...", course_id);
    let bundle = CourseDetailFetcher::new(api, config.client.max_concurrent)
        .fetch(course_id)
        .await;
    view.apply(generation, bundle);

    if let Some(sort) = sort {
        view.sort_reviews(sort);
    }
    view
}
