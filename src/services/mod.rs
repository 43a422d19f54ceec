//! Service layer for the advisor client.
//!
//! This module contains:
//! - The backend API boundary (`CourseApi`, `HttpCourseApi`)
//! - Course page fetching (`CourseDetailFetcher`)
//! - Permission checks (`permissions`)
//! - Course page mutations (`CourseActions`)

mod actions;
mod api;
#[cfg(test)]
pub(crate) mod fake;
mod fetcher;
pub mod permissions;

pub use actions::{CourseActions, save_download};
pub use api::{CourseApi, HttpCourseApi, RawDownload};
pub use fetcher::{CourseDetailFetcher, settle};
pub use permissions::{Permissions, ReportLedger};
