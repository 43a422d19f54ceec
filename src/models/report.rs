//! Abuse reports. Write-only from the client's perspective.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// What a report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportTarget {
    Review(i64),
    Note(i64),
}

/// Body of `POST /notes/reports/`. Exactly one id is set.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_review: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_note: Option<i64>,

    pub reason: String,
}

impl ReportRequest {
    pub fn new(target: ReportTarget, reason: impl Into<String>) -> Result<Self> {
        let reason = reason.into().trim().to_string();
        if reason.is_empty() {
            return Err(AppError::validation("report reason is empty"));
        }
        let (id_review, id_note) = match target {
            ReportTarget::Review(id) => (Some(id), None),
            ReportTarget::Note(id) => (None, Some(id)),
        };
        Ok(Self {
            id_review,
            id_note,
            reason,
        })
    }
}

/// A stored report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub id: i64,

    #[serde(default, alias = "id_user")]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub id_review: Option<i64>,

    #[serde(default)]
    pub id_note: Option<i64>,

    pub reason: String,
}
