// src/services/permissions.rs

//! Authorization evaluator.
//!
//! Pure checks deciding which course page actions are offered. Every check
//! fails closed: an unknown user, an unknown course faculty, or an
//! unenrolled user denies the action. The server enforces the same rules;
//! these only decide what the client shows.

use std::collections::HashSet;

use crate::models::{Course, Note, Review, User};

/// Reviews and notes reported during the current view.
///
/// Never re-queried from the server; a full reload starts empty again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportLedger {
    reviews: HashSet<i64>,
    notes: HashSet<i64>,
}

impl ReportLedger {
    pub fn mark_review(&mut self, review_id: i64) {
        self.reviews.insert(review_id);
    }

    pub fn mark_note(&mut self, note_id: i64) {
        self.notes.insert(note_id);
    }

    pub fn review_reported(&self, review_id: i64) -> bool {
        self.reviews.contains(&review_id)
    }

    pub fn note_reported(&self, note_id: i64) -> bool {
        self.notes.contains(&note_id)
    }
}

/// User and course belong to the same, known faculty.
fn same_faculty(user: Option<&User>, course: Option<&Course>) -> bool {
    match (user.and_then(|u| u.faculty_id), course.and_then(|c| c.faculty_id)) {
        (Some(mine), Some(theirs)) => mine == theirs,
        _ => false,
    }
}

pub fn can_add_review(user: Option<&User>, course: Option<&Course>) -> bool {
    same_faculty(user, course)
}

pub fn can_add_note(user: Option<&User>, course: Option<&Course>) -> bool {
    same_faculty(user, course)
}

pub fn can_rate_note(user: Option<&User>, course: Option<&Course>, note: &Note) -> bool {
    let Some(me) = user else {
        return false;
    };
    same_faculty(user, course) && me.id != note.student_id && !note.rated_by(me.id)
}

/// The course service does not send review authors, so an unknown author
/// only rules out the self-report check.
pub fn can_report_review(
    user: Option<&User>,
    course: Option<&Course>,
    review: &Review,
    ledger: &ReportLedger,
) -> bool {
    user.is_some_and(|me| review.student_id != Some(me.id))
        && same_faculty(user, course)
        && !ledger.review_reported(review.id)
}

pub fn can_report_note(
    user: Option<&User>,
    course: Option<&Course>,
    note: &Note,
    ledger: &ReportLedger,
) -> bool {
    let Some(me) = user else {
        return false;
    };
    same_faculty(user, course) && me.id != note.student_id && !ledger.note_reported(note.id)
}

/// The evaluator inputs bundled together.
#[derive(Debug, Clone, Copy)]
pub struct Permissions<'a> {
    pub user: Option<&'a User>,
    pub course: Option<&'a Course>,
    pub ledger: &'a ReportLedger,
}

impl<'a> Permissions<'a> {
    pub fn new(user: Option<&'a User>, course: Option<&'a Course>, ledger: &'a ReportLedger) -> Self {
        Self {
            user,
            course,
            ledger,
        }
    }

    pub fn add_review(&self) -> bool {
        can_add_review(self.user, self.course)
    }

    pub fn add_note(&self) -> bool {
        can_add_note(self.user, self.course)
    }

    pub fn rate_note(&self, note: &Note) -> bool {
        can_rate_note(self.user, self.course, note)
    }

    pub fn report_review(&self, review: &Review) -> bool {
        can_report_review(self.user, self.course, review, self.ledger)
    }

    pub fn report_note(&self, note: &Note) -> bool {
        can_report_note(self.user, self.course, note, self.ledger)
    }
}
