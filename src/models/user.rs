//! The authenticated requester.

use serde::{Deserialize, Serialize};

/// Current user as returned by `GET /users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,

    /// `None` means the user has not enrolled in a faculty yet
    #[serde(default)]
    pub faculty_id: Option<i64>,

    #[serde(default)]
    pub is_admin: bool,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}
