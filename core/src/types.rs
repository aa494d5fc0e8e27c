//! Domain DTOs for the lessons API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Only the fields the client reasons about are typed; every other scheduling
//! attribute the server sends is kept verbatim in `Lesson::attributes` so a
//! lesson survives a fetch-edit-update round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type LessonId = i64;
pub type UserId = i64;

/// A scheduled classroom session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Lesson {
    /// Absent until the server has created the lesson.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LessonId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub attenders: Vec<User>,
    /// Opaque scheduling attributes (teacher, dates, ...), passed through as-is.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Lesson {
    /// A lesson that has not been created on the server yet.
    pub fn draft(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A registered user. `lessons` is only populated for the authenticated user
/// and is used for local lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lessons: Vec<Lesson>,
}
