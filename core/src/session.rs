//! The authenticated user's locally cached state.

use crate::types::{Lesson, LessonId, User};

/// Holds the current user, including the lessons already fetched for them.
/// Passed explicitly to local lookups instead of being read from a global.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current_user: Option<User>,
}

impl SessionContext {
    pub fn new(user: User) -> Self {
        Self {
            current_user: Some(user),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn set_current_user(&mut self, user: User) {
        self.current_user = Some(user);
    }

    pub fn clear(&mut self) {
        self.current_user = None;
    }

    /// Replace the cached lesson list of the current user, e.g. after
    /// `list_lessons_for_user`. No-op when nobody is logged in.
    pub fn replace_lessons(&mut self, lessons: Vec<Lesson>) {
        if let Some(user) = self.current_user.as_mut() {
            user.lessons = lessons;
        }
    }

    pub fn find_lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.current_user
            .as_ref()?
            .lessons
            .iter()
            .find(|lesson| lesson.id == Some(id))
    }
}
