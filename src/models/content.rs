use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A piece of course material, optionally scheduled and hierarchical.
/// `parent_id` groups contents into a tree within the same course.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseContent {
    pub id: Uuid,
    pub course_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub video_url: Option<String>,
    pub file_url: Option<String>,
    pub release_time: DateTime<Utc>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseContent {
    /// Whether the content is visible at `now`.
    ///
    /// Release time must have passed, and `now` must fall inside the
    /// availability window. An absent bound is open: a content with no
    /// `available_from`/`available_to` is governed by release time alone.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.release_time > now {
            return false;
        }
        if let Some(from) = self.available_from {
            if from > now {
                return false;
            }
        }
        if let Some(to) = self.available_to {
            if to < now {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Serialize, FromRow)]
pub struct ContentResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub description: String,
    pub video_url: Option<String>,
    pub file_url: Option<String>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseContent> for ContentResponse {
    fn from(c: CourseContent) -> Self {
        Self {
            id: c.id,
            course_id: c.course_id,
            name: c.name,
            description: c.description,
            video_url: c.video_url,
            file_url: c.file_url,
            available_from: c.available_from,
            available_to: c.available_to,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn content(
        release_offset_mins: i64,
        from: Option<i64>,
        to: Option<i64>,
        now: DateTime<Utc>,
    ) -> CourseContent {
        CourseContent {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            parent_id: None,
            name: "Lecture 1".to_string(),
            description: "-".to_string(),
            video_url: None,
            file_url: None,
            release_time: now + Duration::minutes(release_offset_mins),
            available_from: from.map(|m| now + Duration::minutes(m)),
            available_to: to.map(|m| now + Duration::minutes(m)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn released_content_with_no_window_is_active() {
        let now = Utc::now();
        assert!(content(-10, None, None, now).is_active(now));
    }

    #[test]
    fn unreleased_content_is_inactive() {
        let now = Utc::now();
        assert!(!content(10, None, None, now).is_active(now));
    }

    #[test]
    fn future_available_from_hides_released_content() {
        let now = Utc::now();
        assert!(!content(-10, Some(5), None, now).is_active(now));
    }

    #[test]
    fn expired_available_to_hides_content() {
        let now = Utc::now();
        assert!(!content(-10, Some(-5), Some(-1), now).is_active(now));
    }

    #[test]
    fn open_window_within_bounds_is_active() {
        let now = Utc::now();
        assert!(content(-10, Some(-5), Some(5), now).is_active(now));
        assert!(content(-10, None, Some(5), now).is_active(now));
        assert!(content(-10, Some(-5), None, now).is_active(now));
    }
}
