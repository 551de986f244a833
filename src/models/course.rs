use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Student,
    Assistant,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub image_url: Option<String>,
    pub teacher_id: Uuid,
    pub max_students: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Seats left before the student quota is hit. Never negative.
    pub fn remaining_slots(&self, current_members: i64) -> i64 {
        (self.max_students as i64 - current_members).max(0)
    }
}

/// Enrollment record linking a user to a course with a role.
/// (course_id, user_id) is unique at the database level.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseMember {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course joined with its teacher's identity, as returned by listings
#[derive(Debug, Serialize, FromRow)]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub image_url: Option<String>,
    pub teacher_id: Uuid,
    pub teacher_username: String,
    pub max_students: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn course(max_students: i32) -> Course {
        Course {
            id: Uuid::new_v4(),
            name: "Algorithms".to_string(),
            description: "Intro".to_string(),
            price: 0,
            image_url: None,
            teacher_id: Uuid::new_v4(),
            max_students,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn remaining_slots_counts_down() {
        let c = course(100);
        assert_eq!(c.remaining_slots(0), 100);
        assert_eq!(c.remaining_slots(98), 2);
        assert_eq!(c.remaining_slots(100), 0);
    }

    #[test]
    fn remaining_slots_clamps_overfull_course() {
        // Over-enrollment from before the quota existed must not underflow
        let c = course(2);
        assert_eq!(c.remaining_slots(5), 0);
    }
}
