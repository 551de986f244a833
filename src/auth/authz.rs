use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Course, CourseMember},
};

/// Loads a course and verifies the caller teaches it.
///
/// A missing course and a course taught by someone else are distinct
/// failures: the first is a not-found, the second names the relationship
/// the caller lacks.
pub async fn require_course_teacher(
    pool: &PgPool,
    course_id: Uuid,
    user_id: Uuid,
) -> Result<Course, AppError> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, description, price, image_url, teacher_id,
               max_students, created_at, updated_at
        FROM courses
        WHERE id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if course.teacher_id != user_id {
        return Err(AppError::Forbidden(
            "You are not the teacher of this course".to_string(),
        ));
    }

    Ok(course)
}

/// Looks up the caller's membership in a course, if any.
pub async fn find_membership(
    pool: &PgPool,
    course_id: Uuid,
    user_id: Uuid,
) -> Result<Option<CourseMember>, AppError> {
    let member = sqlx::query_as::<_, CourseMember>(
        r#"
        SELECT id, course_id, user_id, role, created_at, updated_at
        FROM course_members
        WHERE course_id = $1 AND user_id = $2
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(member)
}

/// Like [`find_membership`] but failing with "not enrolled" when absent.
pub async fn require_membership(
    pool: &PgPool,
    course_id: Uuid,
    user_id: Uuid,
) -> Result<CourseMember, AppError> {
    find_membership(pool, course_id, user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("You are not enrolled in this course".to_string()))
}
