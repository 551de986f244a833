use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::JwtClaims,
    db,
    errors::{AppError, Result},
    models::{CourseResponse, User, UserResponse},
    routes::MessageResponse,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_courses_as_student: i64,
    pub total_courses_as_teacher: i64,
    pub total_comments: i64,
    pub total_completions: i64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: String,
    pub photo_url: Option<String>,
    pub courses_created: Vec<CourseResponse>,
    pub courses_joined: Vec<CourseResponse>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// All regular user identities (staff and superusers excluded)
pub async fn list_students(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let students = sqlx::query_as::<_, UserResponse>(
        r#"
        SELECT id, username, email, first_name, last_name
        FROM users
        WHERE NOT is_staff AND NOT is_superuser
        ORDER BY username
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(students))
}

/// Activity counts for the caller
pub async fn user_dashboard(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let total_courses_as_student =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_members WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;

    let total_courses_as_teacher =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE teacher_id = $1")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;

    let total_comments = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM comments cm
        JOIN course_members m ON m.id = cm.member_id
        WHERE m.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(&state.pool)
    .await?;

    let total_completions = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM content_completions comp
        JOIN course_members m ON m.id = comp.member_id
        WHERE m.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(DashboardResponse {
        total_courses_as_student,
        total_courses_as_teacher,
        total_comments,
        total_completions,
    }))
}

/// Show a user's profile plus the courses they teach and the ones they
/// joined (taught courses excluded from the joined list)
pub async fn show_profile(
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, first_name, last_name, is_staff, is_superuser,
               created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(target_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let profile = db::ensure_profile(&state.pool, user.id).await?;

    let courses_created = sqlx::query_as::<_, CourseResponse>(
        r#"
        SELECT c.id, c.name, c.description, c.price, c.image_url,
               c.teacher_id, u.username AS teacher_username,
               c.max_students, c.created_at, c.updated_at
        FROM courses c
        JOIN users u ON u.id = c.teacher_id
        WHERE c.teacher_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;

    let courses_joined = sqlx::query_as::<_, CourseResponse>(
        r#"
        SELECT c.id, c.name, c.description, c.price, c.image_url,
               c.teacher_id, u.username AS teacher_username,
               c.max_students, c.created_at, c.updated_at
        FROM course_members m
        JOIN courses c ON c.id = m.course_id
        JOIN users u ON u.id = c.teacher_id
        WHERE m.user_id = $1 AND c.teacher_id <> $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ProfileResponse {
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        phone: profile.phone,
        description: profile.description,
        photo_url: profile.photo_url,
        courses_created,
        courses_joined,
    }))
}

/// Update the caller's own profile. Only non-empty supplied fields
/// overwrite; an empty string counts as absent.
pub async fn update_profile(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    // Provision the profile row before updating it
    db::ensure_profile(&state.pool, user_id).await?;

    let mut tx = state.pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            email = COALESCE($4, email),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(non_empty(payload.first_name))
    .bind(non_empty(payload.last_name))
    .bind(non_empty(payload.email))
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    sqlx::query(
        r#"
        UPDATE user_profiles
        SET phone = COALESCE($2, phone),
            description = COALESCE($3, description)
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(non_empty(payload.phone))
    .bind(non_empty(payload.description))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(MessageResponse::new("Profile updated")))
}

/// Treats empty and whitespace-only strings as "not supplied"
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_drops_blank_values() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
    }

    #[test]
    fn non_empty_keeps_real_values() {
        assert_eq!(
            non_empty(Some("Ada".to_string())),
            Some("Ada".to_string())
        );
    }
}
