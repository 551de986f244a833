use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{authz, JwtClaims},
    errors::{AppError, Result},
    models::{ContentResponse, CourseContent},
    routes::MessageResponse,
    state::AppState,
};

/// List contents of a course that are visible right now.
///
/// Release time must have passed and now must fall inside the
/// availability window; absent bounds are open.
pub async fn list_active_contents(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let contents = sqlx::query_as::<_, CourseContent>(
        r#"
        SELECT id, course_id, parent_id, name, description, video_url, file_url,
               release_time, available_from, available_to, created_at, updated_at
        FROM course_contents
        WHERE course_id = $1
        ORDER BY release_time
        "#,
    )
    .bind(course_id)
    .fetch_all(&state.pool)
    .await?;

    let now = Utc::now();
    let active: Vec<ContentResponse> = contents
        .into_iter()
        .filter(|c| c.is_active(now))
        .map(ContentResponse::from)
        .collect();

    Ok(Json(active))
}

async fn load_content(state: &AppState, content_id: Uuid) -> Result<CourseContent> {
    sqlx::query_as::<_, CourseContent>(
        r#"
        SELECT id, course_id, parent_id, name, description, video_url, file_url,
               release_time, available_from, available_to, created_at, updated_at
        FROM course_contents
        WHERE id = $1
        "#,
    )
    .bind(content_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Content not found".to_string()))
}

/// Mark a content as completed by the caller. Idempotent.
pub async fn complete_content(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let content = load_content(&state, content_id).await?;
    let member = authz::require_membership(&state.pool, content.course_id, user_id).await?;

    // get-or-create: completing twice leaves exactly one row
    sqlx::query(
        r#"
        INSERT INTO content_completions (id, member_id, content_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (member_id, content_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(member.id)
    .bind(content_id)
    .execute(&state.pool)
    .await?;

    Ok(Json(MessageResponse::new("Content marked as completed")))
}

/// Remove the caller's completion record for a content
pub async fn delete_completion(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let content = load_content(&state, content_id).await?;
    let member = authz::require_membership(&state.pool, content.course_id, user_id).await?;

    let result = sqlx::query(
        "DELETE FROM content_completions WHERE member_id = $1 AND content_id = $2",
    )
    .bind(member.id)
    .bind(content_id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Completion record not found".to_string(),
        ));
    }

    Ok(Json(MessageResponse::new("Completion deleted")))
}

/// All contents the caller has completed, across courses
pub async fn list_completed_contents(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let contents = sqlx::query_as::<_, ContentResponse>(
        r#"
        SELECT cc.id, cc.course_id, cc.name, cc.description, cc.video_url, cc.file_url,
               cc.available_from, cc.available_to, cc.created_at, cc.updated_at
        FROM content_completions comp
        JOIN course_members cm ON cm.id = comp.member_id
        JOIN course_contents cc ON cc.id = comp.content_id
        WHERE cm.user_id = $1
        ORDER BY comp.completed_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(contents))
}
