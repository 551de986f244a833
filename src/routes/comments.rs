use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    auth::JwtClaims,
    errors::{AppError, Result},
    models::CommentResponse,
    routes::MessageResponse,
    state::AppState,
};

/// Moderated comments for a content item, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let comments = sqlx::query_as::<_, CommentResponse>(
        r#"
        SELECT cm.id, cm.content_id, cm.member_id, u.username AS author_username,
               cm.body, cm.created_at, cm.updated_at
        FROM comments cm
        JOIN course_members m ON m.id = cm.member_id
        JOIN users u ON u.id = m.user_id
        WHERE cm.content_id = $1 AND cm.is_moderated
        ORDER BY cm.created_at
        "#,
    )
    .bind(content_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(comments))
}

#[derive(Debug, FromRow)]
struct CommentOwnership {
    is_moderated: bool,
    teacher_id: Uuid,
}

/// Approve a comment for public visibility.
/// Only the teacher of the course the comment belongs to may moderate.
pub async fn moderate_comment(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let ownership = sqlx::query_as::<_, CommentOwnership>(
        r#"
        SELECT cm.is_moderated, co.teacher_id
        FROM comments cm
        JOIN course_contents cc ON cc.id = cm.content_id
        JOIN courses co ON co.id = cc.course_id
        WHERE cm.id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if ownership.teacher_id != user_id {
        return Err(AppError::Forbidden(
            "You are not the teacher of this course".to_string(),
        ));
    }

    if !ownership.is_moderated {
        sqlx::query("UPDATE comments SET is_moderated = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(comment_id)
            .execute(&state.pool)
            .await?;
    }

    Ok(Json(MessageResponse::new("Comment moderated")))
}
