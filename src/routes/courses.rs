use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{authz, JwtClaims},
    errors::{AppError, Result},
    models::{CertificateResponse, ContentResponse, CourseResponse},
    routes::MessageResponse,
    state::AppState,
};

/// Page-number pagination for course listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CoursePage {
    pub items: Vec<CourseResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
pub struct BatchEnrollRequest {
    pub student_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CourseAnalyticsResponse {
    pub total_members: i64,
    pub total_contents: i64,
    pub total_comments: i64,
}

/// List courses taught by the caller, newest first
pub async fn list_my_courses(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * page_size;

    let items = sqlx::query_as::<_, CourseResponse>(
        r#"
        SELECT c.id, c.name, c.description, c.price, c.image_url,
               c.teacher_id, u.username AS teacher_username,
               c.max_students, c.created_at, c.updated_at
        FROM courses c
        JOIN users u ON u.id = c.teacher_id
        WHERE c.teacher_id = $1
        ORDER BY c.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(page_size)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE teacher_id = $1")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;

    Ok(Json(CoursePage {
        items,
        total,
        page,
        page_size,
    }))
}

/// Enroll a batch of students into a course the caller teaches.
///
/// Runs in one transaction with the course row locked, so concurrent
/// batches cannot over-fill the quota. Unknown ids and existing members
/// are skipped; enrollment stops once the quota is reached.
pub async fn batch_enroll_students(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<BatchEnrollRequest>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let mut tx = state.pool.begin().await?;

    let course = sqlx::query_as::<_, crate::models::Course>(
        r#"
        SELECT id, name, description, price, image_url, teacher_id,
               max_students, created_at, updated_at
        FROM courses
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(course_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if course.teacher_id != user_id {
        return Err(AppError::Forbidden(
            "You are not the teacher of this course".to_string(),
        ));
    }

    let current_members =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_members WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&mut *tx)
            .await?;

    let mut remaining = course.remaining_slots(current_members);
    if remaining == 0 {
        return Err(AppError::Conflict("Course quota is already full".to_string()));
    }

    let mut enrolled: Vec<String> = Vec::new();
    for student_id in &payload.student_ids {
        if remaining == 0 {
            break;
        }

        let username =
            sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = $1")
                .bind(student_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(username) = username else {
            continue; // unknown id, skip
        };

        let already_member = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM course_members WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_member {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO course_members (id, course_id, user_id, role)
            VALUES ($1, $2, $3, 'student')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(course_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        enrolled.push(username);
        remaining -= 1;
    }

    tx.commit().await?;

    tracing::info!(%course_id, count = enrolled.len(), "batch enrolled students");

    Ok(Json(MessageResponse::new(format!(
        "{} students enrolled: {}",
        enrolled.len(),
        enrolled.join(", ")
    ))))
}

/// Aggregate counts for a course, visible to its teacher only
pub async fn course_analytics(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    authz::require_course_teacher(&state.pool, course_id, user_id).await?;

    let total_members =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_members WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&state.pool)
            .await?;

    let total_contents =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_contents WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&state.pool)
            .await?;

    let total_comments = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM comments cm
        JOIN course_contents cc ON cc.id = cm.content_id
        WHERE cc.course_id = $1
        "#,
    )
    .bind(course_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(CourseAnalyticsResponse {
        total_members,
        total_contents,
        total_comments,
    }))
}

/// Issue a certificate iff the caller completed every content in the course
pub async fn get_certificate(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let member = authz::require_membership(&state.pool, course_id, user_id).await?;

    let total_contents =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_contents WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&state.pool)
            .await?;

    if total_contents == 0 {
        return Err(AppError::BadRequest("Course has no content yet".to_string()));
    }

    let completed = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM content_completions WHERE member_id = $1",
    )
    .bind(member.id)
    .fetch_one(&state.pool)
    .await?;

    if completed < total_contents {
        return Err(AppError::BadRequest(
            "You have not completed all contents".to_string(),
        ));
    }

    let course_name = sqlx::query_scalar::<_, String>("SELECT name FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(CertificateResponse {
        username: claims.username,
        course_name,
        issued_date: Utc::now(),
    }))
}

/// Contents the caller has completed in this course.
/// A caller who is not a member gets an empty list, not an error.
pub async fn show_course_completion(
    Extension(claims): Extension<JwtClaims>,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = Uuid::parse_str(&claims.sub)?;

    let Some(member) = authz::find_membership(&state.pool, course_id, user_id).await? else {
        return Ok(Json(Vec::<ContentResponse>::new()));
    };

    let contents = sqlx::query_as::<_, ContentResponse>(
        r#"
        SELECT cc.id, cc.course_id, cc.name, cc.description, cc.video_url, cc.file_url,
               cc.available_from, cc.available_to, cc.created_at, cc.updated_at
        FROM content_completions comp
        JOIN course_contents cc ON cc.id = comp.content_id
        WHERE comp.member_id = $1
        ORDER BY comp.completed_at DESC
        "#,
    )
    .bind(member.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(contents))
}
