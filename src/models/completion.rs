use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Marks that a member finished a content item. Immutable once created:
/// the only operations are create and delete, unique per (member, content).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContentCompletion {
    pub id: Uuid,
    pub member_id: Uuid,
    pub content_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

/// Proof that a member completed every content in a course
#[derive(Debug, Serialize)]
pub struct CertificateResponse {
    pub username: String,
    pub course_name: String,
    pub issued_date: DateTime<Utc>,
}
