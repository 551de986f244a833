use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A comment on a course content, authored by a course member.
/// Keying on the membership rather than the raw user enforces
/// "only enrolled members may comment" at the data level.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content_id: Uuid,
    pub member_id: Uuid,
    pub body: String,
    pub is_moderated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment joined with its author, as returned by listings
#[derive(Debug, Serialize, FromRow)]
pub struct CommentResponse {
    pub id: Uuid,
    pub content_id: Uuid,
    pub member_id: Uuid,
    pub author_username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
