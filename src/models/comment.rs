//! Comment model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Comment row joined with its author's username
#[derive(Debug, Clone, FromRow)]
pub struct CommentRecord {
    pub id: i32,
    pub review_id: i32,
    pub author_id: i32,
    pub author_username: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

/// Read representation: author serialized as username
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentRead {
    pub id: i32,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl From<CommentRecord> for CommentRead {
    fn from(record: CommentRecord) -> Self {
        CommentRead {
            id: record.id,
            text: record.text,
            author: record.author_username,
            pub_date: record.pub_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateComment {
    #[validate(length(min = 1, message = "Text must not be empty"))]
    pub text: Option<String>,
}
