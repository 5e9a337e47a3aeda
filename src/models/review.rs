//! Review model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Review row joined with its author's username
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRecord {
    pub id: i32,
    pub title_id: i32,
    pub author_id: i32,
    pub author_username: String,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

/// Read representation: author serialized as username
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewRead {
    pub id: i32,
    pub text: String,
    pub author: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

impl From<ReviewRecord> for ReviewRead {
    fn from(record: ReviewRecord) -> Self {
        ReviewRead {
            id: record.id,
            text: record.text,
            author: record.author_username,
            score: record.score,
            pub_date: record.pub_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: i16,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(length(min = 1, message = "Text must not be empty"))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn score_bounds_enforced() {
        let ok = CreateReview {
            text: "Fine".to_string(),
            score: 10,
        };
        assert!(ok.validate().is_ok());

        let too_high = CreateReview {
            text: "Fine".to_string(),
            score: 11,
        };
        assert!(too_high.validate().is_err());

        let too_low = CreateReview {
            text: "Fine".to_string(),
            score: 0,
        };
        assert!(too_low.validate().is_err());
    }

    #[test]
    fn author_serialized_as_username() {
        let read = ReviewRead::from(ReviewRecord {
            id: 1,
            title_id: 2,
            author_id: 3,
            author_username: "critic".to_string(),
            text: "Good".to_string(),
            score: 8,
            pub_date: Utc::now(),
        });
        let json = serde_json::to_value(&read).unwrap();
        assert_eq!(json["author"], "critic");
        assert!(json.get("author_id").is_none());
    }
}
