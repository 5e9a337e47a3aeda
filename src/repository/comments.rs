//! Comments repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::comment::CommentRecord,
};

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.review_id, c.author_id, u.username AS author_username,
           c.text, c.pub_date
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List comments of a review, newest first
    pub async fn list_for_review(
        &self,
        review_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<CommentRecord>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "{} WHERE c.review_id = $1 ORDER BY c.pub_date DESC LIMIT $2 OFFSET $3",
            COMMENT_SELECT
        );
        let comments = sqlx::query_as::<_, CommentRecord>(&query)
            .bind(review_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((comments, total))
    }

    /// Get a comment scoped to its review
    pub async fn get(&self, review_id: i32, comment_id: i32) -> AppResult<CommentRecord> {
        let query = format!("{} WHERE c.id = $1 AND c.review_id = $2", COMMENT_SELECT);
        sqlx::query_as::<_, CommentRecord>(&query)
            .bind(comment_id)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Comment {} not found for review {}",
                    comment_id, review_id
                ))
            })
    }

    pub async fn create(
        &self,
        review_id: i32,
        author_id: i32,
        text: &str,
    ) -> AppResult<CommentRecord> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO comments (review_id, author_id, text) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(review_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        self.get(review_id, id).await
    }

    /// Partial update; pub_date is immutable
    pub async fn update(&self, comment_id: i32, text: Option<&str>) -> AppResult<()> {
        sqlx::query("UPDATE comments SET text = COALESCE($2, text) WHERE id = $1")
            .bind(comment_id)
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, comment_id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
