//! Reviews repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::review::ReviewRecord,
};

const REVIEW_SELECT: &str = r#"
    SELECT r.id, r.title_id, r.author_id, u.username AS author_username,
           r.text, r.score, r.pub_date
    FROM reviews r
    JOIN users u ON u.id = r.author_id
"#;

#[derive(Clone)]
pub struct ReviewsRepository {
    pool: Pool<Postgres>,
}

impl ReviewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List reviews of a title, newest first
    pub async fn list_for_title(
        &self,
        title_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<ReviewRecord>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            "{} WHERE r.title_id = $1 ORDER BY r.pub_date DESC LIMIT $2 OFFSET $3",
            REVIEW_SELECT
        );
        let reviews = sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(title_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((reviews, total))
    }

    /// Get a review scoped to its title; a mismatched pair is NotFound
    pub async fn get(&self, title_id: i32, review_id: i32) -> AppResult<ReviewRecord> {
        let query = format!("{} WHERE r.id = $1 AND r.title_id = $2", REVIEW_SELECT);
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(review_id)
            .bind(title_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Review {} not found for title {}",
                    review_id, title_id
                ))
            })
    }

    /// Has this author already reviewed this title?
    pub async fn exists_for_author(&self, title_id: i32, author_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a review. The unique (title, author) constraint is the atomic
    /// backstop behind the service-level pre-check.
    pub async fn create(
        &self,
        title_id: i32,
        author_id: i32,
        text: &str,
        score: i16,
    ) -> AppResult<ReviewRecord> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO reviews (title_id, author_id, text, score) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(title_id)
        .bind(author_id)
        .bind(text)
        .bind(score)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::on_unique_violation(e, "Not allowed to create multiple reviews.")
        })?;

        self.get(title_id, id).await
    }

    /// Partial update; pub_date is immutable
    pub async fn update(
        &self,
        review_id: i32,
        text: Option<&str>,
        score: Option<i16>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE reviews SET text = COALESCE($2, text), score = COALESCE($3, score) \
             WHERE id = $1",
        )
        .bind(review_id)
        .bind(text)
        .bind(score)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a review; its comments cascade at the store level
    pub async fn delete(&self, review_id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
