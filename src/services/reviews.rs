//! Reviews and comments service.
//!
//! Both resource kinds are nested: reviews under a title, comments under a
//! (title, review) pair. Parent resolution failure is NotFound, not a
//! validation error.

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{CommentRecord, CreateComment, UpdateComment},
        review::{CreateReview, ReviewRecord, UpdateReview},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
}

impl ReviewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn require_title(&self, title_id: i32) -> AppResult<()> {
        if !self.repository.titles.exists(title_id).await? {
            return Err(AppError::NotFound(format!(
                "Title with id {} not found",
                title_id
            )));
        }
        Ok(())
    }

    // --- Reviews ---

    pub async fn list_reviews(
        &self,
        title_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<ReviewRecord>, i64)> {
        self.require_title(title_id).await?;
        self.repository
            .reviews
            .list_for_title(title_id, limit, offset)
            .await
    }

    pub async fn get_review(&self, title_id: i32, review_id: i32) -> AppResult<ReviewRecord> {
        self.require_title(title_id).await?;
        self.repository.reviews.get(title_id, review_id).await
    }

    /// Create a review; at most one per (title, author)
    pub async fn create_review(
        &self,
        title_id: i32,
        author_id: i32,
        review: CreateReview,
    ) -> AppResult<ReviewRecord> {
        self.require_title(title_id).await?;

        if self
            .repository
            .reviews
            .exists_for_author(title_id, author_id)
            .await?
        {
            return Err(AppError::Validation(
                "Not allowed to create multiple reviews.".to_string(),
            ));
        }

        self.repository
            .reviews
            .create(title_id, author_id, &review.text, review.score)
            .await
    }

    pub async fn update_review(
        &self,
        title_id: i32,
        review_id: i32,
        update: UpdateReview,
    ) -> AppResult<ReviewRecord> {
        let review = self.get_review(title_id, review_id).await?;
        self.repository
            .reviews
            .update(review.id, update.text.as_deref(), update.score)
            .await?;
        self.repository.reviews.get(title_id, review_id).await
    }

    pub async fn delete_review(&self, title_id: i32, review_id: i32) -> AppResult<()> {
        let review = self.get_review(title_id, review_id).await?;
        self.repository.reviews.delete(review.id).await
    }

    // --- Comments ---

    pub async fn list_comments(
        &self,
        title_id: i32,
        review_id: i32,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<CommentRecord>, i64)> {
        let review = self.get_review(title_id, review_id).await?;
        self.repository
            .comments
            .list_for_review(review.id, limit, offset)
            .await
    }

    pub async fn get_comment(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
    ) -> AppResult<CommentRecord> {
        let review = self.get_review(title_id, review_id).await?;
        self.repository.comments.get(review.id, comment_id).await
    }

    pub async fn create_comment(
        &self,
        title_id: i32,
        review_id: i32,
        author_id: i32,
        comment: CreateComment,
    ) -> AppResult<CommentRecord> {
        let review = self.get_review(title_id, review_id).await?;
        self.repository
            .comments
            .create(review.id, author_id, &comment.text)
            .await
    }

    pub async fn update_comment(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
        update: UpdateComment,
    ) -> AppResult<CommentRecord> {
        let comment = self.get_comment(title_id, review_id, comment_id).await?;
        self.repository
            .comments
            .update(comment.id, update.text.as_deref())
            .await?;
        self.repository.comments.get(comment.review_id, comment.id).await
    }

    pub async fn delete_comment(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
    ) -> AppResult<()> {
        let comment = self.get_comment(title_id, review_id, comment_id).await?;
        self.repository.comments.delete(comment.id).await
    }
}
