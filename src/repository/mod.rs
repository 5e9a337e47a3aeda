//! Repository layer for database operations

pub mod comments;
pub mod reviews;
pub mod taxonomy;
pub mod titles;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub titles: titles::TitlesRepository,
    pub reviews: reviews::ReviewsRepository,
    pub comments: comments::CommentsRepository,
    pub taxonomy: taxonomy::TaxonomyRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            titles: titles::TitlesRepository::new(pool.clone()),
            reviews: reviews::ReviewsRepository::new(pool.clone()),
            comments: comments::CommentsRepository::new(pool.clone()),
            taxonomy: taxonomy::TaxonomyRepository::new(pool.clone()),
            pool,
        }
    }
}
