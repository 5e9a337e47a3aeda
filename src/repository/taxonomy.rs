//! Categories and genres repository.
//!
//! Both tables share the same (name, slug) shape, so the queries are built
//! once against a table name and exposed per entity.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::taxonomy::{Category, CreateTagged, Genre, TaggedQuery},
};

#[derive(Clone)]
pub struct TaxonomyRepository {
    pool: Pool<Postgres>,
}

impl TaxonomyRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn list<T>(&self, table: &str, query: &TaggedQuery) -> AppResult<(Vec<T>, i64)>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let (limit, offset) = crate::models::page_bounds(query.limit, query.offset);
        let pattern = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let count = format!("SELECT COUNT(*) FROM {} WHERE name ILIKE $1", table);
        let total: i64 = sqlx::query_scalar(&count)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let select = format!(
            "SELECT id, name, slug FROM {} WHERE name ILIKE $1 ORDER BY name LIMIT $2 OFFSET $3",
            table
        );
        let rows = sqlx::query_as::<_, T>(&select)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn create<T>(&self, table: &str, tagged: &CreateTagged) -> AppResult<T>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let insert = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
            table
        );
        sqlx::query_as::<_, T>(&insert)
            .bind(&tagged.name)
            .bind(&tagged.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::on_unique_violation(e, "Slug is already taken."))
    }

    async fn delete_by_slug(&self, table: &str, slug: &str) -> AppResult<()> {
        let delete = format!("DELETE FROM {} WHERE slug = $1", table);
        let result = sqlx::query(&delete).bind(slug).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Slug {} not found", slug)));
        }
        Ok(())
    }

    // --- Categories ---

    pub async fn categories_list(&self, query: &TaggedQuery) -> AppResult<(Vec<Category>, i64)> {
        self.list("categories", query).await
    }

    pub async fn categories_create(&self, tagged: &CreateTagged) -> AppResult<Category> {
        self.create("categories", tagged).await
    }

    pub async fn categories_delete(&self, slug: &str) -> AppResult<()> {
        self.delete_by_slug("categories", slug).await
    }

    pub async fn categories_find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    // --- Genres ---

    pub async fn genres_list(&self, query: &TaggedQuery) -> AppResult<(Vec<Genre>, i64)> {
        self.list("genres", query).await
    }

    pub async fn genres_create(&self, tagged: &CreateTagged) -> AppResult<Genre> {
        self.create("genres", tagged).await
    }

    pub async fn genres_delete(&self, slug: &str) -> AppResult<()> {
        self.delete_by_slug("genres", slug).await
    }

    /// Resolve a set of genre slugs; every slug must exist
    pub async fn genres_find_by_slugs(&self, slugs: &[String]) -> AppResult<Vec<Genre>> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let genres = sqlx::query_as::<_, Genre>(
            "SELECT id, name, slug FROM genres WHERE slug = ANY($1) ORDER BY name",
        )
        .bind(slugs)
        .fetch_all(&self.pool)
        .await?;

        if genres.len() != slugs.len() {
            let found: Vec<&str> = genres.iter().map(|g| g.slug.as_str()).collect();
            let missing: Vec<&str> = slugs
                .iter()
                .map(|s| s.as_str())
                .filter(|s| !found.contains(s))
                .collect();
            return Err(AppError::Validation(format!(
                "Unknown genre slug(s): {}",
                missing.join(", ")
            )));
        }
        Ok(genres)
    }
}
