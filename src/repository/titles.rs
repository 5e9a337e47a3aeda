//! Titles repository for database operations

use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        taxonomy::{Category, Genre, TaggedRelated},
        title::{TitleQuery, TitleRead},
    },
};

/// Flat row produced by the title read query
#[derive(Debug, FromRow)]
struct TitleReadRow {
    id: i32,
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<i32>,
    category_name: Option<String>,
    category_slug: Option<String>,
    rating: Option<f64>,
}

const TITLE_READ_SELECT: &str = r#"
    SELECT t.id, t.name, t.year, t.description, t.category_id,
           c.name AS category_name, c.slug AS category_slug,
           AVG(r.score)::float8 AS rating
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id
    LEFT JOIN reviews r ON r.title_id = t.id
"#;

#[derive(Clone)]
pub struct TitlesRepository {
    pool: Pool<Postgres>,
}

impl TitlesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search titles with filters and pagination
    pub async fn search(&self, query: &TitleQuery) -> AppResult<(Vec<TitleRead>, i64)> {
        let (limit, offset) = crate::models::page_bounds(query.limit, query.offset);

        let (where_clause, params) = build_filters(query);

        let count_query = format!("SELECT COUNT(*) FROM titles t {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = match param {
                SearchParam::Text(s) => count_builder.bind(s),
                SearchParam::Int(i) => count_builder.bind(i),
            };
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "{} {} GROUP BY t.id, c.id ORDER BY t.year, t.name LIMIT {} OFFSET {}",
            TITLE_READ_SELECT, where_clause, limit, offset
        );
        let mut select_builder = sqlx::query_as::<_, TitleReadRow>(&select_query);
        for param in &params {
            select_builder = match param {
                SearchParam::Text(s) => select_builder.bind(s),
                SearchParam::Int(i) => select_builder.bind(i),
            };
        }
        let rows = select_builder.fetch_all(&self.pool).await?;

        let mut titles = Vec::with_capacity(rows.len());
        for row in rows {
            let genres = self.genres_for_title(row.id).await?;
            titles.push(assemble(row, genres));
        }
        Ok((titles, total))
    }

    /// Get the read representation of a title
    pub async fn get_read(&self, id: i32) -> AppResult<TitleRead> {
        let query = format!("{} WHERE t.id = $1 GROUP BY t.id, c.id", TITLE_READ_SELECT);
        let row = sqlx::query_as::<_, TitleReadRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Title with id {} not found", id)))?;

        let genres = self.genres_for_title(row.id).await?;
        Ok(assemble(row, genres))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Insert a title and return its id
    pub async fn create(
        &self,
        name: &str,
        year: i32,
        description: Option<&str>,
        category_id: Option<i32>,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(year)
        .bind(description)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Partial update; absent fields keep their stored values
    pub async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        year: Option<i32>,
        description: Option<&str>,
        category_id: Option<i32>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(year)
        .bind(description)
        .bind(category_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Title with id {} not found", id)));
        }
        Ok(())
    }

    /// Replace the genre set of a title
    pub async fn set_genres(&self, title_id: i32, genre_ids: &[i32]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title_id)
            .execute(&mut *tx)
            .await?;
        for genre_id in genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(title_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Delete a title; reviews and their comments cascade at the store level
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Title with id {} not found", id)));
        }
        Ok(())
    }

    async fn genres_for_title(&self, title_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.name, g.slug FROM title_genres tg \
             JOIN genres g ON g.id = tg.genre_id WHERE tg.title_id = $1 ORDER BY g.name",
        )
        .bind(title_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }
}

/// Typed filter parameter, bound in push order
#[derive(Debug, PartialEq)]
enum SearchParam {
    Text(String),
    Int(i32),
}

/// Build the WHERE clause with numbered binds matching the returned params
fn build_filters(query: &TitleQuery) -> (String, Vec<SearchParam>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(ref name) = query.name {
        params.push(SearchParam::Text(format!("%{}%", name)));
        conditions.push(format!("t.name ILIKE ${}", params.len()));
    }
    if let Some(ref category) = query.category {
        params.push(SearchParam::Text(category.clone()));
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM categories cf WHERE cf.id = t.category_id AND cf.slug = ${})",
            params.len()
        ));
    }
    if let Some(ref genre) = query.genre {
        params.push(SearchParam::Text(genre.clone()));
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
             WHERE tg.title_id = t.id AND g.slug = ${})",
            params.len()
        ));
    }
    if let Some(year) = query.year {
        params.push(SearchParam::Int(year));
        conditions.push(format!("t.year = ${}", params.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, params)
}

fn assemble(row: TitleReadRow, genres: Vec<Genre>) -> TitleRead {
    let category = match (row.category_id, row.category_name, row.category_slug) {
        (Some(id), Some(name), Some(slug)) => {
            Some(TaggedRelated::Category(Category { id, name, slug }))
        }
        _ => None,
    };
    TitleRead {
        id: row.id,
        name: row.name,
        year: row.year,
        description: row.description,
        rating: row.rating,
        category,
        genre: genres.into_iter().map(TaggedRelated::Genre).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(year: Option<i32>, name: Option<&str>) -> TitleQuery {
        TitleQuery {
            name: name.map(String::from),
            category: None,
            genre: None,
            year,
            limit: None,
            offset: None,
        }
    }

    #[test]
    fn year_filter_is_bound_not_inlined() {
        let (clause, params) = build_filters(&query(Some(1972), None));
        assert_eq!(clause, "WHERE t.year = $1");
        assert_eq!(params, vec![SearchParam::Int(1972)]);
        assert!(!clause.contains("1972"));
    }

    #[test]
    fn placeholders_match_param_order() {
        let (clause, params) = build_filters(&query(Some(1972), Some("solaris")));
        assert_eq!(clause, "WHERE t.name ILIKE $1 AND t.year = $2");
        assert_eq!(
            params,
            vec![
                SearchParam::Text("%solaris%".to_string()),
                SearchParam::Int(1972),
            ]
        );
    }

    #[test]
    fn no_filters_yields_empty_clause() {
        let (clause, params) = build_filters(&query(None, None));
        assert!(clause.is_empty());
        assert!(params.is_empty());
    }
}
