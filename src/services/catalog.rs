//! Catalog service: titles, categories and genres

use chrono::Datelike;

use crate::{
    error::{AppError, AppResult},
    models::{
        taxonomy::{Category, CreateTagged, Genre, TaggedQuery},
        title::{CreateTitle, TitleQuery, TitleRead, UpdateTitle},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // --- Titles ---

    pub async fn search_titles(&self, query: &TitleQuery) -> AppResult<(Vec<TitleRead>, i64)> {
        self.repository.titles.search(query).await
    }

    pub async fn get_title(&self, id: i32) -> AppResult<TitleRead> {
        self.repository.titles.get_read(id).await
    }

    pub async fn create_title(&self, title: CreateTitle) -> AppResult<TitleRead> {
        validate_year(title.year)?;

        let category_id = match title.category.as_deref() {
            Some(slug) => Some(self.resolve_category(slug).await?.id),
            None => None,
        };
        let genre_ids = self.resolve_genres(&title.genre).await?;

        let id = self
            .repository
            .titles
            .create(&title.name, title.year, title.description.as_deref(), category_id)
            .await?;
        self.repository.titles.set_genres(id, &genre_ids).await?;

        self.repository.titles.get_read(id).await
    }

    pub async fn update_title(&self, id: i32, update: UpdateTitle) -> AppResult<TitleRead> {
        if let Some(year) = update.year {
            validate_year(year)?;
        }

        let category_id = match update.category.as_deref() {
            Some(slug) => Some(self.resolve_category(slug).await?.id),
            None => None,
        };

        self.repository
            .titles
            .update(
                id,
                update.name.as_deref(),
                update.year,
                update.description.as_deref(),
                category_id,
            )
            .await?;

        if let Some(ref slugs) = update.genre {
            let genre_ids = self.resolve_genres(slugs).await?;
            self.repository.titles.set_genres(id, &genre_ids).await?;
        }

        self.repository.titles.get_read(id).await
    }

    pub async fn delete_title(&self, id: i32) -> AppResult<()> {
        self.repository.titles.delete(id).await
    }

    async fn resolve_category(&self, slug: &str) -> AppResult<Category> {
        self.repository
            .taxonomy
            .categories_find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown category slug: {}", slug)))
    }

    async fn resolve_genres(&self, slugs: &[String]) -> AppResult<Vec<i32>> {
        let mut unique: Vec<String> = slugs.to_vec();
        unique.sort();
        unique.dedup();
        let genres = self.repository.taxonomy.genres_find_by_slugs(&unique).await?;
        Ok(genres.into_iter().map(|g| g.id).collect())
    }

    // --- Categories ---

    pub async fn list_categories(&self, query: &TaggedQuery) -> AppResult<(Vec<Category>, i64)> {
        self.repository.taxonomy.categories_list(query).await
    }

    pub async fn create_category(&self, tagged: CreateTagged) -> AppResult<Category> {
        self.repository.taxonomy.categories_create(&tagged).await
    }

    pub async fn delete_category(&self, slug: &str) -> AppResult<()> {
        self.repository.taxonomy.categories_delete(slug).await
    }

    // --- Genres ---

    pub async fn list_genres(&self, query: &TaggedQuery) -> AppResult<(Vec<Genre>, i64)> {
        self.repository.taxonomy.genres_list(query).await
    }

    pub async fn create_genre(&self, tagged: CreateTagged) -> AppResult<Genre> {
        self.repository.taxonomy.genres_create(&tagged).await
    }

    pub async fn delete_genre(&self, slug: &str) -> AppResult<()> {
        self.repository.taxonomy.genres_delete(slug).await
    }
}

/// Release year must be positive and not in the future
fn validate_year(year: i32) -> AppResult<()> {
    let current_year = chrono::Utc::now().year();
    if year <= 0 || year > current_year {
        return Err(AppError::Validation("Year is invalid.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_year_rejected() {
        let next_year = chrono::Utc::now().year() + 1;
        assert!(validate_year(next_year).is_err());
    }

    #[test]
    fn current_year_accepted() {
        assert!(validate_year(chrono::Utc::now().year()).is_ok());
        assert!(validate_year(1895).is_ok());
    }

    #[test]
    fn non_positive_year_rejected() {
        assert!(validate_year(0).is_err());
        assert!(validate_year(-44).is_err());
    }
}
