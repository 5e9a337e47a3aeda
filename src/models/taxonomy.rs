//! Category and Genre reference data

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// URL-safe slug: letters, digits, hyphens and underscores
pub static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    #[serde(skip_serializing)]
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    #[serde(skip_serializing)]
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// Create request shared by categories and genres
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTagged {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
    #[validate(
        length(min = 1, max = 50, message = "Slug must be 1-50 characters"),
        regex(path = *SLUG_RE, message = "Slug may only contain letters, digits, hyphens and underscores")
    )]
    pub slug: String,
}

/// Query parameters for category/genre listings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TaggedQuery {
    /// Substring match on name
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Tagged reference data attached to a title. Serialization is resolved by an
/// explicit type switch; both variants render as `{name, slug}`.
#[derive(Debug, Clone, ToSchema)]
pub enum TaggedRelated {
    Category(Category),
    Genre(Genre),
}

impl Serialize for TaggedRelated {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TaggedRelated::Category(category) => category.serialize(serializer),
            TaggedRelated::Genre(genre) => genre.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_pattern() {
        assert!(SLUG_RE.is_match("sci-fi_2"));
        assert!(!SLUG_RE.is_match("sci fi"));
        assert!(!SLUG_RE.is_match("жанр"));
        assert!(!SLUG_RE.is_match(""));
    }

    #[test]
    fn tagged_serialization_hides_ids() {
        let genre = TaggedRelated::Genre(Genre {
            id: 3,
            name: "Drama".to_string(),
            slug: "drama".to_string(),
        });
        let json = serde_json::to_value(&genre).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Drama", "slug": "drama"}));

        let category = TaggedRelated::Category(Category {
            id: 1,
            name: "Films".to_string(),
            slug: "films".to_string(),
        });
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Films", "slug": "films"}));
    }
}
