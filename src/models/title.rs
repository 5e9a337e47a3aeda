//! Title (reviewable work) model and related types

use serde::{Deserialize, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::taxonomy::TaggedRelated;

/// Read representation: nested reference data plus the derived rating
#[derive(Debug, Serialize, ToSchema)]
pub struct TitleRead {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    /// Average review score; absent when the title has no reviews.
    /// Whole averages render as integers, others with two decimals.
    #[serde(serialize_with = "serialize_rating")]
    #[schema(value_type = Option<f64>)]
    pub rating: Option<f64>,
    #[schema(value_type = Option<Object>)]
    pub category: Option<TaggedRelated>,
    #[schema(value_type = Vec<Object>)]
    pub genre: Vec<TaggedRelated>,
}

fn serialize_rating<S: Serializer>(rating: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match rating {
        None => serializer.serialize_none(),
        Some(avg) if avg.fract() == 0.0 => serializer.serialize_i64(*avg as i64),
        Some(avg) => serializer.serialize_f64((avg * 100.0).round() / 100.0),
    }
}

/// Create title request; category and genres are referenced by slug
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTitle {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,
    pub year: i32,
    #[validate(length(max = 254, message = "Description must be at most 254 characters"))]
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Partial update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTitle {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: Option<String>,
    pub year: Option<i32>,
    #[validate(length(max = 254, message = "Description must be at most 254 characters"))]
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

/// Title query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct TitleQuery {
    /// Substring match on name
    pub name: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Genre slug
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::taxonomy::Genre;

    fn title(rating: Option<f64>) -> TitleRead {
        TitleRead {
            id: 1,
            name: "Solaris".to_string(),
            year: 1972,
            description: None,
            rating,
            category: None,
            genre: vec![TaggedRelated::Genre(Genre {
                id: 1,
                name: "Drama".to_string(),
                slug: "drama".to_string(),
            })],
        }
    }

    #[test]
    fn whole_rating_serializes_as_integer() {
        let json = serde_json::to_value(title(Some(9.0))).unwrap();
        assert_eq!(json["rating"], serde_json::json!(9));
    }

    #[test]
    fn fractional_rating_keeps_two_decimals() {
        // [8, 9, 9] -> 8.666... -> 8.67
        let json = serde_json::to_value(title(Some(26.0 / 3.0))).unwrap();
        assert_eq!(json["rating"], serde_json::json!(8.67));
    }

    #[test]
    fn missing_rating_serializes_as_null() {
        let json = serde_json::to_value(title(None)).unwrap();
        assert!(json["rating"].is_null());
    }

    #[test]
    fn genres_render_nested() {
        let json = serde_json::to_value(title(None)).unwrap();
        assert_eq!(json["genre"][0]["slug"], "drama");
    }
}
