//! Data models for Critica

pub mod comment;
pub mod review;
pub mod taxonomy;
pub mod title;
pub mod user;

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

// Re-export commonly used types
pub use comment::{CommentRead, CommentRecord};
pub use review::{ReviewRead, ReviewRecord};
pub use taxonomy::{Category, Genre, TaggedRelated};
pub use title::TitleRead;
pub use user::{Role, User, UserClaims};

/// Limit/offset query parameters shared by nested list endpoints
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp client-supplied paging to sane bounds. Every list endpoint goes
/// through here so the SQL never sees a negative LIMIT or OFFSET and the
/// response metadata always matches the page served.
pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

impl PageQuery {
    pub fn bounds(&self) -> (i64, i64) {
        page_bounds(self.limit, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_clamped() {
        let q = PageQuery {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(q.bounds(), (MAX_PAGE_LIMIT, 0));

        let q = PageQuery {
            limit: None,
            offset: None,
        };
        assert_eq!(q.bounds(), (DEFAULT_PAGE_LIMIT, 0));
    }

    #[test]
    fn negative_limit_never_reaches_sql() {
        assert_eq!(page_bounds(Some(-1), None), (1, 0));
        assert_eq!(page_bounds(Some(0), Some(-100)), (1, 0));
    }
}
