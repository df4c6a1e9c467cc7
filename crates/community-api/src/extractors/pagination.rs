//! Pagination extractor
//!
//! Offset pagination from `?page=&per_page=`, clamped to the repository
//! limits.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use community_core::Page;
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Default, Deserialize)]
struct PaginationParams {
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    per_page: Option<i64>,
}

/// Validated pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: i64,
    /// Page size, 1..=`Page::MAX_SIZE`
    pub per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Page::DEFAULT_SIZE,
        }
    }
}

impl Pagination {
    /// Repository window for this page
    pub fn window(self) -> Page {
        Page::new(self.page, self.per_page)
    }
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self {
            page: params.page.unwrap_or(1).max(1),
            per_page: params
                .per_page
                .unwrap_or(Page::DEFAULT_SIZE)
                .clamp(1, Page::MAX_SIZE),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(Pagination::from(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination() {
        let pagination = Pagination::from(PaginationParams::default());
        assert_eq!(pagination, Pagination::default());
        assert_eq!(pagination.per_page, 10);
    }

    #[test]
    fn test_clamping() {
        let pagination = Pagination::from(PaginationParams {
            page: Some(0),
            per_page: Some(500),
        });
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, Page::MAX_SIZE);

        let pagination = Pagination::from(PaginationParams {
            page: Some(3),
            per_page: Some(0),
        });
        assert_eq!(pagination.per_page, 1);
    }

    #[test]
    fn test_window_offset() {
        let window = Pagination {
            page: 3,
            per_page: 20,
        }
        .window();
        assert_eq!(window.offset, 40);
        assert_eq!(window.limit, 20);
    }
}
