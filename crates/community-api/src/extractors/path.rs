//! Path parameter extractors
//!
//! Snowflake ids are parsed here so handlers never see raw strings. A bad
//! id names the offending parameter in the 400 response.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use community_core::Snowflake;

use crate::response::ApiError;

async fn snowflakes<S>(parts: &mut Parts, state: &S) -> Result<Vec<Snowflake>, ApiError>
where
    S: Send + Sync,
{
    let Path(params) = Path::<Vec<(String, String)>>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::invalid_path(e.to_string()))?;

    params
        .iter()
        .map(|(name, value)| {
            Snowflake::parse(value)
                .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
        })
        .collect()
}

/// The single id in a route such as `/groups/:group_id`
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match snowflakes(parts, state).await?.as_slice() {
            [id] => Ok(PathId(*id)),
            _ => Err(ApiError::invalid_path("Expected one id")),
        }
    }
}

/// Both ids in a route such as `/groups/:group_id/members/:account_id`,
/// in path order
#[derive(Debug, Clone, Copy)]
pub struct PathIds(pub Snowflake, pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for PathIds
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match snowflakes(parts, state).await?.as_slice() {
            [first, second] => Ok(PathIds(*first, *second)),
            _ => Err(ApiError::invalid_path("Expected two ids")),
        }
    }
}
