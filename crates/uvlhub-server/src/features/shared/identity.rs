//! Request identity
//!
//! The hub sits behind an auth layer that stamps requests with an
//! `x-user-id` header. [`CurrentUser`] rejects requests without one;
//! [`MaybeUser`] is for endpoints that also serve anonymous visitors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::api::response::AppError;

const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller. Rejects with 401 when the header is missing.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

/// Caller identity when present; `None` for anonymous requests.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<i64>);

fn user_id_from(parts: &Parts) -> Option<i64> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_id_from(parts).map(CurrentUser).ok_or_else(|| {
            AppError::Unauthorized("Missing or invalid x-user-id header".to_string())
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(user_id_from(parts)))
    }
}
