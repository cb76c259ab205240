use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::identity::{CurrentUser, MaybeUser};
use crate::features::shared::pagination::PaginationParams;

use super::commands::{edit, EditProfileError};
use super::commands::edit::EditProfileCommand;
use super::queries::{view, ViewProfileError};

pub fn profile_routes() -> Router<PgPool> {
    Router::new()
        .route("/profile/summary", get(profile_summary))
        .route("/profile/edit", put(edit_profile))
        .route("/profile/:user_id", get(view_profile))
}

#[tracing::instrument(skip(pool, params))]
async fn view_profile(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
    MaybeUser(viewer): MaybeUser,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ProfileApiError> {
    let page = view::handle(&pool, user_id, viewer, &params).await?;
    Ok(Json(ApiResponse::success(page)).into_response())
}

#[tracing::instrument(skip(pool, params), fields(user_id = user.0))]
async fn profile_summary(
    State(pool): State<PgPool>,
    user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ProfileApiError> {
    let page = view::summary(&pool, user.0, &params).await?;
    Ok(Json(ApiResponse::success(page)).into_response())
}

#[tracing::instrument(skip(pool, command), fields(user_id = user.0))]
async fn edit_profile(
    State(pool): State<PgPool>,
    user: CurrentUser,
    Json(command): Json<EditProfileCommand>,
) -> Result<Response, ProfileApiError> {
    let profile = edit::handle(&pool, user.0, command).await?;
    Ok(Json(ApiResponse::success(profile)).into_response())
}

#[derive(Debug, thiserror::Error)]
enum ProfileApiError {
    #[error(transparent)]
    View(#[from] ViewProfileError),
    #[error(transparent)]
    Edit(#[from] EditProfileError),
}

impl IntoResponse for ProfileApiError {
    fn into_response(self) -> Response {
        match &self {
            ProfileApiError::View(ViewProfileError::Pagination(_))
            | ProfileApiError::Edit(EditProfileError::Validation(_))
            | ProfileApiError::Edit(EditProfileError::Orcid(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            ProfileApiError::View(ViewProfileError::NotPublic) => {
                let error = ErrorResponse::new("FORBIDDEN", self.to_string());
                (StatusCode::FORBIDDEN, Json(error)).into_response()
            },
            ProfileApiError::View(ViewProfileError::NotFound(_))
            | ProfileApiError::Edit(EditProfileError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            _ => {
                tracing::error!("Profile operation failed: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_profile_maps_to_forbidden() {
        let err = ProfileApiError::View(ViewProfileError::NotPublic);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unknown_user_maps_to_not_found() {
        let err = ProfileApiError::View(ViewProfileError::NotFound(99));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
