use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::identity::CurrentUser;

use super::commands::{
    create, delete, edit, CreateRatingError, DeleteRatingError, EditRatingError,
};
use super::commands::create::CreateRatingCommand;
use super::commands::edit::EditRatingCommand;
use super::queries::{list, ListRatingsError};

pub fn rating_routes() -> Router<PgPool> {
    Router::new()
        .route("/rate/:dataset_id", get(list_ratings))
        .route("/ratedataset/create/:dataset_id", post(create_rating))
        .route("/ratedataset/edit/:dataset_id/:rate_id", post(edit_rating))
        .route("/ratedataset/delete/:dataset_id/:rate_id", post(delete_rating))
}

#[tracing::instrument(skip(pool))]
async fn list_ratings(
    State(pool): State<PgPool>,
    Path(dataset_id): Path<i64>,
) -> Result<Response, RatingApiError> {
    let response = list::handle(&pool, dataset_id).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool, command), fields(user_id = user.0))]
async fn create_rating(
    State(pool): State<PgPool>,
    Path(dataset_id): Path<i64>,
    user: CurrentUser,
    Json(command): Json<CreateRatingCommand>,
) -> Result<Response, RatingApiError> {
    let rating = create::handle(&pool, user.0, dataset_id, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rating))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(user_id = user.0))]
async fn edit_rating(
    State(pool): State<PgPool>,
    Path((dataset_id, rate_id)): Path<(i64, i64)>,
    user: CurrentUser,
    Json(command): Json<EditRatingCommand>,
) -> Result<Response, RatingApiError> {
    let rating = edit::handle(&pool, user.0, dataset_id, rate_id, command).await?;
    Ok(Json(ApiResponse::success(rating)).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = user.0))]
async fn delete_rating(
    State(pool): State<PgPool>,
    Path((dataset_id, rate_id)): Path<(i64, i64)>,
    user: CurrentUser,
) -> Result<Response, RatingApiError> {
    delete::handle(&pool, user.0, dataset_id, rate_id).await?;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "message": "Rate deleted successfully"
    })))
    .into_response())
}

#[derive(Debug, thiserror::Error)]
enum RatingApiError {
    #[error(transparent)]
    Create(#[from] CreateRatingError),
    #[error(transparent)]
    Edit(#[from] EditRatingError),
    #[error(transparent)]
    Delete(#[from] DeleteRatingError),
    #[error(transparent)]
    List(#[from] ListRatingsError),
}

impl IntoResponse for RatingApiError {
    fn into_response(self) -> Response {
        match &self {
            RatingApiError::Create(CreateRatingError::Validation(_))
            | RatingApiError::Edit(EditRatingError::Validation(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            RatingApiError::Edit(EditRatingError::NotOwner)
            | RatingApiError::Delete(DeleteRatingError::NotOwner) => {
                let error = ErrorResponse::new("FORBIDDEN", self.to_string());
                (StatusCode::FORBIDDEN, Json(error)).into_response()
            },
            RatingApiError::Create(CreateRatingError::DatasetNotFound(_))
            | RatingApiError::Edit(EditRatingError::NotFound(_))
            | RatingApiError::Delete(DeleteRatingError::NotFound(_))
            | RatingApiError::List(ListRatingsError::DatasetNotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            _ => {
                tracing::error!("Rating operation failed: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::validation::RateValidationError;

    #[test]
    fn test_out_of_range_rate_maps_to_bad_request() {
        let err = RatingApiError::Create(CreateRatingError::Validation(
            RateValidationError::OutOfRange,
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_foreign_rating_maps_to_forbidden() {
        let err = RatingApiError::Edit(EditRatingError::NotOwner);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
