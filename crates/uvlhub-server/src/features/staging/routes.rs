use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::identity::CurrentUser;
use crate::features::FeatureState;

use super::commands::{delete, upload, DeleteStagedFileError, StageFileError};

pub fn staging_routes() -> Router<FeatureState> {
    Router::new()
        .route("/dataset/file/upload", post(upload_file))
        .route("/dataset/file/delete", post(delete_file))
}

#[tracing::instrument(skip(state, multipart), fields(user_id = user.0))]
async fn upload_file(
    State(state): State<FeatureState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, StagingApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| StagingApiError::Multipart(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| StagingApiError::Multipart("Missing filename".to_string()))?
            .to_string();
        let contents = field
            .bytes()
            .await
            .map_err(|e| StagingApiError::Multipart(e.to_string()))?;

        let stored_name = upload::handle(&state.storage, user.0, &filename, &contents)?;

        let body = json!({
            "filename": stored_name,
            "message": "UVL uploaded and validated successfully",
        });
        return Ok((StatusCode::CREATED, Json(ApiResponse::success(body))).into_response());
    }

    Err(StagingApiError::Multipart("No file part in request".to_string()))
}

#[derive(Debug, Deserialize)]
struct DeleteFileRequest {
    file: String,
}

#[tracing::instrument(skip(state, request), fields(user_id = user.0, file = %request.file))]
async fn delete_file(
    State(state): State<FeatureState>,
    user: CurrentUser,
    Json(request): Json<DeleteFileRequest>,
) -> Result<Response, StagingApiError> {
    delete::handle(&state.storage, user.0, &request.file)?;

    let body = json!({ "message": "File deleted successfully" });
    Ok(Json(ApiResponse::success(body)).into_response())
}

#[derive(Debug, thiserror::Error)]
enum StagingApiError {
    #[error("Invalid upload request: {0}")]
    Multipart(String),
    #[error(transparent)]
    Stage(#[from] StageFileError),
    #[error(transparent)]
    Delete(#[from] DeleteStagedFileError),
}

impl IntoResponse for StagingApiError {
    fn into_response(self) -> Response {
        match &self {
            StagingApiError::Multipart(_)
            | StagingApiError::Stage(StageFileError::NotUvl)
            | StagingApiError::Stage(StageFileError::NotUtf8)
            | StagingApiError::Stage(StageFileError::InvalidUvl(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            StagingApiError::Delete(DeleteStagedFileError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            _ => {
                tracing::error!("Staging operation failed: {}", self);
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
    fn test_invalid_uvl_maps_to_bad_request() {
        let err = StagingApiError::Stage(StageFileError::NotUvl);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_staged_file_maps_to_not_found() {
        let err = StagingApiError::Delete(DeleteStagedFileError::NotFound("a.uvl".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
