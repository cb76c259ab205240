use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::cookies::{ensure_cookie, DOWNLOAD_COOKIE, VIEW_COOKIE};
use crate::features::shared::identity::{CurrentUser, MaybeUser};
use crate::features::FeatureState;

use super::commands::{create, synchronize, CreateDatasetCommand, CreateDatasetError};
use super::queries::{
    doi, download, download_all, list, unsynchronized, DownloadAllError, DownloadDatasetError,
    ListDatasetsError, ResolveDoiError, ResolvedDoi, UnsynchronizedDatasetError,
};

pub fn dataset_routes() -> Router<FeatureState> {
    Router::new()
        .route("/dataset/upload", post(upload_dataset))
        .route("/dataset/list", get(list_datasets))
        .route("/dataset/download/:id", get(download_dataset))
        .route("/dataset/download_all", get(download_all_datasets))
        .route("/dataset/unsynchronized/:id", get(get_unsynchronized))
        .route("/doi/*doi", get(resolve_doi))
}

#[tracing::instrument(skip(state, command), fields(user_id = user.0, title = %command.title))]
async fn upload_dataset(
    State(state): State<FeatureState>,
    user: CurrentUser,
    Json(command): Json<CreateDatasetCommand>,
) -> Result<Response, DatasetApiError> {
    let response = create::handle(&state.db, &state.storage, user.0, command).await?;

    // Mirroring happens after the local commit; a mirror failure downgrades
    // the response to a partial success but never undoes the dataset.
    let (doi, message) = if state.mirror_enabled {
        match synchronize::handle(&state.db, &state.storage, &state.fakenodo, user.0, response.id)
            .await
        {
            Ok(doi) => (Some(doi), "Dataset created and mirrored".to_string()),
            Err(e) => {
                tracing::warn!(dataset_id = response.id, error = %e, "Mirroring failed");
                (
                    None,
                    "Dataset created locally but could not be mirrored".to_string(),
                )
            },
        }
    } else {
        (None, "Dataset created".to_string())
    };

    tracing::info!(dataset_id = response.id, "Dataset created via API");

    let body = json!({
        "dataset": response,
        "doi": doi,
        "message": message,
    });

    Ok((StatusCode::CREATED, Json(ApiResponse::success(body))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = user.0))]
async fn list_datasets(
    State(state): State<FeatureState>,
    user: CurrentUser,
) -> Result<Response, DatasetApiError> {
    let response = list::handle(&state.db, user.0).await?;

    tracing::debug!(
        synchronized = response.synchronized.len(),
        unsynchronized = response.unsynchronized.len(),
        "Datasets listed via API"
    );

    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(state, jar))]
async fn download_dataset(
    State(state): State<FeatureState>,
    Path(dataset_id): Path<i64>,
    MaybeUser(viewer): MaybeUser,
    jar: CookieJar,
) -> Result<Response, DatasetApiError> {
    let (jar, cookie) = ensure_cookie(jar, DOWNLOAD_COOKIE);
    let (filename, bytes) =
        download::handle(&state.db, &state.storage, dataset_id, viewer, &cookie).await?;

    Ok((
        jar,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[tracing::instrument(skip(state))]
async fn download_all_datasets(State(state): State<FeatureState>) -> Result<Response, DatasetApiError> {
    let bytes = download_all::handle(&state.db, &state.storage).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"all_datasets.zip\"".to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[tracing::instrument(skip(state, jar))]
async fn resolve_doi(
    State(state): State<FeatureState>,
    Path(doi): Path<String>,
    MaybeUser(viewer): MaybeUser,
    jar: CookieJar,
) -> Result<Response, DatasetApiError> {
    let doi = doi.trim_matches('/');
    let (jar, cookie) = ensure_cookie(jar, VIEW_COOKIE);

    match doi::handle(&state.db, doi, viewer, &cookie).await? {
        ResolvedDoi::Moved(new_doi) => {
            Ok(Redirect::to(&format!("/doi/{}/", new_doi)).into_response())
        },
        ResolvedDoi::Found(detail) => {
            Ok((jar, Json(ApiResponse::success(detail))).into_response())
        },
    }
}

#[tracing::instrument(skip(state), fields(user_id = user.0))]
async fn get_unsynchronized(
    State(state): State<FeatureState>,
    user: CurrentUser,
    Path(dataset_id): Path<i64>,
) -> Result<Response, DatasetApiError> {
    let detail = unsynchronized::handle(&state.db, user.0, dataset_id).await?;
    Ok(Json(ApiResponse::success(detail)).into_response())
}

#[derive(Debug, thiserror::Error)]
enum DatasetApiError {
    #[error(transparent)]
    Create(#[from] CreateDatasetError),
    #[error(transparent)]
    List(#[from] ListDatasetsError),
    #[error(transparent)]
    Download(#[from] DownloadDatasetError),
    #[error(transparent)]
    DownloadAll(#[from] DownloadAllError),
    #[error(transparent)]
    ResolveDoi(#[from] ResolveDoiError),
    #[error(transparent)]
    Unsynchronized(#[from] UnsynchronizedDatasetError),
}

impl IntoResponse for DatasetApiError {
    fn into_response(self) -> Response {
        match &self {
            DatasetApiError::Create(CreateDatasetError::Validation(_))
            | DatasetApiError::Create(CreateDatasetError::Orcid(_))
            | DatasetApiError::Create(CreateDatasetError::NoFeatureModels)
            | DatasetApiError::Create(CreateDatasetError::NotUvl(_))
            | DatasetApiError::Create(CreateDatasetError::StagedFileMissing(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            DatasetApiError::Download(DownloadDatasetError::NotFound(_))
            | DatasetApiError::ResolveDoi(ResolveDoiError::NotFound(_))
            | DatasetApiError::Unsynchronized(UnsynchronizedDatasetError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            _ => {
                tracing::error!("Dataset operation failed: {}", self);
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
    fn test_validation_errors_map_to_bad_request() {
        let err = DatasetApiError::Create(CreateDatasetError::NoFeatureModels);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_dataset_maps_to_not_found() {
        let err = DatasetApiError::Download(DownloadDatasetError::NotFound(42));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
