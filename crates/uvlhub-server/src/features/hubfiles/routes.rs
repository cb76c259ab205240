use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::cookies::{ensure_cookie, FILE_DOWNLOAD_COOKIE, VIEW_COOKIE};
use crate::features::shared::identity::MaybeUser;
use crate::features::FeatureState;

use super::queries::{
    download, download_selected, view, DownloadHubfileError, DownloadSelectedError,
    ViewHubfileError,
};

pub fn hubfile_routes() -> Router<FeatureState> {
    Router::new()
        .route("/file/download/:file_id", get(download_file))
        .route("/file/view/:file_id", get(view_file))
        .route("/dataset/download_selected", get(download_selected_files))
}

#[tracing::instrument(skip(state, jar))]
async fn download_file(
    State(state): State<FeatureState>,
    Path(file_id): Path<i64>,
    MaybeUser(viewer): MaybeUser,
    jar: CookieJar,
) -> Result<Response, HubfileApiError> {
    let (jar, cookie) = ensure_cookie(jar, FILE_DOWNLOAD_COOKIE);
    let (filename, bytes) =
        download::handle(&state.db, &state.storage, file_id, viewer, &cookie).await?;

    Ok((jar, attachment_headers(&filename), bytes).into_response())
}

#[tracing::instrument(skip(state, jar))]
async fn view_file(
    State(state): State<FeatureState>,
    Path(file_id): Path<i64>,
    MaybeUser(viewer): MaybeUser,
    jar: CookieJar,
) -> Result<Response, HubfileApiError> {
    let (jar, cookie) = ensure_cookie(jar, VIEW_COOKIE);
    let viewed = view::handle(&state.db, &state.storage, file_id, viewer, &cookie).await?;

    Ok((jar, Json(ApiResponse::success(viewed))).into_response())
}

#[derive(Debug, Deserialize)]
struct SelectionParams {
    file_ids: Option<String>,
}

#[tracing::instrument(skip(state, jar, params))]
async fn download_selected_files(
    State(state): State<FeatureState>,
    Query(params): Query<SelectionParams>,
    MaybeUser(viewer): MaybeUser,
    jar: CookieJar,
) -> Result<Response, HubfileApiError> {
    let raw = params.file_ids.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(HubfileApiError::Selected(DownloadSelectedError::NoFiles));
    }

    let file_ids = raw
        .split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| HubfileApiError::InvalidIds)?;

    let (jar, cookie) = ensure_cookie(jar, FILE_DOWNLOAD_COOKIE);
    let (filename, bytes) =
        download_selected::handle(&state.db, &state.storage, &file_ids, viewer, &cookie).await?;

    Ok((jar, attachment_headers(&filename), bytes).into_response())
}

fn attachment_headers(filename: &str) -> [(header::HeaderName, String); 2] {
    [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ]
}

#[derive(Debug, thiserror::Error)]
enum HubfileApiError {
    #[error("Invalid file IDs format")]
    InvalidIds,
    #[error(transparent)]
    Download(#[from] DownloadHubfileError),
    #[error(transparent)]
    View(#[from] ViewHubfileError),
    #[error(transparent)]
    Selected(#[from] DownloadSelectedError),
}

impl IntoResponse for HubfileApiError {
    fn into_response(self) -> Response {
        match &self {
            HubfileApiError::InvalidIds
            | HubfileApiError::Selected(DownloadSelectedError::NoFiles) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            HubfileApiError::Download(DownloadHubfileError::NotFound(_))
            | HubfileApiError::View(ViewHubfileError::NotFound(_))
            | HubfileApiError::Selected(DownloadSelectedError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            _ => {
                tracing::error!("Hubfile operation failed: {}", self);
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
    fn test_missing_file_maps_to_not_found() {
        let err = HubfileApiError::Download(DownloadHubfileError::NotFound(7));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_empty_selection_maps_to_bad_request() {
        let err = HubfileApiError::Selected(DownloadSelectedError::NoFiles);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
