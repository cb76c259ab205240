//! Download a single stored file

use sqlx::PgPool;

use crate::storage::FsStorage;

use super::{locate, record_download};

/// Errors that can occur downloading a file
#[derive(Debug, thiserror::Error)]
pub enum DownloadHubfileError {
    #[error("File with id {0} not found")]
    NotFound(i64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handles the download-file query. Returns the filename and raw bytes,
/// recording the download against the caller's cookie.
#[tracing::instrument(skip(pool, storage, cookie))]
pub async fn handle(
    pool: &PgPool,
    storage: &FsStorage,
    file_id: i64,
    viewer: Option<i64>,
    cookie: &str,
) -> Result<(String, Vec<u8>), DownloadHubfileError> {
    let location = locate(pool, file_id)
        .await?
        .ok_or(DownloadHubfileError::NotFound(file_id))?;

    let path = storage.hubfile_path(location.owner_id, location.dataset_id, &location.name);
    if !path.is_file() {
        tracing::warn!(file_id, path = %path.display(), "Hubfile record has no backing file");
        return Err(DownloadHubfileError::NotFound(file_id));
    }
    let bytes = std::fs::read(&path)?;

    record_download(pool, file_id, viewer, cookie).await?;

    tracing::info!(file_id, size = bytes.len(), "Hubfile downloaded");

    Ok((location.name, bytes))
}
