//! Download an arbitrary selection of files as a single archive
//!
//! The archive is flat: each selected file is added under its own name,
//! regardless of which dataset it belongs to. A download record is written
//! for every file in the selection.

use sqlx::PgPool;

use crate::packaging::{self, PackagingError};
use crate::storage::FsStorage;

use super::{locate, record_download};

/// Errors that can occur building a selection archive
#[derive(Debug, thiserror::Error)]
pub enum DownloadSelectedError {
    #[error("No file IDs provided")]
    NoFiles,

    #[error("File with id {0} not found")]
    NotFound(i64),

    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handles the download-selected query. Returns the archive name and bytes.
#[tracing::instrument(skip(pool, storage, cookie))]
pub async fn handle(
    pool: &PgPool,
    storage: &FsStorage,
    file_ids: &[i64],
    viewer: Option<i64>,
    cookie: &str,
) -> Result<(String, Vec<u8>), DownloadSelectedError> {
    if file_ids.is_empty() {
        return Err(DownloadSelectedError::NoFiles);
    }

    let mut entries = Vec::with_capacity(file_ids.len());
    for &file_id in file_ids {
        let location = locate(pool, file_id)
            .await?
            .ok_or(DownloadSelectedError::NotFound(file_id))?;

        let path = storage.hubfile_path(location.owner_id, location.dataset_id, &location.name);
        if !path.is_file() {
            return Err(DownloadSelectedError::NotFound(file_id));
        }
        entries.push((path, location.name));

        record_download(pool, file_id, viewer, cookie).await?;
    }

    let bytes = packaging::zip_files(&entries)?;

    let joined = file_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("_");
    let filename = format!("models_{}.zip", joined);

    tracing::info!(files = file_ids.len(), size = bytes.len(), "Selection archive built");

    Ok((filename, bytes))
}
