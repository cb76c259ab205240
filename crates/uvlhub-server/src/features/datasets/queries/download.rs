//! Download one dataset as a ZIP archive
//!
//! The dataset directory is zipped into a scoped temp directory that is
//! removed when the archive bytes have been read, and a deduplicated
//! download record is appended keyed by the caller's download cookie.

use sqlx::PgPool;

use crate::packaging::{self, PackagingError};
use crate::storage::FsStorage;

/// Errors that can occur downloading a dataset
#[derive(Debug, thiserror::Error)]
pub enum DownloadDatasetError {
    #[error("Dataset {0} not found")]
    NotFound(i64),

    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handles the download query. Returns the archive filename and its bytes.
#[tracing::instrument(skip(pool, storage, download_cookie))]
pub async fn handle(
    pool: &PgPool,
    storage: &FsStorage,
    dataset_id: i64,
    viewer_id: Option<i64>,
    download_cookie: &str,
) -> Result<(String, Vec<u8>), DownloadDatasetError> {
    let owner_id: i64 = sqlx::query_scalar("SELECT user_id FROM data_sets WHERE id = $1")
        .bind(dataset_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DownloadDatasetError::NotFound(dataset_id))?;

    let dataset_dir = storage.dataset_dir(owner_id, dataset_id);
    let filename = format!("dataset_{}.zip", dataset_id);

    let temp = tempfile::tempdir()?;
    let zip_path = temp.path().join(&filename);
    packaging::zip_directory(&dataset_dir, &zip_path)?;
    let bytes = std::fs::read(&zip_path)?;

    sqlx::query(
        r#"
        INSERT INTO ds_download_records (user_id, dataset_id, download_cookie)
        VALUES ($1, $2, $3)
        ON CONFLICT (dataset_id, download_cookie) DO NOTHING
        "#,
    )
    .bind(viewer_id)
    .bind(dataset_id)
    .bind(download_cookie)
    .execute(pool)
    .await?;

    tracing::info!(dataset_id, size = bytes.len(), "Dataset archive served");

    Ok((filename, bytes))
}
