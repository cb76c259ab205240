//! Bulk export of every synchronized dataset

use sqlx::PgPool;

use crate::packaging::{self, PackagingError};
use crate::storage::FsStorage;

/// Errors that can occur building the bulk export
#[derive(Debug, thiserror::Error)]
pub enum DownloadAllError {
    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct DatasetLocation {
    id: i64,
    user_id: i64,
}

/// Handles the bulk export query. Returns the archive bytes.
#[tracing::instrument(skip(pool, storage))]
pub async fn handle(pool: &PgPool, storage: &FsStorage) -> Result<Vec<u8>, DownloadAllError> {
    let locations: Vec<DatasetLocation> = sqlx::query_as(
        r#"
        SELECT d.id, d.user_id
        FROM data_sets d
        JOIN ds_meta_data m ON m.id = d.ds_meta_data_id
        WHERE m.dataset_doi IS NOT NULL
        ORDER BY d.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let dirs: Vec<_> = locations
        .iter()
        .map(|loc| storage.dataset_dir(loc.user_id, loc.id))
        .filter(|dir| dir.is_dir())
        .collect();

    let temp = tempfile::tempdir()?;
    let zip_path = temp.path().join("all_datasets.zip");
    packaging::export_datasets(&dirs, &zip_path)?;
    let bytes = std::fs::read(&zip_path)?;

    tracing::info!(
        datasets = dirs.len(),
        size = bytes.len(),
        "Bulk export archive built"
    );

    Ok(bytes)
}
