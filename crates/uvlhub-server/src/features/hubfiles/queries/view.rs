//! View a stored file's content inline

use serde::Serialize;
use sqlx::PgPool;

use crate::storage::FsStorage;

use super::locate;

/// Errors that can occur viewing a file
#[derive(Debug, thiserror::Error)]
pub enum ViewHubfileError {
    #[error("File with id {0} not found")]
    NotFound(i64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Response for the view-file query
#[derive(Debug, Serialize)]
pub struct ViewedHubfile {
    pub id: i64,
    pub name: String,
    pub content: String,
}

/// Handles the view-file query. Returns the file content as text and
/// records the view against the caller's cookie.
#[tracing::instrument(skip(pool, storage, cookie))]
pub async fn handle(
    pool: &PgPool,
    storage: &FsStorage,
    file_id: i64,
    viewer: Option<i64>,
    cookie: &str,
) -> Result<ViewedHubfile, ViewHubfileError> {
    let location = locate(pool, file_id)
        .await?
        .ok_or(ViewHubfileError::NotFound(file_id))?;

    let path = storage.hubfile_path(location.owner_id, location.dataset_id, &location.name);
    if !path.is_file() {
        return Err(ViewHubfileError::NotFound(file_id));
    }
    let content = std::fs::read_to_string(&path)?;

    sqlx::query(
        r#"
        INSERT INTO hubfile_view_records (user_id, file_id, view_cookie)
        VALUES ($1, $2, $3)
        ON CONFLICT (file_id, view_cookie) DO NOTHING
        "#,
    )
    .bind(viewer)
    .bind(file_id)
    .bind(cookie)
    .execute(pool)
    .await?;

    Ok(ViewedHubfile {
        id: location.id,
        name: location.name,
        content,
    })
}
