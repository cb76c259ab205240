//! Fetch one of the caller's datasets that has not been mirrored yet

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::doi::{load_detail, DatasetDetail, DatasetHeader};
use uvlhub_common::types::PublicationType;

/// Errors that can occur fetching an unsynchronized dataset
#[derive(Debug, thiserror::Error)]
pub enum UnsynchronizedDatasetError {
    #[error("Unsynchronized dataset {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct Row {
    id: i64,
    user_id: i64,
    ds_meta_data_id: i64,
    title: String,
    description: String,
    publication_type: PublicationType,
    publication_doi: Option<String>,
    tags: Option<String>,
    created_at: DateTime<Utc>,
}

/// Handles the unsynchronized dataset query. Only the owner sees it.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &PgPool,
    user_id: i64,
    dataset_id: i64,
) -> Result<DatasetDetail, UnsynchronizedDatasetError> {
    let row: Row = sqlx::query_as(
        r#"
        SELECT d.id, d.user_id, m.id AS ds_meta_data_id, m.title, m.description,
               m.publication_type, m.publication_doi, m.tags, d.created_at
        FROM data_sets d
        JOIN ds_meta_data m ON m.id = d.ds_meta_data_id
        WHERE d.id = $1 AND d.user_id = $2 AND m.dataset_doi IS NULL
        "#,
    )
    .bind(dataset_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(UnsynchronizedDatasetError::NotFound(dataset_id))?;

    let detail = load_detail(
        pool,
        DatasetHeader {
            id: row.id,
            user_id: row.user_id,
            ds_meta_data_id: row.ds_meta_data_id,
            title: row.title,
            description: row.description,
            publication_type: row.publication_type,
            publication_doi: row.publication_doi,
            dataset_doi: None,
            tags: row.tags,
            created_at: row.created_at,
        },
    )
    .await?;

    Ok(detail)
}
