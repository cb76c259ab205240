//! List the caller's datasets, split by synchronization state

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use uvlhub_common::types::PublicationType;

/// One dataset in a listing
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DatasetListItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub publication_type: PublicationType,
    pub dataset_doi: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response from listing a user's datasets
#[derive(Debug, Serialize)]
pub struct ListDatasetsResponse {
    pub synchronized: Vec<DatasetListItem>,
    pub unsynchronized: Vec<DatasetListItem>,
}

/// Errors that can occur when listing datasets
#[derive(Debug, thiserror::Error)]
pub enum ListDatasetsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handles the list datasets query
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &PgPool, user_id: i64) -> Result<ListDatasetsResponse, ListDatasetsError> {
    let rows: Vec<DatasetListItem> = sqlx::query_as(
        r#"
        SELECT d.id, m.title, m.description, m.publication_type, m.dataset_doi, d.created_at
        FROM data_sets d
        JOIN ds_meta_data m ON m.id = d.ds_meta_data_id
        WHERE d.user_id = $1
        ORDER BY d.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let (synchronized, unsynchronized) =
        rows.into_iter().partition(|item| item.dataset_doi.is_some());

    Ok(ListDatasetsResponse {
        synchronized,
        unsynchronized,
    })
}
