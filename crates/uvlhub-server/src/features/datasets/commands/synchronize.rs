//! Mirror a dataset to the archival service
//!
//! Runs the full deposition conversation after a dataset is created: create
//! the deposition from the dataset metadata, register every stored file,
//! publish, then persist the deposition id and assigned DOI locally. Mirror
//! failures are surfaced to the caller but leave the local dataset intact.

use sqlx::PgPool;

use crate::features::fakenodo::{Creator, DepositionClient, DepositionMetadata, MirrorError};
use crate::storage::FsStorage;
use uvlhub_common::types::PublicationType;

/// Errors that can occur while mirroring a dataset
#[derive(Debug, thiserror::Error)]
pub enum SynchronizeDatasetError {
    #[error("Dataset {0} not found")]
    DatasetNotFound(i64),

    #[error("Mirror error: {0}")]
    Mirror(#[from] MirrorError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct DatasetMetaRow {
    ds_meta_data_id: i64,
    title: String,
    description: String,
    publication_type: PublicationType,
    tags: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct AuthorRow {
    name: String,
    affiliation: Option<String>,
    orcid: Option<String>,
}

/// Handles dataset synchronization. Returns the DOI assigned by the mirror.
#[tracing::instrument(skip(pool, storage, client))]
pub async fn handle(
    pool: &PgPool,
    storage: &FsStorage,
    client: &DepositionClient,
    user_id: i64,
    dataset_id: i64,
) -> Result<String, SynchronizeDatasetError> {
    let meta: DatasetMetaRow = sqlx::query_as(
        r#"
        SELECT m.id AS ds_meta_data_id, m.title, m.description, m.publication_type, m.tags
        FROM data_sets d
        JOIN ds_meta_data m ON m.id = d.ds_meta_data_id
        WHERE d.id = $1 AND d.user_id = $2
        "#,
    )
    .bind(dataset_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(SynchronizeDatasetError::DatasetNotFound(dataset_id))?;

    let authors: Vec<AuthorRow> = sqlx::query_as(
        "SELECT name, affiliation, orcid FROM authors WHERE ds_meta_data_id = $1 ORDER BY id",
    )
    .bind(meta.ds_meta_data_id)
    .fetch_all(pool)
    .await?;

    let creators = authors
        .into_iter()
        .map(|a| Creator {
            name: a.name,
            affiliation: a.affiliation,
            orcid: a.orcid,
        })
        .collect();

    let metadata = DepositionMetadata::from_dataset(
        &meta.title,
        &meta.description,
        &meta.publication_type,
        meta.tags.as_deref(),
        creators,
    );

    let deposition_id = client.create_deposition(&metadata).await?;

    sqlx::query("UPDATE ds_meta_data SET deposition_id = $1 WHERE id = $2")
        .bind(deposition_id)
        .bind(meta.ds_meta_data_id)
        .execute(pool)
        .await?;

    let filenames: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT h.name
        FROM hubfiles h
        JOIN feature_models fm ON fm.id = h.feature_model_id
        WHERE fm.data_set_id = $1
        ORDER BY h.id
        "#,
    )
    .bind(dataset_id)
    .fetch_all(pool)
    .await?;

    for name in &filenames {
        let path = storage.hubfile_path(user_id, dataset_id, name);
        client.upload_file(deposition_id, name, &path).await?;
    }

    let doi = client.publish(deposition_id).await?;

    sqlx::query("UPDATE ds_meta_data SET dataset_doi = $1 WHERE id = $2")
        .bind(&doi)
        .bind(meta.ds_meta_data_id)
        .execute(pool)
        .await?;

    tracing::info!(dataset_id, deposition_id, doi = %doi, "Dataset mirrored");

    Ok(doi)
}
