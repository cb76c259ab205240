//! Resolve a dataset by DOI
//!
//! Old DOIs are redirected through the `doi_mappings` table; current DOIs
//! load the full dataset view and append a deduplicated view record keyed by
//! the caller's view cookie.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use uvlhub_common::types::{human_readable_size, PublicationType};

/// One stored file in a dataset view
#[derive(Debug, Clone, Serialize)]
pub struct HubfileInfo {
    pub id: i64,
    pub name: String,
    pub checksum: String,
    pub size: i64,
    pub size_human: String,
}

/// One dataset author in a dataset view
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuthorInfo {
    pub name: String,
    pub affiliation: Option<String>,
    pub orcid: Option<String>,
}

/// Full dataset view
#[derive(Debug, Serialize)]
pub struct DatasetDetail {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub publication_type: PublicationType,
    pub publication_doi: Option<String>,
    pub dataset_doi: Option<String>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub authors: Vec<AuthorInfo>,
    pub files: Vec<HubfileInfo>,
}

/// Outcome of DOI resolution
#[derive(Debug)]
pub enum ResolvedDoi {
    /// The DOI was superseded; callers should redirect to the new one.
    Moved(String),
    /// The DOI resolved to a dataset.
    Found(DatasetDetail),
}

/// Errors that can occur resolving a DOI
#[derive(Debug, thiserror::Error)]
pub enum ResolveDoiError {
    #[error("No dataset found for DOI '{0}'")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct DatasetHeaderRow {
    id: i64,
    user_id: i64,
    ds_meta_data_id: i64,
    title: String,
    description: String,
    publication_type: PublicationType,
    publication_doi: Option<String>,
    dataset_doi: Option<String>,
    tags: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct HubfileRow {
    id: i64,
    name: String,
    checksum: String,
    size: i64,
}

/// Handles the resolve-DOI query and records the view.
#[tracing::instrument(skip(pool, view_cookie))]
pub async fn handle(
    pool: &PgPool,
    doi: &str,
    viewer_id: Option<i64>,
    view_cookie: &str,
) -> Result<ResolvedDoi, ResolveDoiError> {
    let mapped: Option<String> =
        sqlx::query_scalar("SELECT dataset_doi_new FROM doi_mappings WHERE dataset_doi_old = $1")
            .bind(doi)
            .fetch_optional(pool)
            .await?;

    if let Some(new_doi) = mapped {
        tracing::debug!(old_doi = %doi, new_doi = %new_doi, "DOI redirected");
        return Ok(ResolvedDoi::Moved(new_doi));
    }

    let header: DatasetHeaderRow = sqlx::query_as(
        r#"
        SELECT d.id, d.user_id, m.id AS ds_meta_data_id, m.title, m.description,
               m.publication_type, m.publication_doi, m.dataset_doi, m.tags, d.created_at
        FROM data_sets d
        JOIN ds_meta_data m ON m.id = d.ds_meta_data_id
        WHERE m.dataset_doi = $1
        "#,
    )
    .bind(doi)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ResolveDoiError::NotFound(doi.to_string()))?;

    let detail = load_detail(pool, header).await?;

    sqlx::query(
        r#"
        INSERT INTO ds_view_records (user_id, dataset_id, view_cookie)
        VALUES ($1, $2, $3)
        ON CONFLICT (dataset_id, view_cookie) DO NOTHING
        "#,
    )
    .bind(viewer_id)
    .bind(detail.id)
    .bind(view_cookie)
    .execute(pool)
    .await?;

    Ok(ResolvedDoi::Found(detail))
}

/// Load authors and files for a dataset header row.
pub(crate) async fn load_detail(
    pool: &PgPool,
    header: impl Into<DatasetHeader>,
) -> Result<DatasetDetail, sqlx::Error> {
    let header = header.into();

    let authors: Vec<AuthorInfo> = sqlx::query_as(
        "SELECT name, affiliation, orcid FROM authors WHERE ds_meta_data_id = $1 ORDER BY id",
    )
    .bind(header.ds_meta_data_id)
    .fetch_all(pool)
    .await?;

    let files: Vec<HubfileRow> = sqlx::query_as(
        r#"
        SELECT h.id, h.name, h.checksum, h.size
        FROM hubfiles h
        JOIN feature_models fm ON fm.id = h.feature_model_id
        WHERE fm.data_set_id = $1
        ORDER BY h.id
        "#,
    )
    .bind(header.id)
    .fetch_all(pool)
    .await?;

    Ok(DatasetDetail {
        id: header.id,
        user_id: header.user_id,
        title: header.title,
        description: header.description,
        publication_type: header.publication_type,
        publication_doi: header.publication_doi,
        dataset_doi: header.dataset_doi,
        tags: header.tags,
        created_at: header.created_at,
        authors,
        files: files
            .into_iter()
            .map(|f| HubfileInfo {
                id: f.id,
                name: f.name,
                checksum: f.checksum,
                size_human: human_readable_size(f.size as u64),
                size: f.size,
            })
            .collect(),
    })
}

/// Header fields needed to assemble a [`DatasetDetail`].
pub(crate) struct DatasetHeader {
    pub id: i64,
    pub user_id: i64,
    pub ds_meta_data_id: i64,
    pub title: String,
    pub description: String,
    pub publication_type: PublicationType,
    pub publication_doi: Option<String>,
    pub dataset_doi: Option<String>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DatasetHeaderRow> for DatasetHeader {
    fn from(row: DatasetHeaderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            ds_meta_data_id: row.ds_meta_data_id,
            title: row.title,
            description: row.description,
            publication_type: row.publication_type,
            publication_doi: row.publication_doi,
            dataset_doi: row.dataset_doi,
            tags: row.tags,
            created_at: row.created_at,
        }
    }
}
